//! End-to-end tests: text in, simplified text and types out

use lambdacalc::fmt::RenderMode;
use lambdacalc::parser::{ParseOptions, parse};
use lambdacalc::typer::IdentifierTyper;
use lambdacalc::types::Type;

/// Parse, reduce to normal form and render, returning the type too
fn run(input: &str, options: &mut ParseOptions) -> (String, Type) {
    let expr = parse(input, options).unwrap_or_else(|err| panic!("parsing {input:?} failed: {err}"));
    let ty = expr.get_type().expect("parsed expressions are well typed");
    (expr.simplify_fully().to_string(), ty)
}

#[test]
fn e2e_every_man_walks() {
    let typer = IdentifierTyper::from_conventions(
        "constants of type e: a-e, john\n\
         constants of type <e,t>: man, walk\n\
         variables of type e: u-z\n\
         variables of type <e,t>: P-Q",
    )
    .unwrap();
    let mut options = ParseOptions::new().typer(typer);

    let every = "λP.λQ.∀x.P(x) → Q(x)";
    let (every_man, ty) = run(&format!("({every})(man)"), &mut options);
    assert_eq!(every_man, "λQ.∀x.[man(x) → Q(x)]");
    assert_eq!(ty.to_string(), "<<e,t>,t>");

    let (sentence, ty) = run(&format!("({every})(man)(walk)"), &mut options);
    assert_eq!(sentence, "∀x.[man(x) → walk(x)]");
    assert_eq!(ty.to_string(), "t");
}

#[test]
fn e2e_ascii_input() {
    let mut options = ParseOptions::new().ascii(true);
    let (result, _) = run("(LX.Ex.X(x) & P(x))(Ly.Q(y))", &mut options);
    assert_eq!(result, "∃x.[Q(x) ∧ P(x)]");
}

#[test]
fn e2e_capture_is_reported_step_by_step() {
    let mut options = ParseOptions::new();
    let expr = parse("(λx.∀y.R(x, y))(y)", &mut options).unwrap();

    let step = expr.perform_lambda_conversion().unwrap();
    let variant = step.alphabetic_variant.as_ref().expect("capture needs a variant");
    assert_eq!(variant.to_string(), "(λx.∀y'.R(x,y'))(y)");
    assert_eq!(step.result.to_string(), "∀y'.R(y,y')");
    assert_eq!(
        step.uncorrected_result.as_ref().map(ToString::to_string),
        Some("∀y.R(y,y)".to_string())
    );
}

#[test]
fn e2e_render_modes() {
    let mut options = ParseOptions::new();
    let expr = parse("(λx.P(x) ∧ x ⊑ a)(b)", &mut options).unwrap().simplify_fully();
    assert_eq!(expr.render(RenderMode::Txt), "P(b) ∧ b ⊑ a");
    assert_eq!(expr.render(RenderMode::Html), "P(b) ∧ b ⊑ a");
    assert!(expr.render(RenderMode::Latex).contains("\\wedge"));
}

#[test]
fn e2e_single_letter_mode() {
    let mut options = ParseOptions::new().single_letter_identifiers(true);
    let (result, ty) = run("(λx.Rxa)(b)", &mut options);
    assert_eq!(result, "R(b,a)");
    assert_eq!(ty.to_string(), "t");
}

#[test]
fn e2e_options_are_reusable() {
    let mut options = ParseOptions::new();
    parse("f_<e,t>(a)", &mut options).unwrap();
    assert!(options.explicit_types.contains_key("f"));
    parse("P(a)", &mut options).unwrap();
    assert!(options.explicit_types.is_empty());
}
