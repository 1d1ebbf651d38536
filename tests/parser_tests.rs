use lambdacalc::ast::{BinaryOp, BinderKind, Expr, Identifier, UnaryOp};
use lambdacalc::parser::{ParseError, ParseOptions, parse, parse_or_none};
use lambdacalc::typer::IdentifierTyper;
use lambdacalc::types::{E, N, T, Type};

fn parse_unicode(input: &str) -> Expr {
    parse(input, &mut ParseOptions::new()).unwrap_or_else(|err| panic!("parsing {input:?} failed: {err}"))
}

fn parse_ascii(input: &str) -> Expr {
    parse(input, &mut ParseOptions::new().ascii(true))
        .unwrap_or_else(|err| panic!("parsing {input:?} failed: {err}"))
}

fn parse_error(input: &str) -> ParseError {
    match parse(input, &mut ParseOptions::new().ascii(true)) {
        Ok(expr) => panic!("expected {input:?} to fail, got {expr}"),
        Err(err) => err,
    }
}

fn et() -> Type {
    Type::set_of(E)
}

#[test]
fn parse_predicate_application() {
    let expr = parse_unicode("P(a)");
    assert_eq!(
        expr,
        Expr::app(Expr::constant("P", et()), Expr::constant("a", E))
    );
    assert_eq!(expr.get_type(), Ok(T));
}

#[test]
fn parse_relation_with_argument_list() {
    let expr = parse_unicode("R(a, b)");
    let Expr::Binary {
        op: BinaryOp::FunApp,
        right,
        ..
    } = &expr
    else {
        panic!("expected an application, got {expr}");
    };
    assert!(matches!(right.as_ref(), Expr::ArgList(items) if items.len() == 2));
    assert_eq!(expr.get_type(), Ok(T));
}

#[test]
fn parse_quantifier_takes_the_whole_chain() {
    let expr = parse_unicode("∀x.P(x) ∧ Q(x)");
    let Expr::Binder(binder) = &expr else {
        panic!("expected a binder, got {expr}");
    };
    assert_eq!(binder.kind, BinderKind::ForAll);
    assert_eq!(binder.var, Identifier::var("x", E));
    assert_eq!(expr.to_string(), "∀x.[P(x) ∧ Q(x)]");
}

#[test]
fn parse_ascii_spellings() {
    let expr = parse_ascii("Ex.~P(x) -> Q(x)");
    assert_eq!(expr.to_string(), "∃x.[¬P(x) → Q(x)]");
    assert_eq!(expr, parse_unicode("∃x.[¬P(x) → Q(x)]"));
}

#[test]
fn parse_escapes() {
    assert_eq!(parse_unicode("\\forall x.P(x)"), parse_unicode("∀x.P(x)"));
    assert_eq!(
        parse_unicode("P(a) \\wedge Q(a)"),
        parse_unicode("P(a) ∧ Q(a)")
    );
}

#[test]
fn parse_lambda_applied_to_argument() {
    let expr = parse_unicode("(λx.P(x))(a)");
    let Expr::Binary {
        op: BinaryOp::FunApp,
        left,
        ..
    } = &expr
    else {
        panic!("expected an application, got {expr}");
    };
    assert!(matches!(
        left.as_ref(),
        Expr::Unary {
            op: UnaryOp::Parens(_),
            ..
        }
    ));
    assert_eq!(expr.get_type(), Ok(T));
}

#[test]
fn parse_lambda_type() {
    let expr = parse_unicode("λx.P(x)");
    assert_eq!(expr.get_type(), Ok(et()));
    assert!(expr.is_well_typed());
    assert!(!Expr::app(Expr::constant("a", E), Expr::constant("b", E)).is_well_typed());
    let expr = parse_unicode("λx.λy.R(x, y)");
    assert_eq!(expr.get_type(), Ok(Type::composite(E, et())));
}

#[test]
fn parse_associative_operators_group_left() {
    let expr = parse_unicode("P(a) ∧ Q(a) ∧ P(b)");
    let Expr::Binary {
        op: BinaryOp::And,
        left,
        ..
    } = &expr
    else {
        panic!("expected a conjunction, got {expr}");
    };
    assert!(matches!(left.as_ref(), Expr::Binary { op: BinaryOp::And, .. }));
}

#[test]
fn parse_mixed_connectives_need_brackets() {
    let err = parse_error("P(x) & Q(x) | R(x)");
    assert!(err.is_syntax_error(), "got {err:?}");
    assert!(err.to_string().contains("brackets"), "got {err}");
    parse_ascii("(P(x) & Q(x)) | P(y)");
    parse_ascii("P(x) & (Q(x) | P(y))");
}

#[test]
fn parse_bracketed_connectives_with_unary_relation() {
    let typer = IdentifierTyper::from_conventions(
        "constants of type <e,t>: P-R\nvariables of type e: u-z",
    )
    .unwrap();
    let mut options = ParseOptions::new().ascii(true).typer(typer);
    let expr = parse("(P(x) & Q(x)) | R(x)", &mut options).unwrap();
    assert!(matches!(expr, Expr::Binary { op: BinaryOp::Or, .. }));
    assert_eq!(expr.get_type(), Ok(T));
    assert!(parse("P(x) & Q(x) | R(x)", &mut options).unwrap_err().is_syntax_error());
}

#[test]
fn parse_two_well_typed_readings_are_ambiguous() {
    let typer = IdentifierTyper::from_conventions("constants of type t: p, q").unwrap();
    let mut options = ParseOptions::new().ascii(true).typer(typer);
    let err = parse("{p | q}", &mut options).unwrap_err();
    let ParseError::Ambiguous { alternatives, .. } = &err else {
        panic!("expected an ambiguity, got {err:?}");
    };
    assert_eq!(alternatives.len(), 2, "got {alternatives:?}");
    assert!(alternatives.contains(&"{p ∨ q}".to_string()), "got {alternatives:?}");
    assert!(alternatives.contains(&"{p | q}".to_string()), "got {alternatives:?}");
    assert!(err.is_syntax_error());
    assert!(parse_or_none("{p | q}", &mut options).is_none());
}

#[test]
fn parse_repeated_implication_needs_brackets() {
    let err = parse_error("P(a) -> Q(a) -> P(b)");
    assert!(err.is_syntax_error(), "got {err:?}");
    parse_ascii("P(a) -> (Q(a) -> P(b))");
}

#[test]
fn parse_relations_bind_tighter_than_connectives() {
    let expr = parse_unicode("a = b ∧ P(a)");
    let Expr::Binary {
        op: BinaryOp::And,
        left,
        ..
    } = &expr
    else {
        panic!("expected a conjunction, got {expr}");
    };
    assert!(matches!(left.as_ref(), Expr::Binary { op: BinaryOp::Equal, .. }));
}

#[test]
fn parse_numerals() {
    let expr = parse_unicode("1 < 2×3");
    assert_eq!(expr.get_type(), Ok(T));
    let Expr::Binary {
        op: BinaryOp::Less,
        right,
        ..
    } = &expr
    else {
        panic!("expected a comparison, got {expr}");
    };
    assert_eq!(right.get_type(), Ok(N));
}

#[test]
fn parse_operators_need_spaces() {
    let err = parse_error("P(x)&Q(x)");
    assert_eq!(err.position(), Some(4));
}

#[test]
fn parse_sets() {
    let expr = parse_unicode("{a, b}");
    assert!(matches!(&expr, Expr::SetWithElements(items) if items.len() == 2));
    assert_eq!(expr.get_type(), Ok(et()));

    let expr = parse_unicode("{x | P(x)}");
    assert!(matches!(expr, Expr::SetWithGenerator { .. }));
    assert_eq!(expr.get_type(), Ok(et()));
}

#[test]
fn parse_cardinality() {
    let expr = parse_unicode("|{a, b}| > 1");
    assert_eq!(expr.get_type(), Ok(T));
}

#[test]
fn parse_empty_braces_suggest_emptyset() {
    let err = parse_error("{}");
    assert!(err.to_string().contains("∅"), "got {err}");
    assert_eq!(parse_unicode("∅").get_type(), Ok(et()));
}

#[test]
fn parse_assignment_function() {
    let expr = parse_unicode("P(g(1))");
    assert_eq!(expr.get_type(), Ok(T));
    let expr = parse_unicode("g(2)_<e,t>(a)");
    assert_eq!(expr.get_type(), Ok(T));
}

#[test]
fn parse_explicit_types() {
    let mut options = ParseOptions::new();
    let expr = parse("f_<e,t>(a) ∧ P(a)", &mut options).unwrap();
    assert_eq!(expr.get_type(), Ok(T));
    assert_eq!(options.explicit_types.get("f"), Some(&et()));
}

#[test]
fn parse_explicitly_typed_variable() {
    let expr = parse_unicode("λX_<e,t>.X(a)");
    assert_eq!(expr.get_type(), Ok(Type::composite(et(), T)));
}

#[test]
fn parse_unknown_identifier() {
    let err = parse_error("man");
    assert!(matches!(err, ParseError::IdentifierTypeUnknown { ref identifier, .. } if identifier == "man"));
}

#[test]
fn parse_unknown_predicate_is_typed_by_its_argument() {
    let expr = parse_unicode("man(a)");
    assert_eq!(expr.get_type(), Ok(T));
}

#[test]
fn parse_unclosed_bracket() {
    let err = parse_error("P(a");
    assert!(err.is_syntax_error(), "got {err:?}");
}

#[test]
fn parse_trailing_bracket() {
    let err = parse_error("P(a))");
    assert!(matches!(err, ParseError::BadCharacter { found: ')', position: 4, .. }), "got {err:?}");
}

#[test]
fn parse_ill_typed_input() {
    let err = parse_error("a(b)");
    let ParseError::Type(err) = err else {
        panic!("expected a type error, got {err:?}");
    };
    assert!(err.to_string().contains('a'));
}

#[test]
fn parse_single_letter_identifiers() {
    let mut options = ParseOptions::new().single_letter_identifiers(true);
    let expr = parse("Rxy", &mut options).unwrap();
    assert_eq!(expr, parse_unicode("R(x, y)"));
}

#[test]
fn parse_whitespace_application_outside_binders() {
    assert_eq!(parse_unicode("P a"), parse_unicode("P(a)"));
    assert!(parse("λx.P x", &mut ParseOptions::new()).is_err());
}

#[test]
fn parse_with_custom_conventions() {
    let typer = IdentifierTyper::from_conventions(
        "constants of type <e,t>: man, woman\nvariables of type e: x-z\nconstants of type e: a-e",
    )
    .unwrap();
    let mut options = ParseOptions::new().typer(typer);
    let expr = parse("∃x.man(x) ∧ ¬woman(x)", &mut options).unwrap();
    assert_eq!(expr.get_type(), Ok(T));
    assert_eq!(parse("man", &mut options).unwrap().get_type(), Ok(et()));
}

#[test]
fn parse_binder_variable_does_not_leak() {
    let typer = IdentifierTyper::from_conventions("constants of type <e,t>: P").unwrap();
    let mut options = ParseOptions::new().typer(typer);
    let err = parse("(λx_e.P(x))(x)", &mut options).unwrap_err();
    assert!(matches!(err, ParseError::IdentifierTypeUnknown { ref identifier, .. } if identifier == "x"), "got {err:?}");
}
