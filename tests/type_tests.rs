use lambdacalc::parser::ParseError;
use lambdacalc::typer::IdentifierTyper;
use lambdacalc::types::{E, N, T, Type, TypeError, TypeSubstitution, TypeVar, align_types, aligned_type, parse_type};

fn et() -> Type {
    Type::composite(E, T)
}

#[test]
fn type_parse_bracketed() {
    assert_eq!(parse_type("e"), Ok(E));
    assert_eq!(parse_type("<e,t>"), Ok(et()));
    assert_eq!(parse_type("<e,<e,t>>"), Ok(Type::composite(E, et())));
    assert_eq!(parse_type("<<e,t>,t>"), Ok(Type::composite(et(), T)));
}

#[test]
fn type_parse_juxtaposition() {
    assert_eq!(parse_type("et"), parse_type("<e,t>"));
    assert_eq!(parse_type("<e,et>"), parse_type("<e,<e,t>>"));
}

#[test]
fn type_parse_products_and_variables() {
    assert_eq!(
        parse_type("<e*e,t>"),
        Ok(Type::composite(Type::product(vec![E, E]), T))
    );
    assert_eq!(
        parse_type("<'a,t>"),
        Ok(Type::composite(Type::var('a'), T))
    );
}

#[test]
fn type_parse_errors() {
    for bad in ["", "<e,t", "e,t>", "<e,t,t>", "<e>", "e*", "E"] {
        let result = parse_type(bad);
        assert!(result.is_err(), "{bad:?} parsed as {result:?}");
    }
    assert!(matches!(parse_type("E"), Err(ParseError::BadCharacter { found: 'E', .. })));
}

#[test]
fn type_pretty_print_round_trip() {
    for text in ["e", "<e,t>", "<e,<e,t>>", "<e*e,t>", "<'a,<'b,t>>", "<<e,t>,<<e,t>,t>>"] {
        let ty = parse_type(text).unwrap();
        assert_eq!(ty.to_string(), text);
        assert_eq!(parse_type(&ty.to_string()), Ok(ty));
    }
}

#[test]
fn type_matches_is_one_directional() {
    let general = Type::composite(Type::var('a'), T);
    assert!(general.matches(&et()));
    assert!(!et().matches(&general));
    assert!(et().matches(&et()));
    assert_ne!(general, et());
}

#[test]
fn type_align_simple() {
    let subst = align_types(&Type::composite(Type::var('a'), T), &et()).unwrap();
    assert_eq!(subst, TypeSubstitution::singleton(TypeVar('a'), E));
    assert_eq!(subst.to_string(), "{'a -> e}");
}

#[test]
fn type_align_inconsistent() {
    let formal = Type::composite(Type::var('a'), Type::var('a'));
    let err = align_types(&formal, &et()).unwrap_err();
    assert!(matches!(err, TypeError::Alignment { .. }), "got {err:?}");
}

#[test]
fn type_align_shape_mismatch() {
    assert!(align_types(&et(), &E).is_err());
    assert!(align_types(&E, &T).is_err());
    let pair = Type::product(vec![E, E]);
    let triple = Type::product(vec![E, E, E]);
    assert!(align_types(&pair, &triple).is_err());
}

#[test]
fn type_aligned_type() {
    let formal = Type::composite(Type::var('a'), Type::composite(Type::var('b'), T));
    let actual = Type::composite(E, Type::composite(N, T));
    let subst = align_types(&formal, &actual).unwrap();
    assert_eq!(aligned_type(&Type::var('b'), &subst), N);
    assert_eq!(aligned_type(&formal, &subst), actual);
}

#[test]
fn typer_defaults() {
    let typer = IdentifierTyper::default();
    assert_eq!(typer.type_of("a"), Some(&E));
    assert_eq!(typer.type_of("x''"), Some(&E));
    assert_eq!(typer.is_variable("x"), Some(true));
    assert_eq!(typer.type_of("R"), Some(&Type::composite(Type::product(vec![E, E]), T)));
    assert_eq!(typer.type_of("X"), Some(&et()));
    assert_eq!(typer.type_of("man"), None);
    assert_eq!(typer.type_of("f"), None);
}

#[test]
fn typer_conventions_override_in_order() {
    let typer = IdentifierTyper::from_conventions(
        "# sample\nconstants of type e: a-e\nconstant of type <e,t>: a  # overrides a\nvariables of type <e,<e,t>>: f\n",
    )
    .unwrap();
    assert_eq!(typer.type_of("a"), Some(&et()));
    assert_eq!(typer.type_of("b"), Some(&E));
    assert_eq!(typer.is_variable("f"), Some(true));
    assert_eq!(typer.type_of("f"), Some(&Type::composite(E, et())));
}

#[test]
fn typer_conventions_errors_name_the_line() {
    let err = IdentifierTyper::from_conventions("constants of type e: a-e\nfunctions of type e: f").unwrap_err();
    assert_eq!(err.line, 2);
    let err = IdentifierTyper::from_conventions("constants of type <e: a").unwrap_err();
    assert_eq!(err.line, 1);
}
