//! Call-signature contracts composed with other contracts.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use vouch_tests::prelude::*;

fn named(name: &str) -> Arc<dyn Constraint> {
    Type::named(name).unwrap().into_shared()
}

// paint(color, *layers, opacity: 1.0, &callback)
fn paint() -> SignatureContract {
    let colors = Enum::new(["red", "green", "blue"]).unwrap().into_shared();
    let layer = MapContract::indifferent();
    layer.add_key("name", named("String")).unwrap();

    let signature = SignatureContract::new();
    signature
        .add_argument("color", colors)
        .unwrap()
        .set_arguments_item(layer.shared())
        .unwrap()
        .add_optional_keyword("opacity", named("Float"))
        .unwrap()
        .set_block(true)
        .unwrap();
    signature
}

fn callback() -> Callable {
    Callable::new("done", 0)
}

#[test]
fn test_valid_call_with_layers() -> MatchResult<()> {
    let call = Arguments::new()
        .arg("red")
        .arg(map! { "name" => "base" })
        .arg(Map::new().with(Value::symbol("name"), "glaze"))
        .keyword("opacity", 0.5)
        .block(callback());

    expect_match(&paint(), &call.into())
}

#[test]
fn test_nested_errors_are_located() -> MatchResult<()> {
    // GIVEN
    let call = Arguments::new()
        .arg("teal")
        .arg(map! { "name" => "base" })
        .arg(map! { "title" => "glaze" })
        .block(callback());

    // WHEN
    let errors = expect_no_match(&paint(), &call.into())?;

    // THEN
    assert_eq!(
        expect(&errors).paths(),
        vec![
            path!["arguments", 0usize],
            path!["arguments", 2usize, "title"],
            path!["arguments", 2usize, "name"],
        ]
    );
    expect(&errors)
        .to_include_at(&path!["arguments", 0usize], tokens::IS_NOT_IN_LIST)?
        .to_include_at(&path!["arguments", 2usize, "title"], tokens::EXTRA_KEYS)?;
    Ok(())
}

#[test]
fn test_unknown_keyword_and_missing_block() -> MatchResult<()> {
    let call = Arguments::new().arg("blue").keyword("gloss", true);

    let errors = expect_no_match(&paint(), &call.into())?;

    expect(&errors)
        .to_have_len(2)?
        .to_include_at(&path!["keywords", "gloss"], tokens::EXTRA_KEYS)?
        .to_include_at(&path!["block"], tokens::IS_NOT_TYPE)?;
    Ok(())
}

#[test]
fn test_signature_as_map_value() -> MatchResult<()> {
    // GIVEN - a registry of handlers, each described by its call
    let handlers = MapContract::new();
    handlers.add_key("on_paint", paint().shared()).unwrap();
    let good = Arguments::new().arg("green").block(callback());
    let bad = Arguments::new().block(callback());

    // THEN
    expect_match(&handlers, &Value::from(map! { "on_paint" => good }))?;
    let errors = expect_no_match(&handlers, &Value::from(map! { "on_paint" => bad }))?;
    expect(&errors).to_include_at(&path!["on_paint", "arguments", 0usize], tokens::MISSING_ITEM)?;
    Ok(())
}
