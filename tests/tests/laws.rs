//! Properties that hold for every contract, checked over small value sets.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use vouch_tests::prelude::*;

fn named(name: &str) -> Arc<dyn Constraint> {
    Type::named(name).unwrap().into_shared()
}

fn samples() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Int(7),
        Value::from(""),
        Value::from("gear"),
        Value::list([1, 2]),
        Value::from(map! { "name" => "gear", "teeth" => 12 }),
        Value::from(Object::new("Gear").with_field("name", "gear").with_field("teeth", 12)),
        Value::from(Object::new("Gear").with_field("name", 3)),
    ]
}

fn gear() -> Contract {
    let contract = Contract::new();
    contract
        .add_constraint(Presence::new().into_shared())
        .add_property_constraint(["name"], named("String"))
        .unwrap()
        .add_property_constraint(["teeth"], Type::named("Integer").unwrap().optional().into_shared())
        .unwrap();
    contract
}

#[test]
fn test_evaluate_agrees_with_matches_and_errors_for() {
    init_tracing();
    let contract = gear();

    for value in samples() {
        let (status, errors) = contract.evaluate(&value);

        assert_eq!(status, contract.matches(&value), "value {}", value);
        assert_eq!(status, errors.is_empty(), "value {}", value);
        if !status {
            assert_eq!(errors, contract.errors_for(&value), "value {}", value);
        }
        assert_eq!(contract.evaluate(&value), (status, errors), "repeated {}", value);
    }
}

#[test]
fn test_aggregation_over_definitions() {
    let contract = gear();

    for value in samples() {
        let combined = contract
            .each_pair(&value)
            .into_iter()
            .all(|(definition, mapped)| definition.constraint.matches(&mapped));

        assert_eq!(contract.matches(&value), combined, "value {}", value);
    }
}

#[test]
fn test_records_appear_under_enclosing_scope() {
    // GIVEN
    let inner = Contract::new();
    inner.add_property_constraint(["name"], named("String")).unwrap();
    let outer = MapContract::new();
    outer.add_key("part", inner.shared()).unwrap();
    let value = Value::from(map! {
        "part" => Object::new("Gear").with_field("name", 3),
    });

    // WHEN
    let (_, errors) = outer.evaluate(&value);

    // THEN
    assert_eq!(expect(&errors).paths(), vec![path!["part", "name"]]);
}

#[test]
fn test_included_contract_changes_are_seen() {
    // GIVEN
    let base = Contract::new();
    let derived = Contract::new();
    derived.include(&base).unwrap();
    let value = Value::from(Object::new("Gear").with_field("name", 3));
    assert!(derived.matches(&value));

    // WHEN
    base.add_property_constraint(["name"], named("String")).unwrap();

    // THEN
    assert!(!derived.matches(&value));
    assert_eq!(derived.each_definition().len(), 1);
}

#[test]
fn test_non_map_yields_one_structural_record() -> MatchResult<()> {
    let contract = MapContract::new();
    contract.add_key("name", named("String")).unwrap();
    contract.add_key("teeth", named("Integer")).unwrap();

    for value in [Value::Null, Value::Int(1), Value::from("gear"), Value::list([1])] {
        let errors = expect_no_match(&contract, &value)?;
        expect(&errors).to_have([ErrorRecord::new(tokens::IS_NOT_TYPE)
            .with_data(data([
                ("type", Value::from("Hash")),
                ("required", Value::Bool(true)),
            ]))])?;
    }
    Ok(())
}

#[test]
fn test_negation_is_the_complement_for_simple_constraints() {
    let constraints: Vec<Arc<dyn Constraint>> = vec![
        Presence::new().into_shared(),
        named("String"),
        Enum::new(["gear"]).unwrap().into_shared(),
        Format::substring("ea").into_shared(),
    ];

    for constraint in &constraints {
        for value in samples() {
            assert_eq!(
                constraint.does_not_match(&value),
                !constraint.matches(&value),
                "{:?} on {}",
                constraint,
                value
            );
        }
    }
}

#[test]
fn test_negation_over_definitions() {
    // GIVEN
    let contract = Contract::new();
    contract
        .add_sanity_constraint(named("Hash"))
        .add_definition(named("String"), DefinitionOptions::new().mapped(Mapping::key("name")))
        .add_definition(named("Integer"), DefinitionOptions::new().mapped(Mapping::key("teeth")));
    let values = [
        Value::from(map! { "name" => "gear", "teeth" => 12 }),
        Value::from(map! { "name" => 3, "teeth" => 12 }),
        Value::from(map! { "name" => 3, "teeth" => "x" }),
        Value::from(map! {}),
    ];

    for value in values {
        // WHEN
        let (status, errors) = contract.evaluate_negated(&value);

        // THEN
        let every_pair_negated = contract
            .each_pair(&value)
            .iter()
            .all(|(definition, mapped)| definition.constraint.does_not_match(mapped));
        assert_eq!(contract.does_not_match(&value), every_pair_negated, "value {}", value);
        assert_eq!(status, every_pair_negated, "value {}", value);
        assert_eq!(status, errors.is_empty(), "value {}", value);
    }
}

#[test]
fn test_shared_contract_evaluates_concurrently() {
    // GIVEN
    let contract = MapContract::new();
    contract.add_key("name", named("String")).unwrap();
    contract.add_optional_key("teeth", named("Integer")).unwrap();
    let values = [
        Value::from(map! { "name" => "gear", "teeth" => 12 }),
        Value::from(map! { "name" => 3, "teeth" => "x" }),
        Value::from(map! { "teeth" => 12, "size" => 4 }),
        Value::Int(1),
    ];
    let expected: Vec<(bool, Errors)> = values.iter().map(|v| contract.evaluate(v)).collect();

    // WHEN
    let results: Vec<Vec<(bool, Errors)>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let mut seen: Vec<(bool, Errors)> = Vec::new();
                    for _ in 0..50 {
                        seen = values.iter().map(|v| contract.evaluate(v)).collect();
                    }
                    seen
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // THEN
    assert_eq!(results.len(), 8);
    for seen in results {
        assert_eq!(seen, expected);
    }
}
