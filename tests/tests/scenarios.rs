//! End-to-end validation scenarios over the built-in constraints and contracts.

use vouch_tests::prelude::*;

fn named(name: &str) -> std::sync::Arc<dyn Constraint> {
    Type::named(name).unwrap().into_shared()
}

mod enumeration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_member_matches() -> MatchResult<()> {
        let colors = Enum::new(["red", "green", "blue"]).unwrap();

        expect_match(&colors, &Value::from("red"))
    }

    #[test]
    fn test_non_member_reports_allowed_values() -> MatchResult<()> {
        // GIVEN
        let colors = Enum::new(["red", "green", "blue"]).unwrap();

        // WHEN
        let errors = expect_no_match(&colors, &Value::from("yellow"))?;

        // THEN
        expect(&errors).to_have_len(1)?;
        let record = errors.iter().next().unwrap();
        assert_eq!(record.kind, tokens::IS_NOT_IN_LIST);
        assert_eq!(record.data["values"], Value::list(["red", "green", "blue"]));
        Ok(())
    }
}

mod sequence {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair() -> SequenceContract {
        let contract = SequenceContract::new();
        contract.add_item(named("Integer")).unwrap();
        contract.add_item(named("Integer")).unwrap();
        contract
    }

    #[test]
    fn test_short_sequence_reports_missing_item() -> MatchResult<()> {
        let errors = expect_no_match(&pair(), &Value::list([1]))?;

        expect(&errors).to_have([ErrorRecord::new(tokens::MISSING_ITEM).at(path![1usize])])?;
        Ok(())
    }

    #[test]
    fn test_long_sequence_reports_extra_item() -> MatchResult<()> {
        let errors = expect_no_match(&pair(), &Value::list([1, 2, 3]))?;

        expect(&errors)
            .to_have_len(1)?
            .to_include_at(&path![2usize], tokens::EXTRA_ITEMS)?;
        assert_eq!(errors.iter().next().unwrap().data["value"], Value::Int(3));
        Ok(())
    }

    #[test]
    fn test_exact_sequence_matches() -> MatchResult<()> {
        expect_match(&pair(), &Value::list([1, 2]))
    }
}

mod mapping {
    use super::*;

    fn record() -> MapContract {
        let contract = MapContract::new();
        contract.add_key("a", named("Integer")).unwrap();
        contract.add_key("b", named("Integer")).unwrap();
        contract
    }

    #[test]
    fn test_registered_keys_match() -> MatchResult<()> {
        expect_match(&record(), &Value::from(map! { "a" => 1, "b" => 2 }))
    }

    #[test]
    fn test_extra_key_reported_at_key() -> MatchResult<()> {
        let errors = expect_no_match(&record(), &Value::from(map! { "a" => 1, "b" => 2, "c" => 3 }))?;

        expect(&errors)
            .to_have_len(1)?
            .to_include_at(&path!["c"], tokens::EXTRA_KEYS)?;
        Ok(())
    }
}

mod property_path {
    use super::*;

    fn widget(address: &str) -> Value {
        let factory = Object::new("Factory").with_field("address", address);
        let manufacturer = Object::new("Manufacturer").with_field("factory", factory);
        Value::from(Object::new("Widget").with_field("manufacturer", manufacturer))
    }

    fn contract() -> Contract {
        let contract = Contract::new();
        contract
            .add_property_constraint(
                ["manufacturer", "factory", "address"],
                Equality::new("1 Main St").into_shared(),
            )
            .unwrap();
        contract
    }

    #[test]
    fn test_matching_leaf() -> MatchResult<()> {
        let (status, errors) = contract().evaluate(&widget("1 Main St"));

        assert!(status);
        expect(&errors).to_be_empty()?;
        Ok(())
    }

    #[test]
    fn test_differing_leaf_reported_at_full_path() -> MatchResult<()> {
        let errors = expect_no_match(&contract(), &widget("2 Side Rd"))?;

        expect(&errors)
            .to_have_len(1)?
            .to_include_at(
                &path!["manufacturer", "factory", "address"],
                tokens::IS_NOT_EQUAL_TO,
            )?;
        Ok(())
    }

    #[test]
    fn test_missing_link_reads_as_nil() -> MatchResult<()> {
        let record = Value::from(Object::new("Widget"));

        let errors = expect_no_match(&contract(), &record)?;

        expect(&errors).to_include_at(
            &path!["manufacturer", "factory", "address"],
            tokens::IS_NOT_EQUAL_TO,
        )?;
        Ok(())
    }
}

mod union {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text() -> Union {
        Union::new(vec![named("String"), named("Symbol")]).unwrap()
    }

    #[test]
    fn test_any_member_matches() -> MatchResult<()> {
        expect_match(&text(), &Value::symbol("ok"))
    }

    #[test]
    fn test_no_member_lists_every_descriptor() -> MatchResult<()> {
        // WHEN
        let errors = expect_no_match(&text(), &Value::Int(3))?;

        // THEN
        expect(&errors).to_have_len(1)?;
        let record = errors.iter().next().unwrap();
        assert_eq!(record.kind, tokens::IS_NOT_IN_UNION);
        let descriptors = record.data["constraints"].as_list().unwrap();
        assert_eq!(descriptors.len(), 2);
        for descriptor in descriptors {
            assert_eq!(
                descriptor.lookup(&Value::symbol("type"), false),
                Some(&Value::from(tokens::IS_NOT_TYPE))
            );
        }
        Ok(())
    }
}
