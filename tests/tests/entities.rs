//! Entities built from attribute definitions and JSON schemas.

use pretty_assertions::assert_eq;
use vouch_tests::prelude::*;

fn book() -> Entity {
    let isbn = Format::pattern(r"^\d{13}$").unwrap().with_message("must be 13 digits");
    EntityDef::new("Book")
        .known_class("Author")
        .attribute(AttrDef::new("title", "String"))
        .attribute(AttrDef::new("isbn", "String"))
        .attribute(AttrDef::new("author", "Author"))
        .attribute(AttrDef::new("rating", "Integer").nullable())
        .constraint(["title"], Presence::new().into_shared())
        .constraint(["isbn"], isbn.into_shared())
        .constraint(["author", "name"], Presence::new().into_shared())
        .build()
        .unwrap()
}

fn author(name: &str) -> Object {
    Object::new("Author").with_field("name", name)
}

#[test]
fn test_valid_book() {
    init_tracing();
    let record = Object::new("Book")
        .with_field("title", "Dune")
        .with_field("isbn", "9780441013593")
        .with_field("author", author("Frank Herbert"));

    assert!(book().is_valid(&Value::from(record)));
}

#[test]
fn test_messages_for_invalid_book() -> MatchResult<()> {
    // GIVEN
    let record = Object::new("Book")
        .with_field("title", "")
        .with_field("isbn", "978-0441013593")
        .with_field("author", author(""))
        .with_field("rating", "five");

    // WHEN
    let (valid, errors) = book().validate(&Value::from(record));
    let errors = errors.with_messages(&DefaultMessages::new());

    // THEN
    assert!(!valid);
    assert_eq!(
        errors.to_string(),
        [
            "rating: must be of type Integer",
            "title: must be present",
            "isbn: must be 13 digits",
            "author.name: must be present",
        ]
        .join("\n")
    );
    expect(&errors).to_include_at(&path!["isbn"], tokens::DOES_NOT_MATCH_FORMAT)?;
    Ok(())
}

#[test]
fn test_entity_contract_nests_in_map_contracts() -> MatchResult<()> {
    // GIVEN
    let shelf = MapContract::new();
    shelf.add_key("featured", book().contract().shared()).unwrap();

    // WHEN
    let errors = expect_no_match(&shelf, &Value::from(map! { "featured" => Object::new("Magazine") }))?;

    // THEN - the class check stops the walk into attributes
    expect(&errors)
        .to_have_len(1)?
        .to_include_at(&path!["featured"], tokens::IS_NOT_TYPE)?;
    Ok(())
}

#[test]
fn test_schema_from_json() -> Result<(), Box<dyn std::error::Error>> {
    // GIVEN
    let schema = serde_json::json!({
        "class": "Review",
        "known_classes": ["Book"],
        "attributes": [
            {"name": "book", "type": "Book"},
            {"name": "stars", "type": "Integer"},
            {"name": "comment", "type": "String", "nullable": true},
        ],
    });

    // WHEN
    let review = EntityDef::from_json(&schema.to_string())?
        .constraint(["stars"], Enum::new([1, 2, 3, 4, 5])?.into_shared())
        .build()?;

    // THEN
    let record = Object::new("Review")
        .with_field("book", Object::new("Book"))
        .with_field("stars", 7);
    let (valid, errors) = review.validate(&Value::from(record));
    assert!(!valid);
    expect(&errors)
        .to_have_len(1)?
        .to_include_at(&path!["stars"], tokens::IS_NOT_IN_LIST)?;
    Ok(())
}
