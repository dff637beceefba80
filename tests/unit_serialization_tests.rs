use budget_model::{budget::BudgetUnit, errors::DecodeError};
use serde_json::json;

#[test]
fn every_variant_round_trips() {
    let units = [
        BudgetUnit::money("USD"),
        BudgetUnit::money(""),
        BudgetUnit::time("minutes"),
        BudgetUnit::time("lunar cycles ☾"),
        BudgetUnit::numeric("pages"),
        BudgetUnit::numeric("\"quoted\" \\ value"),
    ];
    for unit in units {
        assert_eq!(BudgetUnit::decode(&unit.encode()).unwrap(), unit);
        assert_eq!(BudgetUnit::from_json(&unit.to_json()).unwrap(), unit);
    }
}

#[test]
fn wire_format_uses_exact_field_and_tag_names() {
    assert_eq!(
        BudgetUnit::money("EUR").encode(),
        json!({ "type": "money", "value": "EUR" })
    );
    assert_eq!(
        BudgetUnit::time("hours").encode(),
        json!({ "type": "time", "value": "hours" })
    );
    assert_eq!(
        BudgetUnit::numeric("km").encode(),
        json!({ "type": "numeric", "value": "km" })
    );
}

#[test]
fn decode_failures_are_classified() {
    let cases = [
        (json!("money"), DecodeError::NotAnObject),
        (json!({ "value": "USD" }), DecodeError::MissingField("type")),
        (json!({ "type": "money" }), DecodeError::MissingField("value")),
        (
            json!({ "type": "money", "value": null }),
            DecodeError::NotAString("value"),
        ),
        (
            json!({ "type": 1, "value": "USD" }),
            DecodeError::NotAString("type"),
        ),
        (
            json!({ "type": "Money", "value": "USD" }),
            DecodeError::UnknownTag("Money".into()),
        ),
    ];
    for (input, expected) in cases {
        assert_eq!(BudgetUnit::decode(&input).unwrap_err(), expected, "{input}");
    }
}

#[test]
fn malformed_text_is_a_syntax_error() {
    let err = BudgetUnit::from_json("{\"type\": \"money\"").unwrap_err();
    assert!(matches!(err, DecodeError::Syntax(_)));
}

#[test]
fn extra_fields_are_ignored() {
    let unit = BudgetUnit::decode(&json!({ "type": "time", "value": "h", "note": 1 })).unwrap();
    assert_eq!(unit, BudgetUnit::time("h"));
}
