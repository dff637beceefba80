use std::fmt;

use serde::{
    de::{self, Deserializer},
    ser::{SerializeStruct, Serializer},
    Deserialize, Serialize,
};
use serde_json::{json, Map, Value};

use crate::errors::DecodeError;

const TAG_MONEY: &str = "money";
const TAG_TIME: &str = "time";
const TAG_NUMERIC: &str = "numeric";

/// Describes what a budget measures.
///
/// On the wire every variant is a two-field object, `{"type": <tag>, "value": <payload>}`,
/// where the tag is one of `money`, `time` or `numeric`. The variants share the `value`
/// field, so (de)serialization is written out by hand instead of derived.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BudgetUnit {
    Money { currency: String },
    Time { unit: String },
    Numeric { unit: String },
}

impl BudgetUnit {
    pub fn money(currency: impl Into<String>) -> Self {
        BudgetUnit::Money {
            currency: currency.into(),
        }
    }

    pub fn time(unit: impl Into<String>) -> Self {
        BudgetUnit::Time { unit: unit.into() }
    }

    pub fn numeric(unit: impl Into<String>) -> Self {
        BudgetUnit::Numeric { unit: unit.into() }
    }

    /// Builds a unit from its wire tag and payload.
    pub fn from_parts(tag: &str, value: impl Into<String>) -> Result<Self, DecodeError> {
        match tag {
            TAG_MONEY => Ok(Self::money(value)),
            TAG_TIME => Ok(Self::time(value)),
            TAG_NUMERIC => Ok(Self::numeric(value)),
            other => Err(DecodeError::UnknownTag(other.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BudgetUnit::Money { .. } => TAG_MONEY,
            BudgetUnit::Time { .. } => TAG_TIME,
            BudgetUnit::Numeric { .. } => TAG_NUMERIC,
        }
    }

    /// Returns the currency code or unit label carried by the variant.
    pub fn value(&self) -> &str {
        match self {
            BudgetUnit::Money { currency } => currency,
            BudgetUnit::Time { unit } | BudgetUnit::Numeric { unit } => unit,
        }
    }

    pub fn encode(&self) -> Value {
        json!({ "type": self.tag(), "value": self.value() })
    }

    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let tag = string_field(object, "type")?;
        let payload = string_field(object, "value")?;
        Self::from_parts(tag, payload)
    }

    pub fn to_json(&self) -> String {
        self.encode().to_string()
    }

    pub fn from_json(input: &str) -> Result<Self, DecodeError> {
        let value: Value =
            serde_json::from_str(input).map_err(|err| DecodeError::Syntax(err.to_string()))?;
        Self::decode(&value)
    }
}

fn string_field<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    object
        .get(field)
        .ok_or(DecodeError::MissingField(field))?
        .as_str()
        .ok_or(DecodeError::NotAString(field))
}

impl fmt::Display for BudgetUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.tag(), self.value())
    }
}

impl Serialize for BudgetUnit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("BudgetUnit", 2)?;
        state.serialize_field("type", self.tag())?;
        state.serialize_field("value", self.value())?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for BudgetUnit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        BudgetUnit::decode(&value).map_err(de::Error::custom)
    }
}
