//! Payload validation.
//!
//! Every request body is checked against a schema before it reaches the
//! catalog. A schema walks a JSON candidate field by field, collecting the
//! first violated constraint for each field, and either yields the typed input
//! or a [`ValidationError`] listing every offending field.

pub mod schemas;

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub use schemas::{
    BillboardInput, CategoryInput, ColorInput, ImageInput, ProductInput, SettingsInput, SizeInput,
    StoreInput,
};

/// Key used when the candidate itself (not one of its fields) is invalid.
pub const ROOT_FIELD: &str = "_root";

/// Structured validation failure: field name -> violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub field_errors: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn root(message: impl Into<String>) -> Self {
        let mut field_errors = BTreeMap::new();
        field_errors.insert(ROOT_FIELD.to_string(), message.into());
        Self { field_errors }
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.field_errors.get(name).map(String::as_str)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .field_errors
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// A schema that can turn an untyped JSON candidate into a typed input.
pub trait Validate: Sized {
    fn validate(candidate: &Value) -> Result<Self, ValidationError>;
}

/// Constraint applied to a string field.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    MinLen(usize),
    MaxLen(usize),
    StartsWith(&'static str, &'static str),
}

impl Rule {
    fn check(&self, value: &str) -> Option<String> {
        let len = value.chars().count();
        match *self {
            Rule::MinLen(min) if len < min => {
                Some(format!("String must contain at least {} character(s)", min))
            }
            Rule::MaxLen(max) if len > max => {
                Some(format!("String must contain at most {} character(s)", max))
            }
            Rule::StartsWith(prefix, message) if !value.starts_with(prefix) => Some(message.to_string()),
            _ => None,
        }
    }
}

/// Field-by-field reader over a JSON object that records violations as it goes.
///
/// Accessors always return a value (a neutral default when the field is
/// invalid) so a schema can read every field and report all failures at once;
/// [`Candidate::finish`] decides whether the result may be used.
pub struct Candidate<'a> {
    object: &'a Map<String, Value>,
    errors: BTreeMap<String, String>,
}

impl<'a> Candidate<'a> {
    pub fn new(value: &'a Value) -> Result<Self, ValidationError> {
        match value {
            Value::Object(object) => Ok(Self {
                object,
                errors: BTreeMap::new(),
            }),
            other => Err(ValidationError::root(format!(
                "Expected object, received {}",
                type_name(other)
            ))),
        }
    }

    pub fn string(&mut self, field: &str, rules: &[Rule]) -> String {
        let object = self.object;
        let raw = match object.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, "Required");
                return String::new();
            }
            Some(Value::String(s)) => s,
            Some(other) => {
                self.reject(field, format!("Expected string, received {}", type_name(other)));
                return String::new();
            }
        };

        if let Some(message) = rules.iter().find_map(|rule| rule.check(raw)) {
            self.reject(field, message);
        }
        raw.clone()
    }

    pub fn uuid(&mut self, field: &str) -> Uuid {
        let raw = self.string(field, &[Rule::MinLen(1)]);
        if self.errors.contains_key(field) {
            return Uuid::nil();
        }
        match Uuid::parse_str(raw.trim()) {
            Ok(id) => id,
            Err(_) => {
                self.reject(field, "Invalid uuid");
                Uuid::nil()
            }
        }
    }

    /// Accepts a JSON number or a numeric string, like a coercing number field.
    ///
    /// The value must be positive, below `upper`, and carry no more than
    /// `max_scale` significant decimal places.
    pub fn positive_decimal(&mut self, field: &str, max_scale: u32, upper: Decimal) -> Decimal {
        let object = self.object;
        let parsed = match object.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, "Required");
                return Decimal::ZERO;
            }
            Some(Value::Number(n)) => parse_decimal(&n.to_string()),
            Some(Value::String(s)) => parse_decimal(s.trim()),
            Some(other) => {
                self.reject(field, format!("Expected number, received {}", type_name(other)));
                return Decimal::ZERO;
            }
        };

        match parsed {
            Some(value) if value <= Decimal::ZERO => {
                self.reject(field, "Number must be greater than 0");
                Decimal::ZERO
            }
            Some(value) if value >= upper => {
                self.reject(field, format!("Number must be less than {}", upper));
                Decimal::ZERO
            }
            Some(value) if value.normalize().scale() > max_scale => {
                self.reject(field, format!("Number must have at most {} decimal place(s)", max_scale));
                Decimal::ZERO
            }
            Some(value) => value,
            None => {
                self.reject(field, "Expected number, received nan");
                Decimal::ZERO
            }
        }
    }

    pub fn boolean(&mut self, field: &str, default: bool) -> bool {
        let object = self.object;
        match object.get(field) {
            None | Some(Value::Null) => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.reject(field, format!("Expected boolean, received {}", type_name(other)));
                default
            }
        }
    }

    /// Reads an array of objects, validating each element with `parse`.
    /// Element errors are reported as `field.index.child`.
    pub fn objects<T>(
        &mut self,
        field: &str,
        min_items: usize,
        parse: impl Fn(&mut Candidate<'a>) -> T,
    ) -> Vec<T> {
        let object = self.object;
        let items = match object.get(field) {
            None | Some(Value::Null) => {
                self.reject(field, "Required");
                return Vec::new();
            }
            Some(Value::Array(items)) => items,
            Some(other) => {
                self.reject(field, format!("Expected array, received {}", type_name(other)));
                return Vec::new();
            }
        };

        if items.len() < min_items {
            self.reject(field, format!("Array must contain at least {} element(s)", min_items));
        }

        let mut parsed = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match Candidate::new(item) {
                Ok(mut child) => {
                    parsed.push(parse(&mut child));
                    for (child_field, message) in child.errors {
                        self.reject(&format!("{}.{}.{}", field, index, child_field), message);
                    }
                }
                Err(err) => {
                    let message = err.field(ROOT_FIELD).unwrap_or("Invalid element").to_string();
                    self.reject(&format!("{}.{}", field, index), message);
                }
            }
        }
        parsed
    }

    /// Returns the collected violations, if any.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                field_errors: self.errors,
            })
        }
    }

    fn reject(&mut self, field: &str, message: impl Into<String>) {
        // Keep the first violation per field
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_candidate_is_rejected_at_root() {
        let err = Candidate::new(&json!([1, 2])).err().unwrap();
        assert_eq!(err.field(ROOT_FIELD), Some("Expected object, received array"));
    }

    #[test]
    fn first_violation_per_field_wins() {
        let value = json!({ "value": "ab" });
        let mut c = Candidate::new(&value).unwrap();
        c.string("value", &[Rule::MinLen(4), Rule::StartsWith("#", "needs hash")]);
        let err = c.finish().unwrap_err();
        assert_eq!(err.field("value"), Some("String must contain at least 4 character(s)"));
    }

    #[test]
    fn wrong_type_is_reported() {
        let value = json!({ "name": 42 });
        let mut c = Candidate::new(&value).unwrap();
        c.string("name", &[]);
        assert_eq!(
            c.finish().unwrap_err().field("name"),
            Some("Expected string, received number")
        );
    }

    #[test]
    fn decimal_accepts_numeric_strings() {
        let value = json!({ "a": "19.99", "b": 5, "c": "abc", "d": 0 });
        let upper = Decimal::from(1000);
        let mut c = Candidate::new(&value).unwrap();
        assert_eq!(c.positive_decimal("a", 2, upper), Decimal::from_str("19.99").unwrap());
        assert_eq!(c.positive_decimal("b", 2, upper), Decimal::from(5));
        c.positive_decimal("c", 2, upper);
        c.positive_decimal("d", 2, upper);
        let err = c.finish().unwrap_err();
        assert_eq!(err.field("c"), Some("Expected number, received nan"));
        assert_eq!(err.field("d"), Some("Number must be greater than 0"));
        assert!(err.field("a").is_none());
    }

    #[test]
    fn decimal_respects_scale_and_upper_bound() {
        let value = json!({
            "trailing": "19.990",
            "fine": 0.05,
            "precise": "19.999",
            "edge": 1000,
            "huge": 1e12,
            "below": "999.99"
        });
        let upper = Decimal::from(1000);
        let mut c = Candidate::new(&value).unwrap();
        assert_eq!(c.positive_decimal("trailing", 2, upper), Decimal::from_str("19.990").unwrap());
        assert_eq!(c.positive_decimal("fine", 2, upper), Decimal::from_str("0.05").unwrap());
        assert_eq!(c.positive_decimal("below", 2, upper), Decimal::from_str("999.99").unwrap());
        c.positive_decimal("precise", 2, upper);
        c.positive_decimal("edge", 2, upper);
        c.positive_decimal("huge", 2, upper);
        let err = c.finish().unwrap_err();
        assert_eq!(err.field_errors.len(), 3);
        assert_eq!(err.field("precise"), Some("Number must have at most 2 decimal place(s)"));
        assert_eq!(err.field("edge"), Some("Number must be less than 1000"));
        assert_eq!(err.field("huge"), Some("Number must be less than 1000"));
    }

    #[test]
    fn nested_errors_carry_their_path() {
        let value = json!({ "images": [{ "url": "x" }, { "url": "" }, 3] });
        let mut c = Candidate::new(&value).unwrap();
        let urls = c.objects("images", 1, |image| image.string("url", &[Rule::MinLen(1)]));
        assert_eq!(urls.len(), 2);
        let err = c.finish().unwrap_err();
        assert_eq!(
            err.field("images.1.url"),
            Some("String must contain at least 1 character(s)")
        );
        assert_eq!(err.field("images.2"), Some("Expected object, received number"));
    }

    #[test]
    fn display_lists_fields() {
        let value = json!({});
        let mut c = Candidate::new(&value).unwrap();
        c.string("label", &[]);
        let err = c.finish().unwrap_err();
        assert_eq!(err.to_string(), "label: Required");
    }
}
