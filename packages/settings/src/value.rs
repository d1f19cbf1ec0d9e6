// ABOUTME: Typed runtime values for settings
// ABOUTME: Conversions in and out of the four supported kinds

use serde::Serialize;
use setstore_storage::SettingType;
use std::fmt;

use crate::cast;

/// A setting value after casting from its stored string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Integer(i64),
    String(String),
    Boolean(bool),
    Double(f64),
}

impl SettingValue {
    pub fn setting_type(&self) -> SettingType {
        match self {
            SettingValue::Integer(_) => SettingType::Integer,
            SettingValue::String(_) => SettingType::String,
            SettingValue::Boolean(_) => SettingType::Boolean,
            SettingValue::Double(_) => SettingType::Double,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(value) => Some(value),
            _ => None,
        }
    }
}

/// Canonical string form, the representation that is stored
impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Integer(value) => write!(f, "{}", value),
            SettingValue::String(value) => f.write_str(value),
            SettingValue::Boolean(value) => f.write_str(cast::bool_to_string(*value)),
            SettingValue::Double(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Integer(i64::from(value))
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        SettingValue::Integer(i64::from(value))
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Double(value)
    }
}

impl From<f32> for SettingValue {
    fn from(value: f32) -> Self {
        SettingValue::Double(f64::from(value))
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl From<&String> for SettingValue {
    fn from(value: &String) -> Self {
        SettingValue::String(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_strings() {
        assert_eq!(SettingValue::from(42).to_string(), "42");
        assert_eq!(SettingValue::from(-7i64).to_string(), "-7");
        assert_eq!(SettingValue::from(true).to_string(), "true");
        assert_eq!(SettingValue::from(false).to_string(), "false");
        assert_eq!(SettingValue::from(1.5).to_string(), "1.5");
        assert_eq!(SettingValue::from(2.0).to_string(), "2");
        assert_eq!(SettingValue::from("as is").to_string(), "as is");
    }

    #[test]
    fn test_accessors() {
        let value = SettingValue::from(10);
        assert_eq!(value.as_i64(), Some(10));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.setting_type(), SettingType::Integer);

        assert_eq!(SettingValue::from(0.25).as_f64(), Some(0.25));
        assert_eq!(SettingValue::from(true).as_bool(), Some(true));
        assert_eq!(SettingValue::from("x").as_str(), Some("x"));
    }

    #[test]
    fn test_serializes_untagged() {
        let values = vec![
            SettingValue::from(1),
            SettingValue::from("a"),
            SettingValue::from(true),
            SettingValue::from(0.5),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[1,"a",true,0.5]"#);
    }
}
