use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemanticType {
    Money,
    Percentage,
    Year,
    Quarter,
    Month,
    Date,
    Numeric,
    #[default]
    Text,
}

impl SemanticType {
    pub const ALL: [SemanticType; 8] = [
        SemanticType::Money,
        SemanticType::Percentage,
        SemanticType::Year,
        SemanticType::Quarter,
        SemanticType::Month,
        SemanticType::Date,
        SemanticType::Numeric,
        SemanticType::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Money => "MONEY",
            SemanticType::Percentage => "PERCENTAGE",
            SemanticType::Year => "YEAR",
            SemanticType::Quarter => "QUARTER",
            SemanticType::Month => "MONTH",
            SemanticType::Date => "DATE",
            SemanticType::Numeric => "NUMERIC",
            SemanticType::Text => "TEXT",
        }
    }

    /// Numeric period types that can serve as an ordered time axis.
    pub fn is_numeric_period(self) -> bool {
        matches!(
            self,
            SemanticType::Year | SemanticType::Quarter | SemanticType::Month
        )
    }

    pub fn is_temporal(self) -> bool {
        self.is_numeric_period() || self == SemanticType::Date
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        SemanticType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == normalized)
            .ok_or_else(|| anyhow!("Unknown semantic type '{value}'"))
    }
}

/// Type names the backend does not know about are read as TEXT.
impl<'de> Deserialize<'de> for SemanticType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name
            .and_then(|name| name.parse::<SemanticType>().ok())
            .unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    #[serde(rename = "type", default)]
    pub semantic_type: SemanticType,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
        }
    }
}

/// Resolves the declared type of `field`. The first metadata entry with an
/// exactly matching name wins; anything unresolved is [`SemanticType::Text`].
pub fn semantic_type(field: &str, metadata: &[ColumnMetadata]) -> SemanticType {
    metadata
        .iter()
        .find(|column| column.name == field)
        .map(|column| column.semantic_type)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_defaults_to_text() {
        let metadata = vec![ColumnMetadata::new("total", SemanticType::Money)];
        assert_eq!(semantic_type("total", &metadata), SemanticType::Money);
        assert_eq!(semantic_type("Total", &metadata), SemanticType::Text);
        assert_eq!(semantic_type("total", &[]), SemanticType::Text);
    }

    #[test]
    fn first_matching_entry_wins() {
        let metadata = vec![
            ColumnMetadata::new("x", SemanticType::Year),
            ColumnMetadata::new("x", SemanticType::Money),
        ];
        assert_eq!(semantic_type("x", &metadata), SemanticType::Year);
    }

    #[test]
    fn metadata_uses_wire_names() {
        let parsed: Vec<ColumnMetadata> =
            serde_json::from_str(r#"[{"name":"pct","type":"PERCENTAGE"}]"#).unwrap();
        assert_eq!(parsed[0].semantic_type, SemanticType::Percentage);
        let rendered = serde_json::to_string(&parsed[0]).unwrap();
        assert_eq!(rendered, r#"{"name":"pct","type":"PERCENTAGE"}"#);
    }

    #[test]
    fn unknown_or_absent_wire_types_read_as_text() {
        let parsed: Vec<ColumnMetadata> =
            serde_json::from_str(r#"[{"name":"a","type":"CURRENCY"},{"name":"b"},{"name":"c","type":null}]"#)
                .unwrap();
        assert!(parsed.iter().all(|c| c.semantic_type == SemanticType::Text));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("money".parse::<SemanticType>().unwrap(), SemanticType::Money);
        assert!("currency".parse::<SemanticType>().is_err());
    }

    #[test]
    fn temporal_types() {
        assert!(SemanticType::Date.is_temporal());
        assert!(!SemanticType::Date.is_numeric_period());
        assert!(SemanticType::Quarter.is_numeric_period());
        assert!(!SemanticType::Money.is_temporal());
    }
}
