//! Column rule, import type and validation result types.

use regex::Regex;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column kinds
// ---------------------------------------------------------------------------

/// The expected data type of a column, carrying only the constraints that
/// make sense for that type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Number,
    Date,
    Enum {
        values: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_length: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },
    Boolean,
}

impl ColumnKind {
    /// Stable string representation matching serde's `tag = "type"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Enum { .. } => "enum",
            Self::Boolean => "boolean",
        }
    }

    /// Length bounds, present only for `string` and `enum` columns.
    pub fn length_bounds(&self) -> Option<(Option<usize>, Option<usize>)> {
        match self {
            Self::String {
                min_length,
                max_length,
            }
            | Self::Enum {
                min_length,
                max_length,
                ..
            } => Some((*min_length, *max_length)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// A compiled format constraint with an optional user-facing message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PatternSpec", into = "PatternSpec")]
pub struct Pattern {
    regex: Regex,
    message: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct PatternSpec {
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Pattern {
    pub fn new(source: &str, message: Option<&str>) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(source)?,
            message: message.map(str::to_string),
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl TryFrom<PatternSpec> for Pattern {
    type Error = regex::Error;

    fn try_from(spec: PatternSpec) -> Result<Self, Self::Error> {
        Pattern::new(&spec.source, spec.message.as_deref())
    }
}

impl From<Pattern> for PatternSpec {
    fn from(pattern: Pattern) -> Self {
        PatternSpec {
            source: pattern.regex.as_str().to_string(),
            message: pattern.message,
        }
    }
}

// ---------------------------------------------------------------------------
// Column rule
// ---------------------------------------------------------------------------

/// Validity constraints for one logical column of a tabular import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRule {
    /// Column name as it must appear in the header row.
    pub name: String,
    pub required: bool,
    #[serde(flatten)]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

impl ColumnRule {
    pub fn new(name: &str, kind: ColumnKind) -> Self {
        Self {
            name: name.to_string(),
            required: false,
            kind,
            pattern: None,
        }
    }

    pub fn string(name: &str) -> Self {
        Self::new(
            name,
            ColumnKind::String {
                min_length: None,
                max_length: None,
            },
        )
    }

    pub fn number(name: &str) -> Self {
        Self::new(name, ColumnKind::Number)
    }

    pub fn date(name: &str) -> Self {
        Self::new(name, ColumnKind::Date)
    }

    pub fn boolean(name: &str) -> Self {
        Self::new(name, ColumnKind::Boolean)
    }

    pub fn enumeration(name: &str, values: &[&str]) -> Self {
        Self::new(
            name,
            ColumnKind::Enum {
                values: values.iter().map(|v| v.to_string()).collect(),
                min_length: None,
                max_length: None,
            },
        )
    }

    /// Mark the column as mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the minimum length. Ignored for kinds without length bounds.
    pub fn min_length(mut self, n: usize) -> Self {
        match &mut self.kind {
            ColumnKind::String { min_length, .. } | ColumnKind::Enum { min_length, .. } => {
                *min_length = Some(n);
            }
            _ => {}
        }
        self
    }

    /// Set the maximum length. Ignored for kinds without length bounds.
    pub fn max_length(mut self, n: usize) -> Self {
        match &mut self.kind {
            ColumnKind::String { max_length, .. } | ColumnKind::Enum { max_length, .. } => {
                *max_length = Some(n);
            }
            _ => {}
        }
        self
    }

    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }
}

// ---------------------------------------------------------------------------
// Import type
// ---------------------------------------------------------------------------

/// The complete set of column rules for one category of bulk-imported entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTypeConfig {
    /// Stable identifier used in URLs (e.g. `"clientes"`).
    pub id: String,
    pub title: String,
    pub description: String,
    /// Backend route that receives the accepted file.
    pub backend_endpoint: String,
    /// Expected columns, in template order.
    pub columns: Vec<ColumnRule>,
    /// Example rows included in the downloadable template.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sample_data: Vec<Vec<String>>,
}

impl ImportTypeConfig {
    /// Column names in template order.
    pub fn template_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A single finding produced during a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// 1-based sheet row (header = 0, first data row = 2).
    pub row: usize,
    pub column: String,
    pub value: String,
    pub message: String,
}

/// Outcome of one validation pass over a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
    pub valid_row_count: usize,
    pub total_row_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_builders_only_touch_bounded_kinds() {
        let rule = ColumnRule::number("km").min_length(3).max_length(9);
        assert_eq!(rule.kind, ColumnKind::Number);

        let rule = ColumnRule::string("rfc").min_length(12).max_length(13);
        assert_eq!(rule.kind.length_bounds(), Some((Some(12), Some(13))));
    }

    #[test]
    fn rule_serializes_with_flat_type_tag() {
        let rule = ColumnRule::enumeration("moneda", &["MXN", "USD"]).required();
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(json["name"], "moneda");
        assert_eq!(json["type"], "enum");
        assert_eq!(json["required"], true);
        assert_eq!(json["values"], serde_json::json!(["MXN", "USD"]));
        assert!(json.get("pattern").is_none());
    }

    #[test]
    fn rule_deserializes_pattern_from_source() {
        let json = serde_json::json!({
            "name": "codigo_postal",
            "required": true,
            "type": "string",
            "max_length": 5,
            "pattern": { "source": "^\\d{5}$", "message": "CP inválido" }
        });
        let rule: ColumnRule = serde_json::from_value(json).unwrap();

        let pattern = rule.pattern.as_ref().unwrap();
        assert!(pattern.is_match("06000"));
        assert!(!pattern.is_match("6000"));
        assert_eq!(pattern.message(), Some("CP inválido"));
        assert_eq!(rule.kind.length_bounds(), Some((None, Some(5))));
    }

    #[test]
    fn invalid_pattern_source_is_rejected() {
        let json = serde_json::json!({
            "name": "x",
            "required": false,
            "type": "string",
            "pattern": { "source": "([" }
        });
        assert!(serde_json::from_value::<ColumnRule>(json).is_err());
    }
}
