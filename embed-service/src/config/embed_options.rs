//! Per-request embedding options understood by the Cohere `embed` endpoint.

use std::str::FromStr;

use serde::Serialize;

use crate::error_handler::ConfigError;

/// Role of the text being embedded.
///
/// Cohere v3 models produce different vectors for corpus documents and for the
/// queries searched against them, so the two must never be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputType {
    SearchDocument,
    SearchQuery,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::SearchDocument => "search_document",
            InputType::SearchQuery => "search_query",
        }
    }
}

/// What the provider does with inputs longer than the model context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Truncate {
    /// Reject over-long inputs.
    None,
    /// Drop tokens from the beginning.
    Start,
    /// Drop tokens from the end.
    #[default]
    End,
}

impl FromStr for Truncate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Truncate::None),
            "START" => Ok(Truncate::Start),
            "END" => Ok(Truncate::End),
            _ => Err(ConfigError::InvalidFormat {
                var: "COHERE_TRUNCATE",
                reason: "expected NONE, START or END",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_match_cohere() {
        assert_eq!(
            serde_json::to_value(InputType::SearchDocument).unwrap(),
            serde_json::json!("search_document")
        );
        assert_eq!(
            serde_json::to_value(InputType::SearchQuery).unwrap(),
            serde_json::json!(InputType::SearchQuery.as_str())
        );
        assert_eq!(serde_json::to_value(Truncate::End).unwrap(), serde_json::json!("END"));
    }

    #[test]
    fn truncate_parses_case_insensitively() {
        assert_eq!("end".parse::<Truncate>().unwrap(), Truncate::End);
        assert_eq!(" Start ".parse::<Truncate>().unwrap(), Truncate::Start);
        assert!("middle".parse::<Truncate>().is_err());
    }
}
