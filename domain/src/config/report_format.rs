//! Report format value object

use serde::{Deserialize, Serialize};

/// How reports are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Colored, human-readable text (default)
    #[default]
    Text,
    /// Machine-readable JSON on stdout
    Json,
}

impl ReportFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }

    pub fn is_json(&self) -> bool {
        *self == Self::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_text() {
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&ReportFormat::Json).unwrap();
        assert_eq!(json, "\"json\"");
    }

    #[test]
    fn test_from_flag() {
        assert!(ReportFormat::from_json_flag(true).is_json());
        assert_eq!(ReportFormat::from_json_flag(false), ReportFormat::Text);
    }
}
