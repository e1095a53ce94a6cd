//! # Encoding Formats
//!
//! Classification of response MIME types into a closed set of formats.
//!
//! Matching is exact and case-sensitive. Parameters such as `;charset=utf-8`
//! are not stripped, so `application/json; charset=utf-8` is `Unknown`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Response encoding derived from a MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingFormat {
    Json,
    TextCsv,
    AppCsv,
    MessagePack,
    Unknown,
}

impl EncodingFormat {
    /// Classify a MIME type.
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Self {
        match mime {
            "application/csv" => Self::AppCsv,
            "text/csv" => Self::TextCsv,
            "application/x-msgpack" => Self::MessagePack,
            "application/json" => Self::Json,
            _ => Self::Unknown,
        }
    }

    /// The MIME type this format is written with, `None` for `Unknown`.
    #[must_use]
    pub const fn content_type(self) -> Option<&'static str> {
        match self {
            Self::Json => Some("application/json"),
            Self::TextCsv => Some("text/csv"),
            Self::AppCsv => Some("application/csv"),
            Self::MessagePack => Some("application/x-msgpack"),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for EncodingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::TextCsv => "text_csv",
            Self::AppCsv => "app_csv",
            Self::MessagePack => "message_pack",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_types() {
        let cases = [
            ("application/csv", EncodingFormat::AppCsv),
            ("text/csv", EncodingFormat::TextCsv),
            ("application/x-msgpack", EncodingFormat::MessagePack),
            ("application/json", EncodingFormat::Json),
            ("application/other", EncodingFormat::Unknown),
        ];
        for (mime, expected) in cases {
            assert_eq!(EncodingFormat::from_mime_type(mime), expected, "{mime}");
        }
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!(
            EncodingFormat::from_mime_type("Application/JSON"),
            EncodingFormat::Unknown
        );
        assert_eq!(
            EncodingFormat::from_mime_type("application/json; charset=utf-8"),
            EncodingFormat::Unknown
        );
        assert_eq!(EncodingFormat::from_mime_type(""), EncodingFormat::Unknown);
    }

    #[test]
    fn content_type_matches_classification() {
        for format in [
            EncodingFormat::Json,
            EncodingFormat::TextCsv,
            EncodingFormat::AppCsv,
            EncodingFormat::MessagePack,
        ] {
            let mime = format.content_type().expect("known format");
            assert_eq!(EncodingFormat::from_mime_type(mime), format);
        }
        assert_eq!(EncodingFormat::Unknown.content_type(), None);
    }

    #[test]
    fn display_matches_serde_tag() {
        let json = serde_json::to_string(&EncodingFormat::MessagePack).expect("serialize");
        assert_eq!(json, format!("\"{}\"", EncodingFormat::MessagePack));
    }
}
