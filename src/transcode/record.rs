//! JSON serialization of a single row.
//!
//! Values are always emitted as JSON strings, keyed by header field in header
//! order. Duplicate header names are emitted positionally, so the key appears
//! once per occurrence.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::RecordLayout;

/// Borrowed view pairing header fields with row values by position.
///
/// Callers guarantee both slices have the same length.
pub(crate) struct RecordView<'a> {
    pub fields: &'a [String],
    pub values: &'a [&'a str],
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, value) in self.fields.iter().zip(self.values) {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

impl RecordView<'_> {
    /// Serialize using the given layout.
    pub fn to_json(&self, layout: RecordLayout) -> serde_json::Result<String> {
        match layout {
            RecordLayout::Compact => serde_json::to_string(self),
            RecordLayout::Pretty => serde_json::to_string_pretty(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(fields: &[&str], values: &[&str], layout: RecordLayout) -> String {
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        let view = RecordView {
            fields: &fields,
            values,
        };
        view.to_json(layout).unwrap()
    }

    #[test]
    fn test_compact_keeps_header_order() {
        let json = render(&["z", "a", "m"], &["1", "2", "3"], RecordLayout::Compact);
        assert_eq!(json, r#"{"z":"1","a":"2","m":"3"}"#);
    }

    #[test]
    fn test_pretty_layout() {
        let json = render(&["a", "b", "c"], &["1", "2", "3"], RecordLayout::Pretty);
        assert_eq!(json, "{\n  \"a\": \"1\",\n  \"b\": \"2\",\n  \"c\": \"3\"\n}");
    }

    #[test]
    fn test_escapes_quotes_backslashes_and_controls() {
        let original = "He said \"hi\" \\ then\ttab\u{1}";
        let json = render(&["quote\"key"], &[original], RecordLayout::Compact);

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["quote\"key"], original);
        assert!(json.contains(r#"\"hi\""#));
        assert!(json.contains(r"\u0001"));
    }

    #[test]
    fn test_values_stay_strings() {
        let json = render(&["n", "b", "z"], &["42", "true", "null"], RecordLayout::Compact);
        assert_eq!(json, r#"{"n":"42","b":"true","z":"null"}"#);
    }

    #[test]
    fn test_duplicate_fields_emitted_positionally() {
        let json = render(&["id", "id"], &["1", "2"], RecordLayout::Compact);
        assert_eq!(json, r#"{"id":"1","id":"2"}"#);
    }
}
