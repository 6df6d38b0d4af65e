//! Content parsing.
//!
//! Every fetched text goes through [`parse_content`] before it is cached.
//! Valid JSON is re-emitted in canonical form so that two documents that
//! differ only in key order or whitespace produce identical text.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// How a text was interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextType {
    #[default]
    Plain,
    Json,
}

/// A parsed, immutable document body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Content {
    text: String,
    text_type: TextType,
}

impl Content {
    /// Parse raw text. Equivalent to [`parse_content`].
    pub fn parse(text: &str) -> Self {
        parse_content(text)
    }

    /// The text to diff. Canonical JSON for JSON content, verbatim otherwise.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_type(&self) -> TextType {
        self.text_type
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Interpret `text` as JSON if possible, falling back to plain text.
///
/// JSON is re-serialised with keys sorted at every level, two-space
/// indentation and non-ASCII characters kept literal. Numbers keep the
/// digits they were written with. Any text that is not a
/// complete JSON value is returned unchanged as [`TextType::Plain`].
///
/// # Examples
///
/// ```
/// use difflume_source::{parse_content, TextType};
///
/// let content = parse_content(r#"{"b": 1, "a": 2}"#);
/// assert_eq!(content.text(), "{\n  \"a\": 2,\n  \"b\": 1\n}");
/// assert_eq!(content.text_type(), TextType::Json);
///
/// assert_eq!(parse_content("some text").text_type(), TextType::Plain);
/// ```
pub fn parse_content(text: &str) -> Content {
    let canonical = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&Sorted(&value)).ok());

    match canonical {
        Some(text) => Content {
            text,
            text_type: TextType::Json,
        },
        None => Content {
            text: text.to_owned(),
            text_type: TextType::Plain,
        },
    }
}

/// Serialises a JSON value with object keys in sorted order, whatever map
/// representation `serde_json` was built with.
struct Sorted<'a>(&'a Value);

impl Serialize for Sorted<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Object(map) => {
                let sorted: BTreeMap<&String, Sorted<'_>> =
                    map.iter().map(|(k, v)| (k, Sorted(v))).collect();
                sorted.serialize(serializer)
            }
            Value::Array(items) => serializer.collect_seq(items.iter().map(Sorted)),
            other => other.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_is_sorted_and_indented() {
        let content = parse_content(r#"{"b":1,"a":2}"#);
        assert_eq!(content.text(), "{\n  \"a\": 2,\n  \"b\": 1\n}");
        assert_eq!(content.text_type(), TextType::Json);
    }

    #[test]
    fn nested_objects_are_sorted() {
        let content = parse_content(r#"{"z": {"y": [ {"b": 1, "a": null} ]}, "a": true}"#);
        let expected = r#"{
  "a": true,
  "z": {
    "y": [
      {
        "a": null,
        "b": 1
      }
    ]
  }
}"#;
        assert_eq!(content.text(), expected);
    }

    #[test]
    fn empty_json_containers() {
        assert_eq!(parse_content("{}").text(), "{}");
        assert_eq!(parse_content("[ ]").text(), "[]");
        assert_eq!(parse_content("[ ]").text_type(), TextType::Json);
    }

    #[test]
    fn json_scalars_are_json() {
        let content = parse_content(" 42 ");
        assert_eq!(content.text(), "42");
        assert_eq!(content.text_type(), TextType::Json);
    }

    #[test]
    fn large_numbers_keep_every_digit() {
        let left = parse_content(r#"{"id": 123456789012345678901}"#);
        let right = parse_content(r#"{"id": 123456789012345678902}"#);
        assert_eq!(left.text(), "{\n  \"id\": 123456789012345678901\n}");
        assert_ne!(left, right);

        let decimal = parse_content(r#"{"pi": 3.14159265358979323846264338}"#);
        assert_eq!(decimal.text(), "{\n  \"pi\": 3.14159265358979323846264338\n}");
    }

    #[test]
    fn non_ascii_is_kept_literal() {
        let content = parse_content(r#"{"name": "Zoë", "city": "é"}"#);
        assert_eq!(content.text(), "{\n  \"city\": \"é\",\n  \"name\": \"Zoë\"\n}");
    }

    #[test]
    fn plain_texts_pass_through() {
        for text in ["", " ", r#"{"key": "value""#, "some\ntext"] {
            let content = parse_content(text);
            assert_eq!(content.text(), text);
            assert_eq!(content.text_type(), TextType::Plain);
        }
    }

    #[test]
    fn canonical_json_is_stable() {
        let once = parse_content(r#"{"b": [1, 2], "a": {"d": 0, "c": "x"}}"#);
        let twice = parse_content(once.text());
        assert_eq!(once, twice);
    }
}
