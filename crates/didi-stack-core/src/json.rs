//! Read-modify-write helpers for JSON-with-comments config documents.
//!
//! Documents keep their key order (`serde_json` is built with
//! `preserve_order`), so a merge only changes the bytes around merged keys.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, ScaffoldError};

/// A shallow merge applied to one JSON file under the project root.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonEdit {
    /// File path relative to the project root.
    pub path: PathBuf,
    /// Object keys leading to the merge point.
    pub key_path: Vec<String>,
    /// Value merged at `key_path`.
    pub value: Value,
}

impl JsonEdit {
    pub fn new<I, S>(path: impl Into<PathBuf>, key_path: I, value: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            key_path: key_path.into_iter().map(Into::into).collect(),
            value,
        }
    }

    /// Read the file under `root`, merge, and write it back.
    pub fn apply(&self, root: &Path) -> Result<()> {
        let path = root.join(&self.path);
        let mut doc = read_config(&path)?;
        if !doc.is_object() {
            return Err(ScaffoldError::ConfigRead {
                path,
                detail: "expected a JSON object at the top level".to_string(),
            });
        }
        let keys: Vec<&str> = self.key_path.iter().map(String::as_str).collect();
        merge_field(&mut doc, &keys, self.value.clone());
        write_config(&path, &doc)
    }
}

/// Read and parse a JSON document, tolerating comments.
pub fn read_config(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| ScaffoldError::ConfigRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    serde_json::from_str(&strip_comments(&content)).map_err(|e| ScaffoldError::ConfigRead {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Serialize a document with two-space indentation and a trailing newline.
pub fn write_config(path: &Path, doc: &Value) -> Result<()> {
    let mut json = serde_json::to_string_pretty(doc).map_err(|e| ScaffoldError::ConfigWrite {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    json.push('\n');

    std::fs::write(path, json).map_err(|e| ScaffoldError::ConfigWrite {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Shallow-merge `value` at `key_path`.
///
/// Missing or non-object intermediate entries become empty objects. When both
/// the existing entry and `value` are objects, `value`'s keys are written over
/// the existing ones and every other key is kept in place; otherwise the entry
/// is replaced. An empty `key_path` merges into the document root.
pub fn merge_field(doc: &mut Value, key_path: &[&str], value: Value) {
    let mut target = doc;
    for key in key_path {
        let map = ensure_object(target);
        target = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    match (target, value) {
        (Value::Object(existing), Value::Object(incoming)) => {
            for (key, value) in incoming {
                existing.insert(key, value);
            }
        }
        (slot, value) => *slot = value,
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Strip `//` and `/* */` comments outside string literals.
///
/// Comments are replaced by spaces (newlines are kept), so line and column
/// numbers in parse errors still point at the original text. Anything else
/// that is not valid JSON, such as a trailing comma, is left for the parser
/// to reject.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                out.push(ch);
                copy_string_body(&mut chars, &mut out);
            }
            '/' if chars.peek() == Some(&'/') => {
                out.push_str("  ");
                chars.next();
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    out.push(blank(next));
                    chars.next();
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push_str("  ");
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        out.push(' ');
                        break;
                    }
                    out.push(blank(next));
                    prev = next;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Copy a string literal body up to and including the closing quote.
fn copy_string_body<I>(chars: &mut I, out: &mut String)
where
    I: Iterator<Item = char>,
{
    let mut escaped = false;
    for c in chars.by_ref() {
        out.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            break;
        }
    }
}

fn blank(c: char) -> char {
    if c == '\n' || c == '\r' {
        c
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_line_and_block_comments() {
        let input = r#"{
  // This is a comment
  "compilerOptions": {
    /* Bundler mode */
    "target": "ES2020"
  }
}"#;
        let stripped = strip_comments(input);
        assert!(!stripped.contains("//"));
        assert!(!stripped.contains("/*"));
        assert_eq!(stripped.lines().count(), input.lines().count());

        let with_comments: Value = serde_json::from_str(&stripped).unwrap();
        let without: Value =
            serde_json::from_str(r#"{ "compilerOptions": { "target": "ES2020" } }"#).unwrap();
        assert_eq!(with_comments, without);
    }

    #[test]
    fn test_strip_preserves_strings_with_slashes() {
        let input = r#"{ "url": "https://example.com/api", "glob": "src/**/*.ts" }"#;
        assert_eq!(strip_comments(input), input);
    }

    #[test]
    fn test_strip_handles_escaped_quotes_and_unicode() {
        let input = "{ \"a\": \"say \\\"// hi\\\"\", \"b\": \"héllo\" } // ünïcode";
        let value: Value = serde_json::from_str(&strip_comments(input)).unwrap();
        assert_eq!(value["a"], "say \"// hi\"");
        assert_eq!(value["b"], "héllo");
    }

    #[test]
    fn test_strip_keeps_trailing_commas() {
        let input = "{\n  \"strict\": true, // on\n}";
        let stripped = strip_comments(input);
        assert!(stripped.contains("true,"));
        assert!(serde_json::from_str::<Value>(&stripped).is_err());
    }

    #[test]
    fn test_read_config_rejects_trailing_comma() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tsconfig.json");
        std::fs::write(&path, r#"{"a": 1,}"#).unwrap();
        assert!(matches!(
            read_config(&path),
            Err(ScaffoldError::ConfigRead { .. })
        ));
    }

    #[test]
    fn test_merge_preserves_siblings_and_order() {
        let mut doc = json!({
            "name": "demo",
            "scripts": { "dev": "vite", "build": "tsc -b && vite build" },
            "dependencies": {}
        });
        merge_field(&mut doc, &["scripts"], json!({ "local": "vite --open" }));

        assert_eq!(doc["scripts"]["dev"], "vite");
        assert_eq!(doc["scripts"]["build"], "tsc -b && vite build");
        assert_eq!(doc["scripts"]["local"], "vite --open");

        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["name", "scripts", "dependencies"]);
        let script_keys: Vec<&String> = doc["scripts"].as_object().unwrap().keys().collect();
        assert_eq!(script_keys, ["dev", "build", "local"]);
    }

    #[test]
    fn test_merge_creates_missing_path() {
        let mut doc = json!({ "files": [] });
        merge_field(
            &mut doc,
            &["compilerOptions"],
            json!({ "baseUrl": ".", "paths": { "@/*": ["./src/*"] } }),
        );
        assert_eq!(doc["compilerOptions"]["baseUrl"], ".");
        assert_eq!(doc["compilerOptions"]["paths"]["@/*"], json!(["./src/*"]));
        assert_eq!(doc["files"], json!([]));
    }

    #[test]
    fn test_merge_replaces_non_object_values() {
        let mut doc = json!({ "scripts": null, "version": "0.0.0" });
        merge_field(&mut doc, &["scripts", "local"], json!("vite --open"));
        merge_field(&mut doc, &["version"], json!("1.0.0"));
        assert_eq!(doc, json!({ "scripts": { "local": "vite --open" }, "version": "1.0.0" }));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut once = json!({ "compilerOptions": { "strict": true } });
        let patch = json!({ "baseUrl": ".", "paths": { "@/*": ["./src/*"] } });
        merge_field(&mut once, &["compilerOptions"], patch.clone());
        let mut twice = once.clone();
        merge_field(&mut twice, &["compilerOptions"], patch);
        assert_eq!(
            serde_json::to_string(&once).unwrap(),
            serde_json::to_string(&twice).unwrap()
        );
    }

    #[test]
    fn test_read_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("tsconfig.json");
        assert!(matches!(
            read_config(&missing),
            Err(ScaffoldError::ConfigRead { .. })
        ));

        std::fs::write(&missing, "{ not json").unwrap();
        assert!(matches!(
            read_config(&missing),
            Err(ScaffoldError::ConfigRead { .. })
        ));
    }

    #[test]
    fn test_write_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("package.json");
        let err = write_config(&path, &json!({})).unwrap_err();
        assert!(matches!(err, ScaffoldError::ConfigWrite { .. }));
    }

    #[test]
    fn test_apply_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        std::fs::write(
            &path,
            "{\n  \"name\": \"demo\",\n  \"private\": true,\n  \"scripts\": {\n    \"dev\": \"vite\"\n  }\n}\n",
        )
        .unwrap();

        JsonEdit::new("package.json", ["scripts"], json!({ "local": "vite --open" }))
            .apply(dir.path())
            .unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "{\n  \"name\": \"demo\",\n  \"private\": true,\n  \"scripts\": {\n    \"dev\": \"vite\",\n    \"local\": \"vite --open\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_apply_rejects_non_object_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "[1, 2]").unwrap();
        let err = JsonEdit::new("package.json", ["scripts"], json!({}))
            .apply(dir.path())
            .unwrap_err();
        assert!(matches!(err, ScaffoldError::ConfigRead { .. }));
    }
}
