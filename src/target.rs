use std::fmt;

use thiserror::Error;

use crate::{output::TextPrinter, value::Value};

/// A segment in a target path.
///
/// # Examples
/// - `/name` → `Key("name")`
/// - `/items/0` → `[Key("items"), Index(0)]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object field access by name
    Key(String),

    /// Array element access by index
    ///
    /// On an object, the index is looked up as its decimal string key.
    Index(usize),
}

impl PathSegment {
    /// Builds a segment from raw segment text, turning non-negative integer
    /// text into an index.
    pub fn from_text(text: &str) -> Self {
        match crate::value::parse_number(text) {
            Some(Value::Integer(n)) if n >= 0 => PathSegment::Index(n as usize),
            _ => PathSegment::Key(text.to_string()),
        }
    }
}

/// Errors raised when building a target from a JSON pointer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("invalid JSON pointer '{pointer}': must be empty or start with '/'")]
    InvalidPointer { pointer: String },

    #[error("invalid escape in JSON pointer '{pointer}' at offset {offset}")]
    InvalidEscape { pointer: String, offset: usize },
}

/// A reference into a record.
///
/// `field` is the path up to (excluding) the first index segment, rendered
/// as a pointer. It identifies the column a target reads independently of
/// any array position, and is `/` for the root.
///
/// ```
/// use spleen::{PathSegment, Target};
///
/// let target = Target::from_json_pointer("/foo/bar/42/baz").unwrap();
/// assert_eq!(target.field(), "/foo/bar");
/// assert_eq!(target.path()[2], PathSegment::Index(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    path: Vec<PathSegment>,
    field: String,
}

impl Target {
    pub fn new(path: Vec<PathSegment>) -> Self {
        let keys: Vec<&str> = path
            .iter()
            .map_while(|segment| match segment {
                PathSegment::Key(key) => Some(key.as_str()),
                PathSegment::Index(_) => None,
            })
            .collect();
        let field = format!("/{}", keys.join("/"));
        Target { path, field }
    }

    pub fn root() -> Self {
        Target::new(Vec::new())
    }

    /// Parse an RFC 6901 JSON pointer (`~1` is `/`, `~0` is `~`).
    pub fn from_json_pointer(pointer: &str) -> Result<Self, TargetError> {
        if pointer.is_empty() {
            return Ok(Target::root());
        }
        let Some(rest) = pointer.strip_prefix('/') else {
            return Err(TargetError::InvalidPointer {
                pointer: pointer.to_string(),
            });
        };

        let mut path = Vec::new();
        let mut offset = 1;
        for raw in rest.split('/') {
            let segment = unescape_pointer(raw).ok_or_else(|| TargetError::InvalidEscape {
                pointer: pointer.to_string(),
                offset,
            })?;
            path.push(PathSegment::from_text(&segment));
            offset += raw.len() + 1;
        }
        Ok(Target::new(path))
    }

    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Walk `record` along the path. Any missing key, out-of-range index,
    /// or scalar in the way yields `None`.
    pub fn get<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        self.path
            .iter()
            .try_fold(record, |current, segment| match (current, segment) {
                (Value::Object(map), PathSegment::Key(key)) => map.get(key),
                (Value::Object(map), PathSegment::Index(n)) => map.get(&n.to_string()),
                (Value::Array(arr), PathSegment::Index(n)) => arr.get(*n),
                _ => None,
            })
    }

    /// Canonical filter text for this target, optionally URL-encoded.
    pub fn to_text(&self, url_encode: bool) -> String {
        TextPrinter::new(url_encode).print_target(self)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text(false))
    }
}

fn unescape_pointer(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next()? {
                '0' => out.push('~'),
                '1' => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_field_stops_at_first_index() {
        let target = Target::new(vec![
            PathSegment::Key("foo".into()),
            PathSegment::Key("bar".into()),
            PathSegment::Index(42),
            PathSegment::Key("baz".into()),
        ]);
        assert_eq!(target.field(), "/foo/bar");
    }

    #[test]
    fn test_root_field() {
        assert_eq!(Target::root().field(), "/");
        let leading_index = Target::new(vec![PathSegment::Index(0)]);
        assert_eq!(leading_index.field(), "/");
    }

    #[test]
    fn test_pointer_escapes() {
        let target = Target::from_json_pointer("/a~1b/c~0d").unwrap();
        assert_eq!(
            target.path(),
            &[PathSegment::Key("a/b".into()), PathSegment::Key("c~d".into())]
        );
        assert!(Target::from_json_pointer("/bad~2").is_err());
        assert!(Target::from_json_pointer("nope").is_err());
    }

    #[test]
    fn test_get_walks_objects_and_arrays() {
        let mut inner = HashMap::new();
        inner.insert("0".to_string(), Value::String("zero".into()));
        let mut record = HashMap::new();
        record.insert(
            "list".to_string(),
            Value::Array(vec![Value::Integer(10), Value::Integer(20)]),
        );
        record.insert("map".to_string(), Value::Object(inner));
        let record = Value::Object(record);

        let list = Target::from_json_pointer("/list/1").unwrap();
        assert_eq!(list.get(&record), Some(&Value::Integer(20)));

        let by_index_key = Target::from_json_pointer("/map/0").unwrap();
        assert_eq!(by_index_key.get(&record), Some(&Value::String("zero".into())));

        let missing = Target::from_json_pointer("/list/5").unwrap();
        assert_eq!(missing.get(&record), None);

        let through_scalar = Target::from_json_pointer("/list/0/deeper").unwrap();
        assert_eq!(through_scalar.get(&record), None);
    }
}
