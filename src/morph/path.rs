//! Dotted-path lookup into nested JSON objects.
//!
//! `resolve("a.b.c", v)` walks object keys only. Arrays, scalars and missing
//! keys stop the walk and yield `None`; a JSON `null` stored at the path is
//! `Some(&Value::Null)`.

use serde_json::Value;

/// Separator between path segments.
pub const SEPARATOR: char = '.';

/// Resolve a dotted path against `value`.
///
/// Never fails: any mismatch along the way (non-object intermediate, missing
/// key, path longer than the structure) returns `None`. Segments are matched
/// literally, so an empty path looks up the `""` key.
pub fn resolve<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split(SEPARATOR)
        .try_fold(value, |current, segment| current.as_object()?.get(segment))
}

/// Like [`resolve`], but collapses "did not resolve" into JSON `null`.
///
/// This is the value written into converted items.
pub fn resolve_or_null(value: &Value, path: &str) -> Value {
    resolve(value, path).cloned().unwrap_or(Value::Null)
}
