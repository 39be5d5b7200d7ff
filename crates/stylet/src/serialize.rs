//! Parameter serialization to XML text.
//!
//! Render parameters are arbitrary `Serialize` values. Before a transform
//! they are turned into an XML input document: named structs serialize
//! directly (struct name as root element), while maps, primitives, and bare
//! arrays are wrapped in a `<data>` root with keys sanitized to valid XML
//! element names. The resulting text goes through the same hardened parse as
//! stylesheets, so the transform only ever sees a well-formed document.

use serde::Serialize;

use crate::error::EngineError;

/// Root element used when the value has no natural root (maps, primitives).
const WRAPPER_ROOT: &str = "data";

/// Serializes a parameter value to XML text.
///
/// # Example
///
/// ```rust
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Invoice { total: u32 }
///
/// let xml = stylet::parameters_to_xml(&Invoice { total: 12 }).unwrap();
/// assert_eq!(xml, "<Invoice><total>12</total></Invoice>");
/// ```
pub fn parameters_to_xml<T: Serialize + ?Sized>(parameters: &T) -> Result<String, EngineError> {
    // Named structs carry their own root element and known-valid keys.
    if let Ok(xml) = quick_xml::se::to_string(parameters) {
        return Ok(xml);
    }
    // Everything else goes through a JSON value so keys can be sanitized,
    // then gets a wrapper root element.
    let value = serde_json::to_value(parameters)?;
    let sanitized = sanitize_keys(&value);
    let wrapped = match sanitized {
        serde_json::Value::Object(_) => sanitized,
        serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
        other => {
            let mut map = serde_json::Map::new();
            map.insert("value".to_string(), other);
            serde_json::Value::Object(map)
        }
    };
    Ok(quick_xml::se::to_string_with_root(WRAPPER_ROOT, &wrapped)?)
}

/// Recursively sanitizes JSON object keys to be valid XML element names.
fn sanitize_keys(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (key, val) in map {
                out.insert(sanitize_name(key), sanitize_keys(val));
            }
            serde_json::Value::Object(out)
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(sanitize_keys).collect())
        }
        other => other.clone(),
    }
}

/// Ensures a string is a valid XML element name.
///
/// XML names must start with a letter or underscore; later characters may be
/// letters, digits, hyphens, underscores, or periods. Anything else becomes
/// an underscore.
fn sanitize_name(name: &str) -> String {
    if name.is_empty() {
        return "_".to_string();
    }
    let mut out = String::with_capacity(name.len() + 1);
    for (i, c) in name.chars().enumerate() {
        if i == 0 {
            if c.is_ascii_alphabetic() || c == '_' {
                out.push(c);
            } else {
                out.push('_');
                if c.is_ascii_alphanumeric() {
                    out.push(c);
                }
            }
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
            out.push(c);
        } else {
            out.push('_');
        }
    }
    out
}
