//! Argument transformer.
//!
//! Renders host arguments as remote-evaluable expressions:
//!
//! - strings made only of ASCII digits go out as bare numerals
//! - proxies become a link-table lookup for their handle
//! - everything else is a JSON literal
//!
//! No other coercion happens.

use crate::error::Result;
use crate::value::Arg;

/// Render one argument as a remote expression.
pub fn render_arg(arg: &Arg, namespace: &str) -> Result<String> {
    match arg {
        Arg::Object(proxy) => {
            let handle = proxy.checked_handle()?;
            Ok(link_lookup(namespace, handle.get()))
        }
        Arg::Literal(serde_json::Value::String(s)) if is_numeral(s) => Ok(s.clone()),
        Arg::Literal(value) => encode_literal(value),
    }
}

/// Render a list of arguments as a remote array literal.
pub fn render_args(args: &[Arg], namespace: &str) -> Result<String> {
    let rendered = args
        .iter()
        .map(|arg| render_arg(arg, namespace))
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("[{}]", rendered.join(", ")))
}

/// Render a property name. Numeric names index arrays directly.
pub fn render_name(name: &str) -> Result<String> {
    if is_numeral(name) {
        return Ok(name.to_string());
    }
    encode_literal(&serde_json::Value::String(name.to_string()))
}

/// Encode a JSON value as script source.
///
/// U+2028 and U+2029 are legal inside JSON strings but terminate lines in
/// older script parsers, so they are escaped.
pub fn encode_literal(value: &serde_json::Value) -> Result<String> {
    let json = serde_json::to_string(value)?;
    if json.contains(['\u{2028}', '\u{2029}']) {
        return Ok(json.replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029"));
    }
    Ok(json)
}

/// Expression fetching the object stored under `handle`.
pub fn link_lookup(namespace: &str, handle: u64) -> String {
    format!("{}.getLink({})", namespace, handle)
}

fn is_numeral(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
