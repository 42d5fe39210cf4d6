//! Small HTML helpers shared by the widget renderers.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Write;

pub fn escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 8);
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Renders ` key="value"` pairs in key order. Empty values render as bare flags.
pub fn flatten_attrs(attrs: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for (key, value) in attrs {
        if value.is_empty() {
            let _ = write!(out, " {}", escape(key));
        } else {
            let _ = write!(out, " {}=\"{}\"", escape(key), escape(value));
        }
    }
    out
}
