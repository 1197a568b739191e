//! Keyword tables and signature predicates used by the classification rules.
//!
//! Keyword hits are computed over name segments (snake_case and camelCase
//! boundaries), not raw substrings, so `tokenize` does not hit `to` and
//! `handleMessage` does not hit `handler`. A keyword of four or more
//! characters also matches a segment prefix, so `received` hits `receive`
//! and `parsing` hits `parse`.

use crate::core::FunctionSignature;

/// Names that indicate decoding or encoding of external input.
pub const PARSING_KEYWORDS: &[&str] = &[
    "parse",
    "decode",
    "encode",
    "serialize",
    "deserialize",
    "unpack",
    "pack",
    "marshal",
    "unmarshal",
];

/// Names that indicate network or socket I/O.
pub const NETWORK_KEYWORDS: &[&str] = &[
    "send", "recv", "receive", "read", "write", "connect", "accept", "bind", "listen", "poll",
    "async",
];

/// Names that indicate a state transition. Distinct from the lifecycle
/// subset below; both map to P1.
pub const STATE_KEYWORDS: &[&str] = &[
    "handle",
    "process",
    "execute",
    "transition",
    "validate",
    "update",
    "apply",
    "enable",
    "disable",
    "resume",
    "suspend",
];

/// Names that mark object or session lifecycle boundaries.
pub const LIFECYCLE_KEYWORDS: &[&str] = &[
    "init",
    "initialize",
    "setup",
    "teardown",
    "shutdown",
    "start",
    "stop",
    "open",
    "close",
    "destroy",
    "reset",
];

/// Names that indicate callback or event plumbing. The `on`-prefix shape is
/// handled separately by [`has_event_handler_shape`].
pub const CALLBACK_KEYWORDS: &[&str] = &[
    "callback",
    "handler",
    "listener",
    "notify",
    "emit",
    "dispatch",
    "subscribe",
    "unsubscribe",
    "trigger",
    "fire",
];

/// Names that betray a side effect, disqualifying a function from the
/// pure-utility category.
pub const SIDE_EFFECT_KEYWORDS: &[&str] = &[
    "set", "add", "remove", "insert", "erase", "clear", "push", "pop", "store", "flush", "commit",
    "register", "append", "assign",
];

/// Split an identifier into lowercase segments at `_` and camelCase
/// boundaries. `onDataReceived` becomes `["on", "data", "received"]`.
pub fn name_segments(name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for chunk in name.split('_') {
        let mut current = String::new();
        let mut prev_lower = false;
        for ch in chunk.chars() {
            if ch.is_uppercase() && prev_lower && !current.is_empty() {
                segments.push(current.to_lowercase());
                current = String::new();
            }
            prev_lower = ch.is_lowercase() || ch.is_numeric();
            current.push(ch);
        }
        if !current.is_empty() {
            segments.push(current.to_lowercase());
        }
    }
    segments
}

/// True when any segment of `name` equals a keyword, or (for keywords of
/// four or more characters) starts with one.
pub fn name_matches(name: &str, keywords: &[&str]) -> bool {
    let segments = name_segments(name);
    segments.iter().any(|seg| {
        keywords
            .iter()
            .any(|kw| seg == kw || (kw.len() >= 4 && seg.starts_with(kw)))
    })
}

/// Event-handler name shape: `on` followed by an uppercase letter or an
/// underscore, e.g. `onDataReceived` or `on_connect`.
pub fn has_event_handler_shape(name: &str) -> bool {
    let rest = match name.strip_prefix("on") {
        Some(rest) => rest,
        None => return false,
    };
    rest.chars()
        .next()
        .map(|c| c.is_uppercase() || c == '_')
        .unwrap_or(false)
}

fn normalize_type(ty: &str) -> String {
    ty.to_lowercase()
        .replace("const", "")
        .replace(' ', "")
        .replace('\t', "")
}

/// A pointer, span, or view over raw bytes.
pub fn is_byte_buffer_type(ty: &str) -> bool {
    let norm = normalize_type(ty);
    const BYTE_BASES: &[&str] = &["uint8_t", "int8_t", "std::byte", "byte", "unsignedchar"];
    BYTE_BASES.iter().any(|base| {
        norm.contains(&format!("{base}*"))
            || norm.contains(&format!("span<{base}"))
            || norm.contains(&format!("basic_string_view<{base}"))
    }) || norm.contains("string_view")
}

fn is_length_type(ty: &str) -> bool {
    let norm = normalize_type(ty);
    matches!(
        norm.as_str(),
        "size_t" | "std::size_t" | "uint32_t" | "uint64_t" | "std::uint32_t" | "std::uint64_t"
    )
}

fn is_char_pointer(ty: &str) -> bool {
    let norm = normalize_type(ty);
    norm.ends_with("char*") && !norm.contains("unsignedchar")
}

fn is_callback_type(ty: &str) -> bool {
    let norm = normalize_type(ty);
    norm.contains("function<")
        || norm.contains("callback")
        || norm.contains("handler")
        || norm.contains("future<")
        || norm.contains("promise<")
        || norm.ends_with("_cb")
}

/// True when a parameter denotes a raw byte buffer: a byte pointer/span/view
/// on its own, or a `char*` immediately followed by a length parameter.
/// A buffer buried inside a callback type belongs to the callback, not to
/// this function's input surface.
pub fn has_raw_buffer_param(sig: &FunctionSignature) -> bool {
    if sig
        .params
        .iter()
        .any(|p| is_byte_buffer_type(p) && !is_callback_type(p))
    {
        return true;
    }
    sig.params
        .windows(2)
        .any(|pair| is_char_pointer(&pair[0]) && is_length_type(&pair[1]))
}

/// True when a parameter type denotes an asynchronous callback or
/// completion handler.
pub fn has_callback_param(sig: &FunctionSignature) -> bool {
    sig.params.iter().any(|p| is_callback_type(p))
}

/// True when a parameter is a named `state`/`status` concept.
pub fn has_state_param(sig: &FunctionSignature) -> bool {
    sig.params.iter().any(|p| {
        let norm = normalize_type(p);
        norm.contains("state") || norm.contains("status")
    })
}

/// I/O keyword hit on the name, used by the complexity grade.
pub fn has_io_keyword(sig: &FunctionSignature) -> bool {
    name_matches(&sig.name, NETWORK_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NamespacePath;
    use std::path::PathBuf;

    fn sig_with_params(name: &str, params: &[&str]) -> FunctionSignature {
        FunctionSignature {
            name: name.into(),
            qualified_name: name.into(),
            file: PathBuf::from("test.hpp"),
            line: 1,
            namespace: NamespacePath::root(),
            params: params.iter().map(|p| p.to_string()).collect(),
            return_type: "void".into(),
            is_const: false,
            is_noexcept: false,
            is_virtual: false,
            is_override: false,
        }
    }

    #[test]
    fn segments_split_camel_and_snake() {
        assert_eq!(name_segments("onDataReceived"), ["on", "data", "received"]);
        assert_eq!(name_segments("parse_frame"), ["parse", "frame"]);
        assert_eq!(name_segments("toString"), ["to", "string"]);
    }

    #[test]
    fn keyword_prefix_requires_min_length() {
        assert!(name_matches("dataReceived", NETWORK_KEYWORDS));
        assert!(name_matches("parsing", PARSING_KEYWORDS));
        // "tokenize" must not hit the two-letter utility-style "to"
        assert!(!name_matches("tokenize", &["to"]));
    }

    #[test]
    fn handler_shape_detection() {
        assert!(has_event_handler_shape("onDataReceived"));
        assert!(has_event_handler_shape("on_connect"));
        assert!(!has_event_handler_shape("once"));
        assert!(!has_event_handler_shape("online"));
        assert!(!has_event_handler_shape("handleMessage"));
    }

    #[test]
    fn byte_buffer_detection() {
        let sig = sig_with_params("f", &["const uint8_t*", "size_t"]);
        assert!(has_raw_buffer_param(&sig));

        let span = sig_with_params("f", &["std::span<const std::byte>"]);
        assert!(has_raw_buffer_param(&span));

        let char_pair = sig_with_params("f", &["const char*", "size_t"]);
        assert!(has_raw_buffer_param(&char_pair));

        // A lone char* without a length pair is a C string, not a buffer
        let c_str = sig_with_params("f", &["const char*"]);
        assert!(!has_raw_buffer_param(&c_str));

        let plain = sig_with_params("f", &["int", "double"]);
        assert!(!has_raw_buffer_param(&plain));
    }

    #[test]
    fn callback_param_detection() {
        let sig = sig_with_params("f", &["std::function<void(int)>"]);
        assert!(has_callback_param(&sig));
        let plain = sig_with_params("f", &["int"]);
        assert!(!has_callback_param(&plain));
    }
}
