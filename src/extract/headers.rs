//! Single-pass lexical header scanning.
//!
//! The scanner recognizes function-declaration shapes without building an
//! AST. Comments, string and character literals, and preprocessor lines are
//! blanked out first so keywords inside them never trigger a match; the
//! remaining text is walked once, left to right, with namespace and class
//! scope kept on an explicit stack. Brace bodies that are neither namespaces
//! nor classes are opaque: the scanner tracks their braces but extracts
//! nothing inside them. Ambiguous shapes (function-pointer declarators,
//! parameter lists that cannot be tokenized) are excluded with a warning,
//! never guessed.

use crate::core::{EdgeReason, FunctionSignature, NamespacePath};
use crate::extract::looks_malformed;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// A qualified-name reference observed inside some namespace scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UsageRef {
    pub from: NamespacePath,
    pub to: NamespacePath,
    pub reason: EdgeReason,
}

/// Everything extracted from one header or source file. Immutable once the
/// scan finishes; the merge step only reads it.
#[derive(Clone, Debug, Default)]
pub struct FileScan {
    pub file: PathBuf,
    pub functions: Vec<FunctionSignature>,
    /// Distinct namespace paths opened in this file, in order of appearance.
    pub namespaces: Vec<NamespacePath>,
    /// Raw `#include` targets.
    pub includes: Vec<String>,
    pub usages: Vec<UsageRef>,
    pub warnings: Vec<String>,
}

static INCLUDE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^\s*#\s*include\s*[<"]([^">]+)[">]"#).unwrap());

static NAMESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:inline\s+)?namespace(?:\s+([A-Za-z_]\w*(?:::[A-Za-z_]\w*)*))?\s*$")
        .unwrap()
});

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)^\s*(?:template\s*<.*>\s*)?(?:class|struct)\s+(?:\w+\s+)*?([A-Za-z_]\w*)(?:\s*final)?(?:\s*:[^:].*)?$",
    )
    .unwrap()
});

static ACCESS_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\s*(?:public|protected|private)\s*:)+").unwrap());

static HEAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^
        (?:(?P<virtual>virtual)\s+)?
        (?:static\s+)?(?:inline\s+)?(?:explicit\s+)?(?:constexpr\s+)?(?:friend\s+)?
        (?P<ret>[\w:<>,\s\*&]+?)
        (?P<sep>[\s\*&]+)
        (?P<name>~?[A-Za-z_]\w*)
        $",
    )
    .unwrap()
});

static TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^
        (?P<quals>(?:\s|const\b|noexcept(?:\([^()]*\))?|override\b|final\b|&&|&)*)
        (?:->\s*(?P<trailing>[\w:<>,\s\*&]+?)\s*)?
        (?:=\s*(?:0|default|delete)\s*)?
        $",
    )
    .unwrap()
});

static QUALIFIED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z_]\w*(?:::[A-Za-z_]\w*)+)").unwrap());

static USING_NAMESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*using\s+namespace\s+([A-Za-z_]\w*(?:::[A-Za-z_]\w*)*)$").unwrap()
});

#[derive(Debug)]
enum Scope {
    /// Namespace scope; remembers how many identifiers it pushed.
    Namespace(usize),
    Class,
    /// Function body, enum, initializer, or anything else skipped as-is.
    Opaque,
}

/// Scan one file's text into an immutable [`FileScan`].
pub fn scan_file(path: &Path, text: &str) -> FileScan {
    let mut scan = FileScan {
        file: path.to_path_buf(),
        ..Default::default()
    };

    if looks_malformed(text) {
        scan.warnings.push(format!(
            "malformed input: {} cannot be tokenized, skipped",
            path.display()
        ));
        return scan;
    }

    for caps in INCLUDE_RE.captures_iter(text) {
        scan.includes.push(caps[1].to_string());
    }

    let blanked = blank_noncode(text);
    walk(&blanked, &mut scan);
    scan
}

/// Replace comments, string/char literals, and preprocessor lines with
/// spaces, preserving length and line structure.
fn blank_noncode(text: &str) -> String {
    #[derive(PartialEq)]
    enum State {
        Normal,
        LineComment,
        BlockComment,
        Str,
        Char,
        Preprocessor,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Normal;
    let mut chars = text.chars().peekable();
    let mut at_line_start = true;
    let mut escaped = false;

    while let Some(ch) = chars.next() {
        let next = chars.peek().copied();
        match state {
            State::Normal => match ch {
                '/' if next == Some('/') => {
                    state = State::LineComment;
                    out.push(' ');
                }
                '/' if next == Some('*') => {
                    state = State::BlockComment;
                    out.push(' ');
                }
                '"' => {
                    state = State::Str;
                    escaped = false;
                    out.push(' ');
                }
                '\'' => {
                    state = State::Char;
                    escaped = false;
                    out.push(' ');
                }
                '#' if at_line_start => {
                    state = State::Preprocessor;
                    out.push(' ');
                }
                _ => out.push(ch),
            },
            State::LineComment => {
                if ch == '\n' {
                    state = State::Normal;
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
            State::BlockComment => {
                if ch == '*' && next == Some('/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Normal;
                } else {
                    out.push(if ch == '\n' { '\n' } else { ' ' });
                }
            }
            State::Str | State::Char => {
                let delim = if state == State::Str { '"' } else { '\'' };
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == delim {
                    state = State::Normal;
                }
                out.push(if ch == '\n' { '\n' } else { ' ' });
            }
            State::Preprocessor => {
                if ch == '\\' && next == Some('\n') {
                    chars.next();
                    out.push_str(" \n");
                } else if ch == '\n' {
                    state = State::Normal;
                    out.push('\n');
                } else {
                    out.push(' ');
                }
            }
        }
        if ch == '\n' {
            at_line_start = true;
        } else if !ch.is_whitespace() {
            at_line_start = false;
        }
    }
    out
}

fn walk(blanked: &str, scan: &mut FileScan) {
    let mut ns_stack: Vec<String> = Vec::new();
    let mut class_stack: Vec<String> = Vec::new();
    let mut scopes: Vec<Scope> = Vec::new();
    let mut stmt_start = 0usize;
    let mut stmt_line = 1usize;
    let mut line = 1usize;

    for (idx, ch) in blanked.char_indices() {
        match ch {
            '\n' => line += 1,
            '{' => {
                let stmt = &blanked[stmt_start..idx];
                let opaque_ctx = scopes.iter().any(|s| matches!(s, Scope::Opaque));
                collect_usages(stmt, &ns_stack, scan);
                if opaque_ctx {
                    scopes.push(Scope::Opaque);
                } else if let Some(caps) = NAMESPACE_RE.captures(stmt) {
                    let parts: Vec<String> = caps
                        .get(1)
                        .map(|m| m.as_str().split("::").map(str::to_string).collect())
                        .unwrap_or_default();
                    let count = parts.len();
                    ns_stack.extend(parts);
                    scopes.push(Scope::Namespace(count));
                    let path = NamespacePath::new(ns_stack.clone());
                    if !path.is_root() && !scan.namespaces.contains(&path) {
                        scan.namespaces.push(path);
                    }
                } else if let Some(name) = class_decl_name(stmt) {
                    class_stack.push(name);
                    scopes.push(Scope::Class);
                } else {
                    // Function definition headers still yield a signature;
                    // the body itself is skipped.
                    try_extract(stmt, stmt_line, &ns_stack, &class_stack, scan);
                    scopes.push(Scope::Opaque);
                }
                stmt_start = idx + 1;
                stmt_line = line;
            }
            ';' => {
                let stmt = &blanked[stmt_start..idx];
                collect_usages(stmt, &ns_stack, scan);
                let opaque_ctx = scopes.iter().any(|s| matches!(s, Scope::Opaque));
                if !opaque_ctx {
                    try_extract(stmt, stmt_line, &ns_stack, &class_stack, scan);
                }
                stmt_start = idx + 1;
                stmt_line = line;
            }
            '}' => {
                collect_usages(&blanked[stmt_start..idx], &ns_stack, scan);
                match scopes.pop() {
                    Some(Scope::Namespace(count)) => {
                        ns_stack.truncate(ns_stack.len().saturating_sub(count));
                    }
                    Some(Scope::Class) => {
                        class_stack.pop();
                    }
                    Some(Scope::Opaque) => {}
                    None => {
                        scan.warnings.push(format!(
                            "malformed input: unbalanced '}}' at {}:{line}",
                            scan.file.display()
                        ));
                    }
                }
                stmt_start = idx + 1;
                stmt_line = line;
            }
            _ => {}
        }
    }
}

fn class_decl_name(stmt: &str) -> Option<String> {
    if stmt.trim_start().starts_with("enum") {
        return None;
    }
    CLASS_RE.captures(stmt).map(|caps| caps[1].to_string())
}

/// Record namespace-prefix usages found in a statement, attributed to the
/// namespace scope where they appear.
fn collect_usages(stmt: &str, ns_stack: &[String], scan: &mut FileScan) {
    let from = NamespacePath::new(ns_stack.to_vec());

    if let Some(caps) = USING_NAMESPACE_RE.captures(stmt.trim_end()) {
        push_usage(scan, &from, NamespacePath::from_colon_str(&caps[1]));
        return;
    }

    for caps in QUALIFIED_RE.captures_iter(stmt) {
        let mut parts: Vec<String> = caps[1].split("::").map(str::to_string).collect();
        parts.pop(); // last segment is the symbol, not a namespace
        if parts.is_empty() {
            continue;
        }
        push_usage(scan, &from, NamespacePath::new(parts));
    }
}

fn push_usage(scan: &mut FileScan, from: &NamespacePath, to: NamespacePath) {
    let usage = UsageRef {
        from: from.clone(),
        to,
        reason: EdgeReason::QualifiedCall,
    };
    if !scan.usages.contains(&usage) {
        scan.usages.push(usage);
    }
}

/// Try to read a function declaration out of one statement. Returns nothing
/// for non-function statements; ambiguous shapes add a warning instead.
fn try_extract(
    raw_stmt: &str,
    stmt_line: usize,
    ns_stack: &[String],
    class_stack: &[String],
    scan: &mut FileScan,
) {
    // Line of the first non-whitespace character within the statement.
    let leading_newlines = raw_stmt
        .find(|c: char| !c.is_whitespace())
        .map(|pos| raw_stmt[..pos].matches('\n').count())
        .unwrap_or(0);
    let line = stmt_line + leading_newlines;

    let stmt = strip_access_labels(strip_template_prefix(raw_stmt.trim()));
    if stmt.is_empty() || !stmt.contains('(') {
        return;
    }
    if stmt.contains("(*") {
        scan.warnings.push(format!(
            "ambiguous match: function-pointer declarator skipped at {}:{line}",
            scan.file.display()
        ));
        return;
    }

    let Some((head, params_raw, tail)) = split_paren_region(stmt) else {
        return;
    };
    let Some(head_caps) = HEAD_RE.captures(head.trim()) else {
        return;
    };
    let Some(tail_caps) = TAIL_RE.captures(tail.trim()) else {
        return;
    };

    let name = head_caps["name"].to_string();
    if name.starts_with('~') || name.starts_with("operator") {
        return;
    }
    // A name equal to the enclosing class is a constructor.
    if class_stack.last().map(String::as_str) == Some(name.as_str()) {
        return;
    }

    let mut return_type = head_caps["ret"].trim().to_string();
    for c in head_caps["sep"].chars().filter(|c| *c == '*' || *c == '&') {
        return_type.push(c);
    }
    if let Some(trailing) = tail_caps.name("trailing") {
        return_type = trailing.as_str().trim().to_string();
    }
    if return_type.is_empty() || starts_with_reserved(&return_type) {
        return;
    }

    let quals = tail_caps["quals"].to_string();
    let namespace = NamespacePath::new(ns_stack.to_vec());
    let mut qualified: Vec<String> = ns_stack.to_vec();
    qualified.extend(class_stack.iter().cloned());
    qualified.push(name.clone());

    let sig = FunctionSignature {
        name,
        qualified_name: qualified.join("::"),
        file: scan.file.clone(),
        line,
        namespace,
        params: split_params(params_raw),
        return_type,
        is_const: quals.split_whitespace().any(|q| q == "const"),
        is_noexcept: quals.contains("noexcept"),
        is_virtual: head_caps.name("virtual").is_some(),
        is_override: quals.split_whitespace().any(|q| q == "override"),
    };
    scan.functions.push(sig);
}

fn starts_with_reserved(ret: &str) -> bool {
    let first = ret.split_whitespace().next().unwrap_or("");
    matches!(
        first,
        "if" | "for"
            | "while"
            | "switch"
            | "return"
            | "catch"
            | "using"
            | "typedef"
            | "else"
            | "do"
            | "case"
            | "goto"
            | "new"
            | "delete"
            | "throw"
            | "co_return"
            | "co_await"
    )
}

fn strip_access_labels(stmt: &str) -> &str {
    match ACCESS_LABEL_RE.find(stmt) {
        Some(m) => stmt[m.end()..].trim_start(),
        None => stmt,
    }
}

/// Drop a leading `template<...>` clause, honoring nested angle brackets.
fn strip_template_prefix(stmt: &str) -> &str {
    let trimmed = stmt.trim_start();
    if !trimmed.starts_with("template") {
        return stmt;
    }
    let rest = trimmed["template".len()..].trim_start();
    if !rest.starts_with('<') {
        return stmt;
    }
    let mut depth = 0usize;
    for (idx, ch) in rest.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return rest[idx + 1..].trim_start();
                }
            }
            _ => {}
        }
    }
    stmt
}

/// Split a statement into (head, parameter list, tail) around the parameter
/// parentheses. The opening paren must directly follow an identifier; the
/// closing paren is its balanced match.
fn split_paren_region(stmt: &str) -> Option<(&str, &str, &str)> {
    let bytes = stmt.as_bytes();
    let mut open = None;
    let mut prev_non_space = None;
    for (idx, &b) in bytes.iter().enumerate() {
        if b == b'(' {
            match prev_non_space {
                Some(c) if (c as char).is_alphanumeric() || c == b'_' => {
                    open = Some(idx);
                }
                _ => {}
            }
            break;
        }
        if !(b as char).is_whitespace() {
            prev_non_space = Some(b);
        }
    }
    let open = open?;
    let mut depth = 0usize;
    for (idx, &b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&stmt[..open], &stmt[open + 1..idx], &stmt[idx + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a parameter list on top-level commas and reduce each parameter to
/// a type descriptor with the parameter name and default stripped.
fn split_params(params: &str) -> Vec<String> {
    let trimmed = params.trim();
    if trimmed.is_empty() || trimmed == "void" {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for ch in trimmed.chars() {
        match ch {
            '<' | '(' | '[' | '{' => {
                depth += 1;
                current.push(ch);
            }
            '>' | ')' | ']' | '}' => {
                depth -= 1;
                current.push(ch);
            }
            ',' if depth == 0 => {
                pieces.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        pieces.push(current);
    }
    pieces.iter().map(|p| param_descriptor(p)).collect()
}

const TYPE_KEYWORDS: &[&str] = &[
    "int", "char", "long", "short", "float", "double", "bool", "void", "auto", "unsigned",
    "signed", "wchar_t",
];

static PARAM_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.*[\s\*&>])([A-Za-z_]\w*)$").unwrap());

fn param_descriptor(param: &str) -> String {
    let without_default = param.split('=').next().unwrap_or(param).trim();
    if without_default == "..." {
        return without_default.to_string();
    }
    if let Some(caps) = PARAM_NAME_RE.captures(without_default) {
        let candidate_name = &caps[2];
        if !TYPE_KEYWORDS.contains(&candidate_name) && !candidate_name.ends_with("_t") {
            return caps[1].trim_end().to_string();
        }
    }
    without_default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn scan(text: &str) -> FileScan {
        scan_file(Path::new("test.hpp"), text)
    }

    #[test]
    fn extracts_free_function_with_namespace() {
        let text = indoc! {"
            namespace simple::protocol {
            bool parse(const uint8_t* data, size_t len);
            }
        "};
        let result = scan(text);
        assert_eq!(result.functions.len(), 1);
        let sig = &result.functions[0];
        assert_eq!(sig.name, "parse");
        assert_eq!(sig.qualified_name, "simple::protocol::parse");
        assert_eq!(sig.namespace.dotted(), "simple.protocol");
        assert_eq!(sig.params, vec!["const uint8_t*", "size_t"]);
        assert_eq!(sig.return_type, "bool");
        assert_eq!(sig.line, 2);
    }

    #[test]
    fn nested_namespaces_stack_and_pop() {
        let text = indoc! {"
            namespace simple {
            namespace net {
            void do_connect();
            }
            void after_net();
            }
            void global_fn();
        "};
        let result = scan(text);
        let by_name: Vec<(&str, String)> = result
            .functions
            .iter()
            .map(|f| (f.name.as_str(), f.namespace.dotted()))
            .collect();
        assert_eq!(
            by_name,
            vec![
                ("do_connect", "simple.net".to_string()),
                ("after_net", "simple".to_string()),
                ("global_fn", "root".to_string()),
            ]
        );
        assert_eq!(result.namespaces.len(), 2);
    }

    #[test]
    fn class_methods_get_qualified_names() {
        let text = indoc! {"
            namespace simple {
            class Socket {
            public:
                Socket();
                ~Socket();
                virtual size_t write(const char* buf, size_t n) = 0;
                bool isOpen() const noexcept;
            };
            }
        "};
        let result = scan(text);
        // Constructor and destructor are excluded.
        assert_eq!(result.functions.len(), 2);
        let write = &result.functions[0];
        assert_eq!(write.qualified_name, "simple::Socket::write");
        assert!(write.is_virtual);
        let is_open = &result.functions[1];
        assert!(is_open.is_const);
        assert!(is_open.is_noexcept);
    }

    #[test]
    fn function_bodies_are_opaque() {
        let text = indoc! {"
            namespace util {
            inline int twice(int x) {
                if (x > 0) { return x * 2; }
                return 0;
            }
            int after_body();
            }
        "};
        let result = scan(text);
        let names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["twice", "after_body"]);
    }

    #[test]
    fn keywords_in_comments_and_strings_ignored() {
        let text = indoc! {r#"
            // bool parse(const uint8_t* data, size_t len);
            /* void decode(int); */
            namespace demo {
            const char* banner(); // returns "namespace simple {"
            }
        "#};
        let result = scan(text);
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "banner");
        assert_eq!(result.functions[0].return_type, "const char*");
    }

    #[test]
    fn function_pointer_declarator_excluded_with_warning() {
        let text = indoc! {"
            namespace cfg {
            void (*error_hook)(int code);
            int real_function(int x);
            }
        "};
        let result = scan(text);
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "real_function");
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("ambiguous match")));
    }

    #[test]
    fn callback_parameter_types_survive_nested_parens() {
        let text = indoc! {"
            namespace net {
            void asyncRead(std::function<void(int, size_t)> handler);
            }
        "};
        let result = scan(text);
        assert_eq!(result.functions.len(), 1);
        assert_eq!(
            result.functions[0].params,
            vec!["std::function<void(int, size_t)>"]
        );
    }

    #[test]
    fn includes_and_qualified_usages_recorded() {
        let text = indoc! {"
            #include <vector>
            #include \"simple/net/socket.hpp\"
            namespace simple::protocol {
            void forward(simple::net::Socket& out);
            }
        "};
        let result = scan(text);
        assert_eq!(
            result.includes,
            vec!["vector".to_string(), "simple/net/socket.hpp".to_string()]
        );
        assert!(result.usages.contains(&UsageRef {
            from: NamespacePath::from_colon_str("simple::protocol"),
            to: NamespacePath::from_colon_str("simple::net"),
            reason: EdgeReason::QualifiedCall,
        }));
    }

    #[test]
    fn pure_virtual_and_default_specifiers_accepted() {
        let text = indoc! {"
            struct Handler {
                virtual void onClose() = 0;
                bool ready() const = delete;
            };
        "};
        let result = scan(text);
        let names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["onClose", "ready"]);
    }

    #[test]
    fn malformed_content_yields_only_warning() {
        let result = scan("\0\0binary");
        assert!(result.functions.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("malformed"));
    }

    #[test]
    fn unbalanced_brace_warns_and_continues() {
        let result = scan("}\nnamespace ok { void f(); }\n");
        assert!(result.warnings.iter().any(|w| w.contains("unbalanced")));
        assert_eq!(result.functions.len(), 1);
    }

    #[test]
    fn template_declaration_extracted() {
        let result = scan("template <typename T>\nT convert_value(const T& value);\n");
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "convert_value");
        assert_eq!(result.functions[0].params, vec!["const T&"]);
    }

    #[test]
    fn member_variables_are_not_functions() {
        let text = indoc! {"
            class Session {
                int count_ = 0;
                std::string label_;
                bool poll();
            };
        "};
        let result = scan(text);
        let names: Vec<&str> = result.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["poll"]);
    }

    #[test]
    fn param_descriptor_strips_names_and_defaults() {
        assert_eq!(param_descriptor("const uint8_t* data"), "const uint8_t*");
        assert_eq!(param_descriptor("size_t len"), "size_t");
        assert_eq!(param_descriptor("size_t"), "size_t");
        assert_eq!(param_descriptor("unsigned int"), "unsigned int");
        assert_eq!(param_descriptor("int retries = 3"), "int");
        assert_eq!(
            param_descriptor("std::vector<int> values"),
            "std::vector<int>"
        );
    }
}
