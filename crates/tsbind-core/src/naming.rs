//! Identifier derivation for generated Rust items.
//!
//! Source names come straight from declaration files, so they may use
//! camelCase, contain `$`, start with a digit, or collide with a Rust keyword.
//! Everything that becomes an output identifier goes through one of the
//! functions here:
//! - [`type_ident`] keeps the source casing (classes, interfaces)
//! - [`member_ident`] converts to snake_case (methods, properties, parameters)
//! - [`module_ident`] converts to snake_case (namespaces)

/// Keywords that cannot be used as plain identifiers.
const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that are not allowed as raw identifiers either.
const NOT_RAW: &[&str] = &["crate", "self", "Self", "super"];

/// Convert a camelCase or PascalCase name to snake_case
///
/// Acronyms are kept together, so `HTMLElement` becomes `html_element`.
///
/// # Examples
/// ```
/// use tsbind_core::naming::to_snake_case;
/// assert_eq!(to_snake_case("fromImage"), "from_image");
/// assert_eq!(to_snake_case("HTMLElement"), "html_element");
/// assert_eq!(to_snake_case("x"), "x");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_uppercase() => next.map_or(false, |n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

/// Make an arbitrary source name usable as a Rust identifier, keeping its casing
pub fn escape_ident(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if ident.is_empty() {
        return "_".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED.contains(&ident.as_str()) {
        if NOT_RAW.contains(&ident.as_str()) {
            ident.push('_');
        } else {
            ident.insert_str(0, "r#");
        }
    }
    ident
}

/// Identifier for a class or interface
pub fn type_ident(name: &str) -> String {
    escape_ident(name)
}

/// Identifier for a method, property or parameter
pub fn member_ident(name: &str) -> String {
    escape_ident(&to_snake_case(name))
}

/// Identifier for a namespace (Rust module)
pub fn module_ident(name: &str) -> String {
    escape_ident(&to_snake_case(name))
}
