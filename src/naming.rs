//! The `NNN-name` convention for level directories and topic files.
//!
//! Both levels (`010-beginner/`) and topics (`020-crud-operations.md`) carry
//! an optional numeric prefix. The number orders entries and puts them in the
//! navigation; entries without one are still built but only reachable by URL.
//!
//! - `010-beginner` → slug `beginner`, title "Beginner"
//! - `020-crud-operations` → slug `crud-operations`, title "Crud operations"
//! - `scratch-notes` → unnumbered, slug `scratch-notes`

/// Result of parsing an entry name like `020-crud-operations`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (`20` from `020-crud-operations`).
    pub number: Option<u32>,
    /// URL slug: the name after `NNN-`, or the whole input when unnumbered.
    pub slug: String,
    /// Dashes to spaces, first letter uppercased.
    pub display_title: String,
}

impl ParsedName {
    /// Sort key: numbered entries first, in number order.
    pub fn sort_key(&self) -> u32 {
        self.number.unwrap_or(u32::MAX)
    }

    pub fn in_nav(&self) -> bool {
        self.number.is_some()
    }
}

/// Parse a directory name or file stem following the `NNN-name` convention.
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, rest)) = name.split_once('-')
        && !prefix.is_empty()
        && prefix.bytes().all(|b| b.is_ascii_digit())
        && let Ok(number) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(number),
            slug: rest.to_string(),
            display_title: display_title(rest),
        };
    }
    ParsedName {
        number: None,
        slug: name.to_string(),
        display_title: display_title(name),
    }
}

fn display_title(slug: &str) -> String {
    let spaced = slug.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
