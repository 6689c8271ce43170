#![forbid(unsafe_code)]

//! Constraint message templates and interpolation.
//!
//! # Invariants
//!
//! 1. **Every built-in code has a template**: [`MessageCatalog::new`] covers
//!    every code returned by [`Constraint::code`](crate::Constraint::code)
//!    except `Custom`, which carries its own message.
//!
//! 2. **Interpolation is single-pass**: `interpolate()` replaces `{name}` and
//!    `${name}` tokens in one scan; substituted text is never re-scanned.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown code | Code never inserted | Falls back to the code itself |
//! | Bad interpolation arg | `{name}` but no `name` arg | Token left as-is |
//! | Unclosed brace | `{name` at end of template | Emitted as-is |

use std::collections::HashMap;

/// Message templates keyed by constraint code.
///
/// # Example
///
/// ```
/// use bindery_validation::MessageCatalog;
///
/// let mut catalog = MessageCatalog::new();
/// assert_eq!(
///     catalog.format("Size", &[("min", "3"), ("max", "10")]),
///     "size must be between 3 and 10"
/// );
///
/// catalog.insert("NotNull", "is required");
/// assert_eq!(catalog.format("NotNull", &[]), "is required");
/// ```
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCatalog {
    /// A catalog with the default English templates.
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        catalog.insert("NotNull", "may not be null");
        catalog.insert("NotBlank", "may not be empty");
        catalog.insert("Size", "size must be between {min} and {max}");
        catalog.insert("Min", "must be greater than or equal to {value}");
        catalog.insert("Max", "must be less than or equal to {value}");
        catalog.insert("Pattern", "must match \"{regexp}\"");
        catalog.insert("Past", "must be in the past");
        catalog.insert("Future", "must be in the future");
        catalog
    }

    /// A catalog with no templates.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Insert or replace the template for `code`.
    pub fn insert(&mut self, code: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(code.into(), template.into());
    }

    /// The raw template for `code`.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.templates.get(code).map(String::as_str)
    }

    /// Format the template for `code` with `args`.
    ///
    /// Unknown codes format as the code itself.
    #[must_use]
    pub fn format(&self, code: &str, args: &[(&str, &str)]) -> String {
        match self.get(code) {
            Some(template) => interpolate(template, args),
            None => code.to_string(),
        }
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the catalog has no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Single-pass `{name}` / `${name}` interpolation. Unmatched tokens left as-is.
#[must_use]
pub fn interpolate(template: &str, args: &[(&str, &str)]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        let dollar = ch == '$' && chars.peek() == Some(&'{');
        if dollar {
            chars.next();
        } else if ch != '{' {
            result.push(ch);
            continue;
        }
        let opener = if dollar { "${" } else { "{" };

        let mut token = String::new();
        let mut found_close = false;
        for c in chars.by_ref() {
            if c == '}' {
                found_close = true;
                break;
            }
            token.push(c);
        }

        if !found_close {
            // Unclosed brace: emit as-is
            result.push_str(opener);
            result.push_str(&token);
        } else if let Some(&(_, value)) = args.iter().find(|&&(name, _)| name == token) {
            result.push_str(value);
        } else {
            result.push_str(opener);
            result.push_str(&token);
            result.push('}');
        }
    }

    result
}
