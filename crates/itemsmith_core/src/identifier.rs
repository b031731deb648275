//! Namespaced identifier grammar and validation presets.
//!
//! # Responsibility
//! - Validate `namespace:path` strings against a configurable grammar.
//! - Insert the default namespace when none is given.
//!
//! # Invariants
//! - A validated identifier contains exactly one `:` once markers are stripped.
//! - Validation is a pure function of (validator options, input).
//! - Leading markers that the validator permits are kept in the output.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Namespace inserted when an identifier has no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";
/// Leading marker for tag references.
pub const TAG_MARKER: char = '#';
/// Leading marker for negated references.
pub const NEGATION_MARKER: char = '!';

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-z0-9](?:[a-z0-9_-]*[a-z0-9])?:[a-z0-9](?:[a-z0-9._-]*[a-z0-9])?(?:/[a-z0-9](?:[a-z0-9._-]*[a-z0-9])?)*$",
    )
    .expect("valid identifier regex")
});

/// Grammar options for one identifier context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentifierValidator {
    allow_tag: bool,
    allow_negation: bool,
    allow_paths: bool,
}

impl IdentifierValidator {
    /// Item ids, asset ids and sound events: no markers, no `/` paths.
    pub const PLAIN: Self = Self::new(false, false, false);
    /// Function references, tag ids and field keys: no markers, paths allowed.
    pub const PLAIN_PATH: Self = Self::new(false, false, true);
    /// Places accepting either an id or a `#tag` reference.
    pub const TAG_LIKE: Self = Self::new(true, false, true);
    /// Field queries that may be negated with a leading `!`.
    pub const NEGATABLE: Self = Self::new(false, true, true);

    pub const fn new(allow_tag: bool, allow_negation: bool, allow_paths: bool) -> Self {
        Self {
            allow_tag,
            allow_negation,
            allow_paths,
        }
    }

    pub fn allows_tag(&self) -> bool {
        self.allow_tag
    }

    pub fn allows_negation(&self) -> bool {
        self.allow_negation
    }

    pub fn allows_paths(&self) -> bool {
        self.allow_paths
    }

    /// Validates `input` and returns it with the default namespace applied.
    ///
    /// Markers are stripped in order (negation, then tag) only when the
    /// validator permits them; the namespace is inserted after them.
    ///
    /// # Errors
    /// - `PathsNotAllowed` when the path part contains `/` and paths are off.
    /// - `Malformed` when the stripped string does not match the grammar.
    pub fn validate(&self, input: &str) -> Result<String, ValidationError> {
        let mut rest = input;
        if self.allow_negation {
            rest = rest.strip_prefix(NEGATION_MARKER).unwrap_or(rest);
        }
        if self.allow_tag {
            rest = rest.strip_prefix(TAG_MARKER).unwrap_or(rest);
        }
        let markers = &input[..input.len() - rest.len()];

        let qualified = if rest.contains(':') {
            rest.to_string()
        } else {
            format!("{DEFAULT_NAMESPACE}:{rest}")
        };

        if !self.allow_paths {
            let path = qualified.split_once(':').map_or("", |(_, path)| path);
            if path.contains('/') {
                return Err(self.error(input, ValidationRule::PathsNotAllowed));
            }
        }

        if !IDENTIFIER_RE.is_match(&qualified) {
            return Err(self.error(input, ValidationRule::Malformed));
        }

        Ok(format!("{markers}{qualified}"))
    }

    /// Returns whether `input` validates under this grammar.
    pub fn is_valid(&self, input: &str) -> bool {
        self.validate(input).is_ok()
    }

    fn error(&self, input: &str, rule: ValidationRule) -> ValidationError {
        ValidationError {
            input: input.to_string(),
            rule,
            validator: *self,
        }
    }
}

impl Default for IdentifierValidator {
    fn default() -> Self {
        Self::PLAIN_PATH
    }
}

/// Splits a validated, marker-free identifier into `(namespace, path)`.
pub fn split_identifier(identifier: &str) -> (&str, &str) {
    identifier
        .split_once(':')
        .unwrap_or((DEFAULT_NAMESPACE, identifier))
}

/// Grammar rule violated by an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    PathsNotAllowed,
    Malformed,
}

/// Identifier validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub input: String,
    pub rule: ValidationRule,
    pub validator: IdentifierValidator,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.rule {
            ValidationRule::PathsNotAllowed => {
                write!(f, "identifier `{}` must not contain a path", self.input)
            }
            ValidationRule::Malformed => write!(
                f,
                "identifier `{}` does not match `namespace:path` (tag={}, negation={}, paths={})",
                self.input,
                self.validator.allow_tag,
                self.validator.allow_negation,
                self.validator.allow_paths
            ),
        }
    }
}

impl Error for ValidationError {}
