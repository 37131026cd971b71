//! `group` / `group/variant` identifiers.
use std::fmt;

use crate::error::{ConfsError, Result};

/// Separator between the group and variant segments.
pub const SEPARATOR: char = '/';

/// A parsed identifier addressing a group and optionally one of its variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    /// Group segment.
    pub group: String,
    /// Variant segment, if one was given.
    pub variant: Option<String>,
}

impl Identifier {
    /// Parse `group` or `group/variant`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidIdentifier`] for more than one separator
    /// or an empty segment.
    pub fn parse(identifier: &str) -> Result<Self> {
        let invalid = |reason: &str| ConfsError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        };

        let mut segments = identifier.split(SEPARATOR);
        let group = segments.next().unwrap_or_default();
        let variant = segments.next();
        if segments.next().is_some() {
            return Err(invalid("it may contain at most one '/'"));
        }
        if group.is_empty() {
            return Err(invalid("group name is empty"));
        }
        if variant.is_some_and(str::is_empty) {
            return Err(invalid("variant name is empty"));
        }

        Ok(Self {
            group: group.to_string(),
            variant: variant.map(str::to_string),
        })
    }

    /// Parse `group/variant`, where the variant is mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidIdentifier`] if the identifier is
    /// malformed or names only a group.
    pub fn parse_with_variant(identifier: &str) -> Result<(String, String)> {
        let parsed = Self::parse(identifier)?;
        match parsed.variant {
            Some(variant) => Ok((parsed.group, variant)),
            None => Err(ConfsError::InvalidIdentifier {
                identifier: identifier.to_string(),
                reason: "variant name is missing (expected group/variant)".to_string(),
            }),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variant {
            Some(variant) => write!(f, "{}{SEPARATOR}{variant}", self.group),
            None => f.write_str(&self.group),
        }
    }
}
