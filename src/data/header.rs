// src/data/header.rs

//! Implements the [`HeaderRule`] and [`HeaderField`] structs.
//!
//! Header fields are file-level metadata the metering unit prints once or
//! a few times per session, e.g. `g_meterId` or the ICCID. They are
//! captured independently of the event timeline; no timestamp association.
//!
//! [`HeaderRule`]: crate::data::header::HeaderRule
//! [`HeaderField`]: crate::data::header::HeaderField

use std::fmt;

use ::itertools::Itertools;

// ----------
// HeaderRule

/// One configured metadata key and its human-readable meaning.
///
/// Unlike a [`KeywordRule`] the key is matched case-sensitively as an
/// exact substring; firmware variable names are exact.
///
/// [`KeywordRule`]: crate::data::event::KeywordRule
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HeaderRule {
    key: String,
    meaning: String,
}

pub type HeaderRules = Vec<HeaderRule>;

impl HeaderRule {
    pub fn new(
        key: &str,
        meaning: &str,
    ) -> HeaderRule {
        HeaderRule {
            key: String::from(key),
            meaning: String::from(meaning),
        }
    }

    pub fn key(self: &HeaderRule) -> &str {
        &self.key
    }

    pub fn meaning(self: &HeaderRule) -> &str {
        &self.meaning
    }
}

// -----------
// HeaderField

/// One configured metadata key, its meaning, and every value captured for
/// it, in occurrence order.
///
/// A captured value is the trimmed remainder of the matching line after
/// the first occurrence of the key literal. Multiple occurrences append,
/// never overwrite. A key that never occurs keeps an empty value
/// sequence; it is not absent.
pub struct HeaderField {
    rule: HeaderRule,
    values: Vec<String>,
}

pub type HeaderFields = Vec<HeaderField>;

impl fmt::Debug for HeaderField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter,
    ) -> fmt::Result {
        f.debug_struct("HeaderField")
            .field("key", &self.rule.key())
            .field("values", &self.values)
            .finish()
    }
}

impl HeaderField {
    pub fn new(rule: HeaderRule) -> HeaderField {
        HeaderField {
            rule,
            values: Vec::new(),
        }
    }

    pub fn key(self: &HeaderField) -> &str {
        self.rule.key()
    }

    pub fn meaning(self: &HeaderField) -> &str {
        self.rule.meaning()
    }

    pub fn values(self: &HeaderField) -> &Vec<String> {
        &self.values
    }

    /// Append one captured value; occurrence order is preserved.
    pub(crate) fn push_value(
        self: &mut HeaderField,
        value: String,
    ) {
        self.values.push(value);
    }

    /// All captured values joined for display, the way the report file
    /// lists them.
    pub fn values_joined(self: &HeaderField) -> String {
        self.values.iter().join(", ")
    }
}
