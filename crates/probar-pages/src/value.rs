//! Values produced by queries and predicates.

use serde::{Deserialize, Serialize};

/// Result of reading a query or predicate node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Single text (text, attribute and value queries)
    Text(String),
    /// One value per matched element (`multiple`)
    List(Vec<Value>),
    /// Match count
    Count(usize),
    /// Predicate outcome
    Bool(bool),
    /// Absent attribute or value
    Missing,
}

impl Value {
    /// Text, if this is a single text
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Predicate outcome, if this is one
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Count, if this is one
    #[must_use]
    pub const fn as_count(&self) -> Option<usize> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Option<String>> for Value {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Missing, Self::Text)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == Some(*other)
    }
}

impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<usize> for Value {
    fn eq(&self, other: &usize) -> bool {
        self.as_count() == Some(*other)
    }
}

impl PartialEq<Vec<&str>> for Value {
    fn eq(&self, other: &Vec<&str>) -> bool {
        matches!(self, Self::List(items) if items.len() == other.len()
            && items.iter().zip(other).all(|(item, text)| item == text))
    }
}
