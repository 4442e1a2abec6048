//! List response envelopes.

use serde::Deserialize;

/// A list endpoint body: a flat array or a `{results: [...]}` page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Page<T> {
    Paged {
        results: Vec<T>,
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
    },
    Flat(Vec<T>),
}

impl<T> Page<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Page::Paged { results, .. } => results,
            Page::Flat(items) => items,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Page::Paged { results, .. } => results,
            Page::Flat(items) => items,
        }
    }

    /// Total count reported by the server, else the number of items.
    pub fn total(&self) -> u64 {
        match self {
            Page::Paged { count: Some(count), .. } => *count,
            _ => self.items().len() as u64,
        }
    }
}
