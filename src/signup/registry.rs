//! Taken display names.

use dashmap::DashSet;

/// Case-insensitive set of display names in use. Names are never released.
#[derive(Debug, Default)]
pub struct DisplayNameRegistry {
    names: DashSet<String>,
}

impl DisplayNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with `names`.
    pub fn with_reserved<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = Self::new();
        for name in names {
            registry.reserve(name.as_ref());
        }
        registry
    }

    pub fn is_taken(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Mark `name` as taken. Returns false if it already was.
    pub fn reserve(&self, name: &str) -> bool {
        self.names.insert(name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
