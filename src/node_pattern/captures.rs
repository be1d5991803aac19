use std::collections::BTreeMap;

use serde_json::Value;

use super::interpreter::PatternError;

/// Values bound by `$name` captures during one successful match.
///
/// Captured values borrow from the tree that was matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Captures<'a> {
    bound: BTreeMap<String, &'a Value>,
}

impl<'a> Captures<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`. Binding the same name twice is a pattern bug.
    pub fn bind(&mut self, name: &str, value: &'a Value) -> Result<(), PatternError> {
        if self.bound.contains_key(name) {
            return Err(PatternError::DuplicateCapture {
                name: name.to_string(),
            });
        }
        self.bound.insert(name.to_string(), value);
        Ok(())
    }

    /// Merge another capture set into this one, rejecting collisions.
    pub fn merge(&mut self, other: Captures<'a>) -> Result<(), PatternError> {
        for (name, value) in other.bound {
            self.bind(&name, value)?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.bound.get(name).copied()
    }

    /// Captured value as a string scalar, if it is one.
    pub fn str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bound.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &'a Value)> + '_ {
        self.bound.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn into_map(self) -> BTreeMap<String, &'a Value> {
        self.bound
    }
}
