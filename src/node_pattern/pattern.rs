//! Structural pattern definitions.
//!
//! A `Pattern` mirrors the shape of the ESTree node it is meant to match.
//! Patterns are built in code with the helper constructors at the bottom of
//! this file rather than parsed from text, because predicates are closures.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::interpreter::PatternError;

/// Boxed predicate over a node field value.
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum Pattern {
    /// Matches any value. Used as the inner pattern of a bare capture.
    Any,
    /// Scalar that must equal the node value exactly.
    Literal(Value),
    /// Named fields, each matched against the node field of the same name.
    /// Fields not listed here are ignored.
    Node(Vec<(String, Pattern)>),
    /// Arbitrary check on the field value.
    Predicate(PredicateFn),
    /// $name: capture the matched value under `name`.
    Capture { name: String, inner: Box<Pattern> },
    /// Exact-length sequence, matched element-wise.
    Sequence(Vec<Pattern>),
}

impl Pattern {
    /// All capture names in the order they appear (depth-first, field order).
    pub fn capture_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_capture_names(&mut names);
        names
    }

    fn collect_capture_names<'p>(&'p self, out: &mut Vec<&'p str>) {
        match self {
            Pattern::Capture { name, inner } => {
                out.push(name.as_str());
                inner.collect_capture_names(out);
            }
            Pattern::Node(fields) => {
                for (_, field) in fields {
                    field.collect_capture_names(out);
                }
            }
            Pattern::Sequence(items) => {
                for item in items {
                    item.collect_capture_names(out);
                }
            }
            Pattern::Any | Pattern::Literal(_) | Pattern::Predicate(_) => {}
        }
    }

    /// Reject patterns that bind the same capture name twice.
    pub fn validate(&self) -> Result<(), PatternError> {
        let mut seen = HashSet::new();
        for name in self.capture_names() {
            if !seen.insert(name) {
                return Err(PatternError::DuplicateCapture {
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Any => write!(f, "_"),
            Pattern::Literal(v) => write!(f, "{v}"),
            Pattern::Node(fields) => {
                let mut map = f.debug_map();
                for (name, pattern) in fields {
                    map.entry(name, pattern);
                }
                map.finish()
            }
            Pattern::Predicate(_) => write!(f, "#predicate"),
            Pattern::Capture { name, inner } => write!(f, "${name}({inner:?})"),
            Pattern::Sequence(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::Literal(Value::String(s.to_string()))
    }
}

/// Structural pattern with the given fields.
pub fn node<I, K>(fields: I) -> Pattern
where
    I: IntoIterator<Item = (K, Pattern)>,
    K: Into<String>,
{
    Pattern::Node(fields.into_iter().map(|(k, p)| (k.into(), p)).collect())
}

/// Structural pattern with a fixed `type` tag plus the given fields.
pub fn typed<I, K>(node_type: &str, fields: I) -> Pattern
where
    I: IntoIterator<Item = (K, Pattern)>,
    K: Into<String>,
{
    let mut all = vec![("type".to_string(), lit(node_type))];
    all.extend(fields.into_iter().map(|(k, p)| (k.into(), p)));
    Pattern::Node(all)
}

/// Structural pattern that only checks the `type` tag.
pub fn of_type(node_type: &str) -> Pattern {
    Pattern::Node(vec![("type".to_string(), lit(node_type))])
}

pub fn lit(value: impl Into<Value>) -> Pattern {
    Pattern::Literal(value.into())
}

pub fn any() -> Pattern {
    Pattern::Any
}

/// Capture whatever is found at this location.
pub fn capture(name: &str) -> Pattern {
    capture_as(name, Pattern::Any)
}

/// Capture the value at this location, which must also match `inner`.
pub fn capture_as(name: &str, inner: Pattern) -> Pattern {
    Pattern::Capture {
        name: name.to_string(),
        inner: Box::new(inner),
    }
}

/// Sequence of exactly `items.len()` elements.
pub fn seq<I>(items: I) -> Pattern
where
    I: IntoIterator<Item = Pattern>,
{
    Pattern::Sequence(items.into_iter().collect())
}

pub fn pred<F>(f: F) -> Pattern
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Pattern::Predicate(Arc::new(f))
}
