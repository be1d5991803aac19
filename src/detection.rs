use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Which detector produced a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectorKind {
    Prototypal,
    UtilInherits,
}

impl DetectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectorKind::Prototypal => "prototypal",
            DetectorKind::UtilInherits => "util-inherits",
        }
    }

    pub fn from_str(s: &str) -> Option<DetectorKind> {
        match s.to_lowercase().as_str() {
            "prototypal" => Some(DetectorKind::Prototypal),
            "util-inherits" | "utilinherits" | "util_inherits" => Some(DetectorKind::UtilInherits),
            _ => None,
        }
    }
}

impl fmt::Display for DetectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A statement that encodes part of an inheritance relationship, together
/// with its immediate parent so a rewriter can remove or replace it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedExpression<'a> {
    pub node: &'a Value,
    pub parent: Option<&'a Value>,
}

/// A recognized class/superclass relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Detection<'a> {
    pub kind: DetectorKind,
    pub class_name: String,
    pub super_class: &'a Value,
    pub related_expressions: Vec<RelatedExpression<'a>>,
}

impl Detection<'_> {
    /// Source text of the superclass when it is a plain or dotted name.
    pub fn super_class_name(&self) -> Option<String> {
        dotted_name(self.super_class)
    }
}

fn dotted_name(node: &Value) -> Option<String> {
    match node.get("type").and_then(Value::as_str)? {
        "Identifier" => node.get("name").and_then(Value::as_str).map(str::to_string),
        "MemberExpression" => {
            if node.get("computed").and_then(Value::as_bool) == Some(true) {
                return None;
            }
            let object = dotted_name(node.get("object")?)?;
            let property = node.get("property")?.get("name")?.as_str()?;
            Some(format!("{object}.{property}"))
        }
        _ => None,
    }
}

impl fmt::Display for Detection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let super_name = self
            .super_class_name()
            .unwrap_or_else(|| "<expression>".to_string());
        write!(
            f,
            "{}: {} extends {} ({} statement{})",
            self.kind,
            self.class_name,
            super_name,
            self.related_expressions.len(),
            if self.related_expressions.len() == 1 { "" } else { "s" },
        )
    }
}
