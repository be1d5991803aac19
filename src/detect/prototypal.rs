//! Detects prototype-based inheritance:
//!
//! ```js
//! Class1.prototype = Object.create(Class2.prototype);
//! // or
//! Class1.prototype = new Class2();
//! // optionally followed by
//! Class1.prototype.constructor = Class1;
//! ```

use std::collections::HashMap;

use serde_json::Value;

use super::Detector;
use crate::detection::{Detection, DetectorKind, RelatedExpression};
use crate::node_pattern::{
    capture, lit, match_pattern, seq, typed, Captures, Pattern, PatternError,
};

pub struct Prototypal<'a> {
    /// Class name -> superclass expression, filled by the superclass-setting
    /// statements and read back when the constructor is restored.
    found_superclasses: HashMap<String, &'a Value>,
    new_assignment: Pattern,
    object_create_assignment: Pattern,
    constructor_assignment: Pattern,
}

impl<'a> Prototypal<'a> {
    pub fn new() -> Self {
        Self {
            found_superclasses: HashMap::new(),
            new_assignment: new_assignment_pattern(),
            object_create_assignment: object_create_assignment_pattern(),
            constructor_assignment: constructor_assignment_pattern(),
        }
    }

    /// Superclass recorded for `class_name` so far in this traversal.
    pub fn superclass_of(&self, class_name: &str) -> Option<&'a Value> {
        self.found_superclasses.get(class_name).copied()
    }

    fn match_superclass_assignment(
        &self,
        node: &'a Value,
    ) -> Result<Option<Captures<'a>>, PatternError> {
        if let Some(captures) = match_pattern(&self.new_assignment, node)? {
            return Ok(Some(captures));
        }
        match_pattern(&self.object_create_assignment, node)
    }

    pub fn process(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<Option<Detection<'a>>, PatternError> {
        if let Some(m) = self.match_superclass_assignment(node)? {
            let (Some(class_name), Some(super_class)) = (m.str("className"), m.get("superClass"))
            else {
                return Ok(None);
            };
            self.found_superclasses
                .insert(class_name.to_string(), super_class);
            return Ok(Some(detection(class_name, super_class, node, parent)));
        }

        if let Some(m) = match_pattern(&self.constructor_assignment, node)? {
            let (Some(class_name), Some(constructor_name)) =
                (m.str("className"), m.str("constructorClassName"))
            else {
                return Ok(None);
            };
            if class_name != constructor_name {
                return Ok(None);
            }
            if let Some(super_class) = self.superclass_of(class_name) {
                return Ok(Some(detection(class_name, super_class, node, parent)));
            }
        }

        Ok(None)
    }
}

impl Default for Prototypal<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Detector<'a> for Prototypal<'a> {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Prototypal
    }

    fn process(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<Option<Detection<'a>>, PatternError> {
        Prototypal::process(self, node, parent)
    }
}

fn detection<'a>(
    class_name: &str,
    super_class: &'a Value,
    node: &'a Value,
    parent: Option<&'a Value>,
) -> Detection<'a> {
    Detection {
        kind: DetectorKind::Prototypal,
        class_name: class_name.to_string(),
        super_class,
        related_expressions: vec![RelatedExpression { node, parent }],
    }
}

fn identifier_named(name: Pattern) -> Pattern {
    typed("Identifier", [("name", name)])
}

/// `<object>.<property>`. `computed` is not checked, so `a[property]` matches too.
fn member_of(object: Pattern, property: &str) -> Pattern {
    typed(
        "MemberExpression",
        [("object", object), ("property", identifier_named(lit(property)))],
    )
}

fn prototype_assignment(right: Pattern) -> Pattern {
    typed(
        "ExpressionStatement",
        [(
            "expression",
            typed(
                "AssignmentExpression",
                [
                    ("left", member_of(identifier_named(capture("className")), "prototype")),
                    ("right", right),
                ],
            ),
        )],
    )
}

/// `<className>.prototype = new <superClass>();`
fn new_assignment_pattern() -> Pattern {
    prototype_assignment(typed("NewExpression", [("callee", capture("superClass"))]))
}

/// `<className>.prototype = Object.create(<superClass>.prototype);`
fn object_create_assignment_pattern() -> Pattern {
    prototype_assignment(typed(
        "CallExpression",
        [
            ("callee", member_of(identifier_named(lit("Object")), "create")),
            (
                "arguments",
                seq([member_of(capture("superClass"), "prototype")]),
            ),
        ],
    ))
}

/// `<className>.prototype.constructor = <constructorClassName>;`
fn constructor_assignment_pattern() -> Pattern {
    typed(
        "ExpressionStatement",
        [(
            "expression",
            typed(
                "AssignmentExpression",
                [
                    (
                        "left",
                        member_of(
                            member_of(identifier_named(capture("className")), "prototype"),
                            "constructor",
                        ),
                    ),
                    ("right", identifier_named(capture("constructorClassName"))),
                ],
            ),
        )],
    )
}
