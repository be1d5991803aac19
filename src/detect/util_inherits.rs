//! Detects Node's `util.inherits(Class, Super)`.
//!
//! The `util` module has to be imported at the top level first, in one of
//! these forms:
//!
//! ```js
//! var util = require("util");
//! var inherits = require("util").inherits;
//! var { inherits } = require("util");
//! ```

use serde_json::Value;

use super::Detector;
use crate::detection::{Detection, DetectorKind, RelatedExpression};
use crate::js::{identifier_name, is_type, is_var_with_require_calls, node_type, require_call};
use crate::node_pattern::{
    capture, is_match, lit, match_pattern, node, pred, seq, typed, MatchResult, Pattern,
    PatternError,
};

#[derive(Debug, Default)]
pub struct UtilInheritsMatcher<'a> {
    /// Identifier bound to the `util` module.
    util_node: Option<&'a Value>,
    /// Identifier bound to `util.inherits` itself.
    inherits_node: Option<&'a Value>,
}

impl<'a> UtilInheritsMatcher<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn util_node(&self) -> Option<&'a Value> {
        self.util_node
    }

    pub fn inherits_node(&self) -> Option<&'a Value> {
        self.inherits_node
    }

    /// Look for a top-level `util` import and remember the identifier it
    /// binds. Returns whether `node` was recognized as a `util` import, even
    /// if it binds nothing usable (e.g. `var { format } = require("util")`).
    pub fn discover_identifiers(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<bool, PatternError> {
        if !is_var_with_require_calls(node) {
            return Ok(false);
        }
        if parent.and_then(node_type) != Some("Program") {
            return Ok(false);
        }

        let direct = direct_require_pattern();
        let via_member = member_require_pattern();
        let mut declaration = None;
        for dec in node
            .get("declarations")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
        {
            if is_match(&direct, dec)? || is_match(&via_member, dec)? {
                declaration = Some(dec);
                break;
            }
        }
        let Some(declaration) = declaration else {
            return Ok(false);
        };

        let id = &declaration["id"];
        let init = &declaration["init"];
        if is_match(&inherits_member_pattern(), declaration)? {
            if is_type(id, "Identifier") {
                self.inherits_node = Some(id);
            }
        } else {
            match node_type(id) {
                Some("Identifier") => self.util_node = Some(id),
                Some("ObjectPattern") if is_type(init, "CallExpression") => {
                    if let Some(local) = destructured_inherits(id) {
                        self.inherits_node = Some(local);
                    }
                }
                _ => {}
            }
        }

        Ok(true)
    }

    /// Match `util.inherits(Class, Super);` (or `inherits(Class, Super);`)
    /// against the identifiers discovered so far.
    pub fn match_node(&self, node: &'a Value) -> MatchResult<'a> {
        let util_name = self.util_node.and_then(identifier_name).map(str::to_string);
        let inherits_name = self.inherits_node.and_then(identifier_name).map(str::to_string);
        if util_name.is_none() && inherits_name.is_none() {
            return Ok(None);
        }

        let callee = pred(move |callee| {
            util_name
                .as_deref()
                .is_some_and(|util| is_qualified_inherits(callee, util))
                || inherits_name
                    .as_deref()
                    .is_some_and(|name| identifier_name(callee) == Some(name))
        });

        let pattern = typed(
            "ExpressionStatement",
            [(
                "expression",
                typed(
                    "CallExpression",
                    [
                        ("callee", callee),
                        (
                            "arguments",
                            seq([
                                typed("Identifier", [("name", capture("className"))]),
                                capture("superClass"),
                            ]),
                        ),
                    ],
                ),
            )],
        );
        match_pattern(&pattern, node)
    }

    pub fn process(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<Option<Detection<'a>>, PatternError> {
        let Some(m) = self.match_node(node)? else {
            return Ok(None);
        };
        let (Some(class_name), Some(super_class)) = (m.str("className"), m.get("superClass"))
        else {
            return Ok(None);
        };
        Ok(Some(Detection {
            kind: DetectorKind::UtilInherits,
            class_name: class_name.to_string(),
            super_class,
            related_expressions: vec![RelatedExpression { node, parent }],
        }))
    }
}

impl<'a> Detector<'a> for UtilInheritsMatcher<'a> {
    fn kind(&self) -> DetectorKind {
        DetectorKind::UtilInherits
    }

    fn discover(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<bool, PatternError> {
        self.discover_identifiers(node, parent)
    }

    fn process(
        &mut self,
        node: &'a Value,
        parent: Option<&'a Value>,
    ) -> Result<Option<Detection<'a>>, PatternError> {
        UtilInheritsMatcher::process(self, node, parent)
    }
}

/// `<util>.inherits`
fn is_qualified_inherits(callee: &Value, util: &str) -> bool {
    is_type(callee, "MemberExpression")
        && callee.get("object").and_then(identifier_name) == Some(util)
        && callee.get("property").and_then(identifier_name) == Some("inherits")
}

/// Local identifier bound by `{ inherits }` or `{ inherits: local }`.
fn destructured_inherits(pattern: &Value) -> Option<&Value> {
    pattern
        .get("properties")?
        .as_array()?
        .iter()
        .filter(|prop| is_type(prop, "Property"))
        .filter(|prop| prop.get("computed").and_then(Value::as_bool) != Some(true))
        .find(|prop| prop.get("key").and_then(identifier_name) == Some("inherits"))
        .and_then(|prop| prop.get("value"))
        .filter(|value| is_type(value, "Identifier"))
}

/// Declarator initialized with `require("util")`.
fn direct_require_pattern() -> Pattern {
    node([("init", require_call("util"))])
}

/// Declarator initialized with `require("util").<member>`.
fn member_require_pattern() -> Pattern {
    node([("init", node([("object", require_call("util"))]))])
}

/// Declarator initialized with `<...>.inherits`.
fn inherits_member_pattern() -> Pattern {
    node([("init", node([("property", node([("name", lit("inherits"))]))]))])
}
