//! Small ESTree helpers shared by the detectors.

use serde_json::Value;

use crate::node_pattern::{is_match, pred, typed, Pattern, PatternError};

pub fn node_type(node: &Value) -> Option<&str> {
    node.get("type").and_then(Value::as_str)
}

pub fn is_type(node: &Value, ty: &str) -> bool {
    node_type(node) == Some(ty)
}

/// Name of an `Identifier` node.
pub fn identifier_name(node: &Value) -> Option<&str> {
    if !is_type(node, "Identifier") {
        return None;
    }
    node.get("name").and_then(Value::as_str)
}

/// Pattern for `require("<module>")` with exactly one string argument.
pub fn require_call(module: &str) -> Pattern {
    let module = module.to_string();
    typed(
        "CallExpression",
        [
            ("callee", typed("Identifier", [("name", "require".into())])),
            (
                "arguments",
                pred(move |args| {
                    args.as_array().is_some_and(|args| {
                        args.len() == 1
                            && args[0].get("value").and_then(Value::as_str) == Some(module.as_str())
                    })
                }),
            ),
        ],
    )
}

/// True for `require("...")` with a single string-literal argument.
pub fn is_any_require_call(node: &Value) -> bool {
    is_type(node, "CallExpression")
        && node.get("callee").and_then(identifier_name) == Some("require")
        && node
            .get("arguments")
            .and_then(Value::as_array)
            .is_some_and(|args| {
                args.len() == 1 && args[0].get("value").is_some_and(Value::is_string)
            })
}

/// True for `require("<module>")`.
pub fn is_require_call(node: &Value, module: &str) -> Result<bool, PatternError> {
    is_match(&require_call(module), node)
}

/// A `VariableDeclaration` where some declarator is initialized with a
/// `require(...)` call or a member access on one.
pub fn is_var_with_require_calls(node: &Value) -> bool {
    if !is_type(node, "VariableDeclaration") {
        return false;
    }
    let Some(declarations) = node.get("declarations").and_then(Value::as_array) else {
        return false;
    };
    declarations.iter().any(|dec| {
        let Some(init) = dec.get("init") else {
            return false;
        };
        is_any_require_call(init)
            || (is_type(init, "MemberExpression")
                && init.get("object").is_some_and(is_any_require_call))
    })
}
