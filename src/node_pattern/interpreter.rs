//! Pattern interpreter: runtime evaluation of structural patterns against
//! ESTree nodes.
//!
//! Matching is a single top-down comparison with no backtracking. The first
//! failing field ends the match. Alternation is left to callers, which try
//! several independent patterns in turn.
//!
//! The result distinguishes three outcomes:
//!
//! - `Ok(Some(captures))` if the pattern matched (captures may be empty)
//! - `Ok(None)` if the pattern does not apply to this node
//! - `Err(PatternError)` if the pattern itself is malformed

use std::fmt;

use serde_json::Value;

use super::captures::Captures;
use super::pattern::Pattern;

/// A bug in a pattern definition, as opposed to a node that fails to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The same capture name was bound twice in one match.
    DuplicateCapture { name: String },
    /// A sequence pattern was applied to a value that is not an array.
    NotASequence { path: String },
    /// A literal pattern holds an array or object.
    LiteralNotScalar { path: String },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::DuplicateCapture { name } => {
                write!(f, "capture `{name}` is bound more than once")
            }
            PatternError::NotASequence { path } => {
                write!(
                    f,
                    "sequence pattern applied to non-sequence value at `{}`",
                    display_path(path)
                )
            }
            PatternError::LiteralNotScalar { path } => {
                write!(f, "literal pattern at `{}` is not a scalar", display_path(path))
            }
        }
    }
}

impl std::error::Error for PatternError {}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

pub type MatchResult<'a> = Result<Option<Captures<'a>>, PatternError>;

/// Evaluate `pattern` against `node`.
pub fn match_pattern<'a>(pattern: &Pattern, node: &'a Value) -> MatchResult<'a> {
    let mut captures = Captures::new();
    if matches_value(pattern, node, "", &mut captures)? {
        Ok(Some(captures))
    } else {
        Ok(None)
    }
}

/// Like `match_pattern`, for callers that only need a yes/no answer.
pub fn is_match(pattern: &Pattern, node: &Value) -> Result<bool, PatternError> {
    Ok(match_pattern(pattern, node)?.is_some())
}

/// Match a pattern against a value, binding captures into `captures`.
///
/// Captures bound before a later sibling fails are left in `captures`; the
/// top-level caller discards the whole set on failure.
fn matches_value<'a>(
    pattern: &Pattern,
    value: &'a Value,
    path: &str,
    captures: &mut Captures<'a>,
) -> Result<bool, PatternError> {
    match pattern {
        Pattern::Any => Ok(true),

        Pattern::Predicate(f) => Ok(f(value)),

        Pattern::Capture { name, inner } => {
            if !matches_value(inner, value, path, captures)? {
                return Ok(false);
            }
            captures.bind(name, value)?;
            Ok(true)
        }

        Pattern::Sequence(items) => {
            let Some(elements) = value.as_array() else {
                return Err(PatternError::NotASequence {
                    path: path.to_string(),
                });
            };
            if elements.len() != items.len() {
                return Ok(false);
            }
            for (i, (item, element)) in items.iter().zip(elements).enumerate() {
                let child_path = format!("{path}[{i}]");
                if !matches_value(item, element, &child_path, captures)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }

        Pattern::Node(fields) => {
            let Some(object) = value.as_object() else {
                return Ok(false);
            };
            for (name, field_pattern) in fields {
                let Some(field_value) = object.get(name) else {
                    return Ok(false);
                };
                let child_path = if path.is_empty() {
                    name.clone()
                } else {
                    format!("{path}.{name}")
                };
                if !matches_value(field_pattern, field_value, &child_path, captures)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }

        Pattern::Literal(expected) => {
            if expected.is_array() || expected.is_object() {
                return Err(PatternError::LiteralNotScalar {
                    path: path.to_string(),
                });
            }
            Ok(expected == value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_pattern::pattern::{
        any, capture, capture_as, lit, node, of_type, pred, seq, typed,
    };
    use serde_json::json;

    fn dog_inherits_call() -> Value {
        json!({
            "type": "CallExpression",
            "callee": {
                "type": "MemberExpression",
                "object": {"type": "Identifier", "name": "util"},
                "property": {"type": "Identifier", "name": "inherits"},
                "computed": false
            },
            "arguments": [
                {"type": "Identifier", "name": "Dog"},
                {"type": "Identifier", "name": "Animal"}
            ]
        })
    }

    #[test]
    fn test_literal_match() {
        let v = json!("prototype");
        assert!(is_match(&lit("prototype"), &v).unwrap());
        assert!(!is_match(&lit("constructor"), &v).unwrap());
    }

    #[test]
    fn test_literal_is_strict() {
        assert!(!is_match(&lit("1"), &json!(1)).unwrap());
        assert!(!is_match(&lit(false), &json!(null)).unwrap());
        assert!(is_match(&lit(Value::Null), &json!(null)).unwrap());
    }

    #[test]
    fn test_literal_against_node_does_not_match() {
        let v = json!({"type": "Identifier", "name": "x"});
        assert!(!is_match(&lit("x"), &v).unwrap());
    }

    #[test]
    fn test_structural_partial_fields() {
        let v = json!({"type": "Identifier", "name": "anything", "range": [0, 8]});
        assert!(is_match(&of_type("Identifier"), &v).unwrap());
    }

    #[test]
    fn test_structural_missing_field_fails() {
        let v = json!({"type": "Identifier"});
        let p = typed("Identifier", [("name", any())]);
        assert_eq!(match_pattern(&p, &v).unwrap(), None);
    }

    #[test]
    fn test_structural_against_scalar_fails() {
        let p = node([("name", lit("x"))]);
        assert!(!is_match(&p, &json!("x")).unwrap());
        assert!(!is_match(&p, &json!(null)).unwrap());
    }

    #[test]
    fn test_zero_captures_is_distinct_from_no_match() {
        let v = json!({"type": "ThisExpression"});
        let hit = match_pattern(&of_type("ThisExpression"), &v).unwrap();
        assert_eq!(hit.map(|c| c.len()), Some(0));
        let miss = match_pattern(&of_type("Super"), &v).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_nested_captures() {
        let call = dog_inherits_call();
        let p = typed(
            "CallExpression",
            [
                (
                    "callee",
                    typed(
                        "MemberExpression",
                        [
                            ("object", typed("Identifier", [("name", capture("module"))])),
                            ("property", typed("Identifier", [("name", lit("inherits"))])),
                        ],
                    ),
                ),
                (
                    "arguments",
                    seq([
                        typed("Identifier", [("name", capture("className"))]),
                        capture("superClass"),
                    ]),
                ),
            ],
        );
        let caps = match_pattern(&p, &call).unwrap().unwrap();
        assert_eq!(caps.len(), 3);
        assert_eq!(caps.str("module"), Some("util"));
        assert_eq!(caps.str("className"), Some("Dog"));
        assert_eq!(caps.get("superClass"), Some(&call["arguments"][1]));
    }

    #[test]
    fn test_capture_with_inner_pattern() {
        let v = json!({"type": "Identifier", "name": "Animal"});
        let p = capture_as("superClass", of_type("Identifier"));
        let caps = match_pattern(&p, &v).unwrap().unwrap();
        assert_eq!(caps.get("superClass"), Some(&v));

        let p = capture_as("superClass", of_type("Literal"));
        assert!(match_pattern(&p, &v).unwrap().is_none());
    }

    #[test]
    fn test_sequence_exact_length() {
        let v = json!([1, 2]);
        assert!(is_match(&seq([any(), any()]), &v).unwrap());
        assert!(!is_match(&seq([any()]), &v).unwrap());
        assert!(!is_match(&seq([any(), any(), any()]), &v).unwrap());
        assert!(is_match(&seq([]), &json!([])).unwrap());
        assert!(!is_match(&seq([]), &v).unwrap());
    }

    #[test]
    fn test_sequence_elementwise() {
        let v = json!(["a", "b"]);
        assert!(is_match(&seq([lit("a"), lit("b")]), &v).unwrap());
        assert!(!is_match(&seq([lit("b"), lit("a")]), &v).unwrap());
    }

    #[test]
    fn test_sequence_on_non_array_is_error() {
        let v = json!({"arguments": {"type": "Identifier"}});
        let err = match_pattern(&node([("arguments", seq([any()]))]), &v).unwrap_err();
        assert_eq!(
            err,
            PatternError::NotASequence {
                path: "arguments".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "sequence pattern applied to non-sequence value at `arguments`"
        );
    }

    #[test]
    fn test_predicate() {
        let v = json!([{"type": "Literal", "value": "util"}]);
        let p = pred(|args| {
            args.as_array()
                .is_some_and(|a| a.len() == 1 && a[0]["value"] == "util")
        });
        assert!(is_match(&p, &v).unwrap());
        assert!(!is_match(&p, &json!([])).unwrap());
    }

    #[test]
    fn test_predicate_produces_no_captures() {
        let v = json!("x");
        let caps = match_pattern(&pred(|_| true), &v).unwrap().unwrap();
        assert!(caps.is_empty());
    }

    #[test]
    fn test_duplicate_capture_is_error() {
        let call = dog_inherits_call();
        let p = node([(
            "arguments",
            seq([
                typed("Identifier", [("name", capture("name"))]),
                typed("Identifier", [("name", capture("name"))]),
            ]),
        )]);
        let err = match_pattern(&p, &call).unwrap_err();
        assert_eq!(
            err,
            PatternError::DuplicateCapture {
                name: "name".to_string()
            }
        );
    }

    #[test]
    fn test_literal_not_scalar_is_error() {
        let v = json!({"value": [1]});
        let p = node([("value", lit(json!([1])))]);
        assert_eq!(
            match_pattern(&p, &v).unwrap_err().to_string(),
            "literal pattern at `value` is not a scalar"
        );
    }

    #[test]
    fn test_error_path_for_nested_sequence() {
        let v = json!({"arguments": [{"body": 3}]});
        let p = node([("arguments", seq([node([("body", seq([]))])]))]);
        assert_eq!(
            match_pattern(&p, &v).unwrap_err(),
            PatternError::NotASequence {
                path: "arguments[0].body".to_string()
            }
        );
    }

    #[test]
    fn test_short_circuit_before_error() {
        // `type` mismatch ends the match before the malformed field is reached.
        let v = json!({"type": "Identifier", "arguments": 1});
        let p = typed("CallExpression", [("arguments", seq([]))]);
        assert_eq!(match_pattern(&p, &v).unwrap(), None);
    }

    #[test]
    fn test_root_error_path_display() {
        let err = match_pattern(&seq([]), &json!(1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "sequence pattern applied to non-sequence value at `<root>`"
        );
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        fn scalar_strategy() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                prop::bool::ANY.prop_map(Value::from),
                prop::num::i64::ANY.prop_map(Value::from),
                "[a-zA-Z_]{0,8}".prop_map(Value::from),
            ]
        }

        fn identifier_strategy() -> impl Strategy<Value = Value> {
            ("[A-Za-z_][A-Za-z0-9_]{0,8}", prop::option::of(0u64..1000)).prop_map(
                |(name, start)| {
                    let mut v = json!({"type": "Identifier", "name": name});
                    if let Some(start) = start {
                        v["start"] = json!(start);
                    }
                    v
                },
            )
        }

        proptest! {
            #[test]
            fn sequence_never_matches_other_lengths(
                k in 0usize..6,
                elements in prop::collection::vec(scalar_strategy(), 0..6),
            ) {
                let p = seq((0..k).map(|_| Pattern::Any));
                let v = Value::Array(elements.clone());
                prop_assert_eq!(is_match(&p, &v).unwrap(), elements.len() == k);
            }

            #[test]
            fn type_only_pattern_matches_any_identifier(id in identifier_strategy()) {
                let p = of_type("Identifier");
                prop_assert!(is_match(&p, &id).unwrap());
            }

            #[test]
            fn matching_is_deterministic(
                id in identifier_strategy(),
                name in "[A-Za-z_]{1,4}",
            ) {
                let p = typed("Identifier", [("name", capture_as("n", lit(name.as_str())))]);
                let first = match_pattern(&p, &id).unwrap();
                let second = match_pattern(&p, &id).unwrap();
                prop_assert_eq!(first, second);
            }

            #[test]
            fn successful_match_binds_every_capture(
                args in prop::collection::vec(identifier_strategy(), 1..5),
            ) {
                let call = json!({"type": "CallExpression", "arguments": args});
                let items: Vec<Pattern> = (0..args.len())
                    .map(|i| typed("Identifier", [("name", capture(&format!("arg{i}")))]))
                    .collect();
                let p = typed("CallExpression", [("arguments", seq(items))]);
                let caps = match_pattern(&p, &call).unwrap().unwrap();
                let mut names = p.capture_names();
                names.sort_unstable();
                let bound: Vec<&str> = caps.iter().map(|(k, _)| k).collect();
                prop_assert_eq!(bound, names);
            }

            #[test]
            fn literal_equality_matches_json_equality(
                a in scalar_strategy(),
                b in scalar_strategy(),
            ) {
                prop_assert_eq!(is_match(&lit(a.clone()), &b).unwrap(), a == b);
            }
        }
    }
}
