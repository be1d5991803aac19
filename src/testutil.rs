//! ESTree node builders for tests.
//!
//! The shapes follow what acorn emits, minus location info.

use serde_json::{json, Value};

pub fn ident(name: &str) -> Value {
    json!({"type": "Identifier", "name": name})
}

pub fn string_lit(value: &str) -> Value {
    json!({"type": "Literal", "value": value, "raw": format!("'{value}'")})
}

pub fn number_lit(value: f64) -> Value {
    json!({"type": "Literal", "value": value, "raw": value.to_string()})
}

/// Non-computed `object.property`.
pub fn member(object: Value, property: &str) -> Value {
    json!({
        "type": "MemberExpression",
        "object": object,
        "property": ident(property),
        "computed": false,
    })
}

/// `object.a.b.c` from a dotted path.
pub fn member_path(path: &str) -> Value {
    let mut parts = path.split('.');
    let mut node = ident(parts.next().unwrap_or_default());
    for part in parts {
        node = member(node, part);
    }
    node
}

pub fn call(callee: Value, arguments: Vec<Value>) -> Value {
    json!({
        "type": "CallExpression",
        "callee": callee,
        "arguments": arguments,
        "optional": false,
    })
}

pub fn new_expr(callee: Value, arguments: Vec<Value>) -> Value {
    json!({"type": "NewExpression", "callee": callee, "arguments": arguments})
}

pub fn require(module: &str) -> Value {
    call(ident("require"), vec![string_lit(module)])
}

pub fn assign(left: Value, right: Value) -> Value {
    json!({
        "type": "AssignmentExpression",
        "operator": "=",
        "left": left,
        "right": right,
    })
}

pub fn expr_stmt(expression: Value) -> Value {
    json!({"type": "ExpressionStatement", "expression": expression})
}

pub fn declarator(id: Value, init: Value) -> Value {
    json!({"type": "VariableDeclarator", "id": id, "init": init})
}

pub fn declarator_uninit(id: Value) -> Value {
    json!({"type": "VariableDeclarator", "id": id, "init": null})
}

pub fn var_decl(kind: &str, declarations: Vec<Value>) -> Value {
    json!({"type": "VariableDeclaration", "declarations": declarations, "kind": kind})
}

/// `{ key: value, ... }` destructuring pattern with identifier keys/values.
pub fn object_pattern(props: &[(&str, &str)]) -> Value {
    let properties: Vec<Value> = props
        .iter()
        .map(|(key, value)| {
            json!({
                "type": "Property",
                "key": ident(key),
                "value": ident(value),
                "kind": "init",
                "computed": false,
                "method": false,
                "shorthand": key == value,
            })
        })
        .collect();
    json!({"type": "ObjectPattern", "properties": properties})
}

pub fn function_decl(name: &str, body: Vec<Value>) -> Value {
    json!({
        "type": "FunctionDeclaration",
        "id": ident(name),
        "params": [],
        "body": {"type": "BlockStatement", "body": body},
        "generator": false,
        "async": false,
    })
}

pub fn program(body: Vec<Value>) -> Value {
    json!({"type": "Program", "body": body, "sourceType": "script"})
}

/// `A.prototype = new B();`
pub fn new_superclass_stmt(class_name: &str, super_class: &str) -> Value {
    expr_stmt(assign(
        member_path(&format!("{class_name}.prototype")),
        new_expr(ident(super_class), vec![]),
    ))
}

/// `A.prototype = Object.create(B.prototype);`
pub fn object_create_stmt(class_name: &str, super_class: &str) -> Value {
    expr_stmt(assign(
        member_path(&format!("{class_name}.prototype")),
        call(
            member_path("Object.create"),
            vec![member_path(&format!("{super_class}.prototype"))],
        ),
    ))
}

/// `A.prototype.constructor = C;`
pub fn constructor_stmt(class_name: &str, constructor: &str) -> Value {
    expr_stmt(assign(
        member_path(&format!("{class_name}.prototype.constructor")),
        ident(constructor),
    ))
}
