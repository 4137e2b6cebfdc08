use std::cmp::Ordering;

use serde_json::Value;

use crate::path::{CmpOp, FilterExpr, Operand, Query, QueryRoot};

use super::select;

/// Evaluate a filter predicate with `@` bound to `current`.
pub fn test(expr: &FilterExpr, current: &Value, root: &Value) -> bool {
    match expr {
        FilterExpr::Or(a, b) => test(a, current, root) || test(b, current, root),
        FilterExpr::And(a, b) => test(a, current, root) && test(b, current, root),
        FilterExpr::Not(inner) => !test(inner, current, root),
        FilterExpr::Exists(query) => !run_query(query, current, root).is_empty(),
        FilterExpr::Compare(left, op, right) => {
            let left = resolve(left, current, root);
            let right = resolve(right, current, root);
            compare(*op, left, right)
        }
        FilterExpr::Matches(left, pattern) => match resolve(left, current, root) {
            Some(Value::String(s)) => pattern.0.is_match(s),
            _ => false,
        },
    }
}

fn run_query<'a>(query: &Query, current: &'a Value, root: &'a Value) -> Vec<&'a Value> {
    let start = match query.root {
        QueryRoot::Current => current,
        QueryRoot::Document => root,
    };
    select(&query.segments, start, root)
        .into_iter()
        .map(|m| m.value)
        .collect()
}

/// An operand's value, or `None` ("nothing") for a query without matches.
fn resolve<'a>(operand: &'a Operand, current: &'a Value, root: &'a Value) -> Option<&'a Value> {
    match operand {
        Operand::Literal(v) => Some(v),
        Operand::Query(q) => run_query(q, current, root).into_iter().next(),
    }
}

fn compare(op: CmpOp, left: Option<&Value>, right: Option<&Value>) -> bool {
    match op {
        CmpOp::Eq => equal_operands(left, right),
        CmpOp::Ne => !equal_operands(left, right),
        CmpOp::Lt => order(left, right) == Some(Ordering::Less),
        CmpOp::Le => matches!(order(left, right), Some(Ordering::Less | Ordering::Equal)),
        CmpOp::Gt => order(left, right) == Some(Ordering::Greater),
        CmpOp::Ge => matches!(order(left, right), Some(Ordering::Greater | Ordering::Equal)),
    }
}

fn equal_operands(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(a), Some(b)) => values_equal(a, b),
        _ => false,
    }
}

/// Structural equality where numbers compare by value (`1 == 1.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(i), Some(j)) => i == j,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| values_equal(v, w)))
        }
        _ => a == b,
    }
}

/// Ordering is only defined between two numbers or two strings.
fn order(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    match (left?, right?) {
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(i), Some(j)) = (a.as_i64(), b.as_i64()) {
                return Some(i.cmp(&j));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::JsonPath;
    use serde_json::json;

    fn predicate(path: &str) -> FilterExpr {
        match JsonPath::compile(path).unwrap().segments() {
            [crate::path::Segment::Filter(f)] => f.clone(),
            other => panic!("expected single filter, got {other:?}"),
        }
    }

    fn check(path: &str, current: Value) -> bool {
        test(&predicate(path), &current, &json!({"limit": 5}))
    }

    #[test]
    fn existence() {
        assert!(check("$[?(@.a)]", json!({"a": null})));
        assert!(!check("$[?(@.a)]", json!({"b": 1})));
        assert!(!check("$[?(@.a)]", json!(3)));
    }

    #[test]
    fn numeric_comparisons() {
        assert!(check("$[?(@.n < 10)]", json!({"n": 3})));
        assert!(check("$[?(@.n <= 3)]", json!({"n": 3})));
        assert!(check("$[?(@.n >= 2.5)]", json!({"n": 3})));
        assert!(!check("$[?(@.n > 3)]", json!({"n": 3})));
        assert!(check("$[?(@.n == 3.0)]", json!({"n": 3})));
    }

    #[test]
    fn string_comparisons() {
        assert!(check("$[?(@.s == 'abc')]", json!({"s": "abc"})));
        assert!(check("$[?(@.s < 'b')]", json!({"s": "abc"})));
        assert!(!check("$[?(@.s < 1)]", json!({"s": "abc"})));
    }

    #[test]
    fn nothing_semantics() {
        assert!(!check("$[?(@.missing == 1)]", json!({})));
        assert!(check("$[?(@.missing != 1)]", json!({})));
        assert!(check("$[?(@.x == @.y)]", json!({})));
        assert!(!check("$[?(@.missing < 1)]", json!({})));
    }

    #[test]
    fn mixed_types_never_order() {
        assert!(!check("$[?(@.v > 0)]", json!({"v": true})));
        assert!(!check("$[?(@.v <= null)]", json!({"v": null})));
        assert!(check("$[?(@.v == null)]", json!({"v": null})));
    }

    #[test]
    fn document_root_operand() {
        assert!(check("$[?(@.n < $.limit)]", json!({"n": 4})));
        assert!(!check("$[?(@.n < $.limit)]", json!({"n": 6})));
    }

    #[test]
    fn logic_operators() {
        let v = json!({"a": 1, "b": 2});
        assert!(check("$[?(@.a == 1 && @.b == 2)]", v.clone()));
        assert!(check("$[?(@.a == 9 || @.b == 2)]", v.clone()));
        assert!(!check("$[?(!(@.a == 1))]", v.clone()));
        assert!(check("$[?(!@.c)]", v));
    }

    #[test]
    fn regex_match() {
        assert!(check("$[?(@.name =~ '^J.*n$')]", json!({"name": "John"})));
        assert!(!check("$[?(@.name =~ '^J')]", json!({"name": "Mary"})));
        assert!(!check("$[?(@.name =~ '.*')]", json!({"name": 1})));
    }

    #[test]
    fn deep_equality() {
        assert!(values_equal(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
        assert!(!values_equal(&json!([1, 2]), &json!([2, 1])));
        assert!(values_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
    }
}
