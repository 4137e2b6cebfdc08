use std::fmt;

use regex::Regex;
use serde_json::Value;

/// A single step of a compiled path expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Object member: `.name`, `['name']`
    Key(String),
    /// Array element: `[0]`, `[-1]`
    Index(i64),
    /// Every child: `.*`, `[*]`
    Wildcard,
    /// Array slice: `[start:end:step]`
    Slice {
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    },
    /// Children matching a predicate: `[?(@.price < 10)]`
    Filter(FilterExpr),
    /// Bracketed selector list: `[0,2]`, `['a','b']`
    Union(Vec<Segment>),
    /// Recursive descent: `..name`, `..*`
    Descendant(Box<Segment>),
}

impl Segment {
    /// True for segments that address at most one child.
    pub fn is_singular(&self) -> bool {
        matches!(self, Segment::Key(_) | Segment::Index(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Or(Box<FilterExpr>, Box<FilterExpr>),
    And(Box<FilterExpr>, Box<FilterExpr>),
    Not(Box<FilterExpr>),
    /// A bare query is true when it selects anything.
    Exists(Query),
    Compare(Operand, CmpOp, Operand),
    Matches(Operand, Pattern),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Query(Query),
}

/// A path embedded in a filter, rooted at `@` or `$`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub root: QueryRoot,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRoot {
    /// `@`
    Current,
    /// `$`
    Document,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        };
        f.write_str(s)
    }
}

/// Compiled `=~` pattern. Compared by source text.
#[derive(Debug, Clone)]
pub struct Pattern(pub Regex);

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_str() == other.0.as_str()
    }
}
