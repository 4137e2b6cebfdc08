pub mod ast;
pub mod lexer;
pub mod parser;

use std::fmt;
use std::str::FromStr;

use tracing::trace;

use crate::error::JsonLibError;

pub use ast::{CmpOp, FilterExpr, Operand, Pattern, Query, QueryRoot, Segment};

/// A compiled path expression such as `$.store.book[?(@.price < 10)].title`.
///
/// Compiling validates the syntax once; the result never changes and can be
/// reused against any number of documents.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    source: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Compile a path expression.
    pub fn compile(input: &str) -> Result<Self, JsonLibError> {
        let mut lex = lexer::Lexer::new(input);
        lex.tokenize()?;
        let segments = parser::Parser::new(lex.tokens).parse()?;
        trace!(path = input, segments = segments.len(), "compiled path");
        Ok(JsonPath {
            source: input.trim().to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the path is made only of keys and indices, so it can
    /// address at most one node and can be created when missing.
    pub fn is_singular(&self) -> bool {
        self.segments.iter().all(Segment::is_singular)
    }

    /// True for `$` (or the empty path).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for JsonPath {
    type Err = JsonLibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JsonPath::compile(s)
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source.is_empty() {
            f.write_str("$")
        } else {
            f.write_str(&self.source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_identity() {
        let p = JsonPath::compile("$").unwrap();
        assert!(p.is_root());
        assert!(p.is_singular());
    }

    #[test]
    fn compile_nested_keys() {
        let p = JsonPath::compile("$.a.b.c").unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("a".into()),
                Segment::Key("b".into()),
                Segment::Key("c".into()),
            ]
        );
    }

    #[test]
    fn compile_complex_path() {
        let p = JsonPath::compile("$.spec.containers[0].image").unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("spec".into()),
                Segment::Key("containers".into()),
                Segment::Index(0),
                Segment::Key("image".into()),
            ]
        );
        assert!(p.is_singular());
    }

    #[test]
    fn wildcard_is_not_singular() {
        assert!(!JsonPath::compile("$.items[*].name").unwrap().is_singular());
        assert!(!JsonPath::compile("$..name").unwrap().is_singular());
        assert!(!JsonPath::compile("$[0,1]").unwrap().is_singular());
    }

    #[test]
    fn key_with_hyphens_and_underscores() {
        let p = JsonPath::compile("$.my-key.other_key").unwrap();
        assert_eq!(
            p.segments(),
            &[
                Segment::Key("my-key".into()),
                Segment::Key("other_key".into()),
            ]
        );
    }

    #[test]
    fn from_str_and_display() {
        let p: JsonPath = " $.a[0] ".parse().unwrap();
        assert_eq!(p.to_string(), "$.a[0]");
        assert_eq!(JsonPath::compile("").unwrap().to_string(), "$");
    }

    #[test]
    fn malformed_paths_error() {
        assert!(JsonPath::compile("$.a[").is_err());
        assert!(JsonPath::compile("$[?(@.a ==)]").is_err());
        assert!(JsonPath::compile("$['a'").is_err());
        assert!(JsonPath::compile("$ $").is_err());
    }
}
