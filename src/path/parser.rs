use regex::Regex;
use serde_json::Value;

use crate::error::JsonLibError;

use super::ast::*;
use super::lexer::Token;

pub struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<(Token, usize)>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Parse a whole path. The leading `$` is optional.
    pub fn parse(&mut self) -> Result<Vec<Segment>, JsonLibError> {
        let mut segments = Vec::new();
        match self.current().clone() {
            Token::Root => {
                self.advance();
            }
            // `a.b` is shorthand for `$.a.b`
            Token::Name(name) => {
                self.advance();
                segments.push(Segment::Key(name));
            }
            _ => {}
        }
        segments.extend(self.parse_segments()?);
        self.finish(segments)
    }

    fn finish(&self, segments: Vec<Segment>) -> Result<Vec<Segment>, JsonLibError> {
        if !self.at_eof() {
            return Err(self.error(format!("unexpected token: {:?}", self.current())));
        }
        Ok(segments)
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::Eof, |(t, _)| t)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |(_, p)| *p)
    }

    fn at_eof(&self) -> bool {
        matches!(self.current(), Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self
            .tokens
            .get(self.pos)
            .map_or(Token::Eof, |(t, _)| t.clone());
        self.pos += 1;
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), JsonLibError> {
        if self.current() == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(format!(
                "expected {:?}, got {:?}",
                expected,
                self.current()
            )))
        }
    }

    fn error(&self, message: String) -> JsonLibError {
        JsonLibError::SyntaxError {
            position: self.position(),
            message,
        }
    }

    // ── Segments ───────────────────────────────────────────────────

    /// segment*: stops at anything that cannot continue a path, which lets
    /// filter queries end at a comparison operator.
    fn parse_segments(&mut self) -> Result<Vec<Segment>, JsonLibError> {
        let mut segments = Vec::new();
        loop {
            match self.current() {
                Token::Dot => {
                    self.advance();
                    segments.push(self.parse_dot_member()?);
                }
                Token::DotDot => {
                    self.advance();
                    let inner = if matches!(self.current(), Token::LBracket) {
                        self.parse_bracket()?
                    } else {
                        self.parse_dot_member()?
                    };
                    segments.push(Segment::Descendant(Box::new(inner)));
                }
                Token::LBracket => segments.push(self.parse_bracket()?),
                _ => return Ok(segments),
            }
        }
    }

    /// What follows `.` or `..`: a name or `*`.
    fn parse_dot_member(&mut self) -> Result<Segment, JsonLibError> {
        match self.advance() {
            Token::Name(name) => Ok(Segment::Key(name)),
            Token::Star => Ok(Segment::Wildcard),
            other => {
                self.pos -= 1;
                Err(self.error(format!("expected member name after '.', got {other:?}")))
            }
        }
    }

    /// `[` selector (`,` selector)* `]`
    fn parse_bracket(&mut self) -> Result<Segment, JsonLibError> {
        self.expect(&Token::LBracket)?;
        let mut selectors = vec![self.parse_selector()?];
        while matches!(self.current(), Token::Comma) {
            self.advance();
            selectors.push(self.parse_selector()?);
        }
        self.expect(&Token::RBracket)?;
        if selectors.len() == 1 {
            Ok(selectors.remove(0))
        } else {
            Ok(Segment::Union(selectors))
        }
    }

    fn parse_selector(&mut self) -> Result<Segment, JsonLibError> {
        match self.current().clone() {
            Token::String(s) => {
                self.advance();
                Ok(Segment::Key(s))
            }
            Token::Star => {
                self.advance();
                Ok(Segment::Wildcard)
            }
            Token::Question => {
                self.advance();
                Ok(Segment::Filter(self.parse_or()?))
            }
            Token::Int(_) | Token::Colon => self.parse_index_or_slice(),
            other => Err(self.error(format!("unexpected token in brackets: {other:?}"))),
        }
    }

    /// `int` or `int? : int? (: int?)?`
    fn parse_index_or_slice(&mut self) -> Result<Segment, JsonLibError> {
        let start = self.parse_opt_int();
        if !matches!(self.current(), Token::Colon) {
            return match start {
                Some(i) => Ok(Segment::Index(i)),
                None => Err(self.error("expected index".into())),
            };
        }
        self.advance(); // ':'
        let end = self.parse_opt_int();
        let step = if matches!(self.current(), Token::Colon) {
            self.advance();
            self.parse_opt_int()
        } else {
            None
        };
        Ok(Segment::Slice { start, end, step })
    }

    fn parse_opt_int(&mut self) -> Option<i64> {
        let Token::Int(i) = *self.current() else {
            return None;
        };
        self.advance();
        Some(i)
    }

    // ── Filter expressions (lowest to highest precedence) ──────────

    fn parse_or(&mut self) -> Result<FilterExpr, JsonLibError> {
        let mut expr = self.parse_and()?;
        while matches!(self.current(), Token::Or) {
            self.advance();
            let right = self.parse_and()?;
            expr = FilterExpr::Or(Box::new(expr), Box::new(right));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<FilterExpr, JsonLibError> {
        let mut expr = self.parse_unary()?;
        while matches!(self.current(), Token::And) {
            self.advance();
            let right = self.parse_unary()?;
            expr = FilterExpr::And(Box::new(expr), Box::new(right));
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<FilterExpr, JsonLibError> {
        match self.current() {
            Token::Not => {
                self.advance();
                Ok(FilterExpr::Not(Box::new(self.parse_unary()?)))
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            _ => self.parse_comparison(),
        }
    }

    fn parse_comparison(&mut self) -> Result<FilterExpr, JsonLibError> {
        let left = self.parse_operand()?;
        let op = match self.current() {
            Token::Eq => CmpOp::Eq,
            Token::Ne => CmpOp::Ne,
            Token::Lt => CmpOp::Lt,
            Token::Le => CmpOp::Le,
            Token::Gt => CmpOp::Gt,
            Token::Ge => CmpOp::Ge,
            Token::Match => {
                self.advance();
                return self.parse_match(left);
            }
            _ => {
                return match left {
                    Operand::Query(q) => Ok(FilterExpr::Exists(q)),
                    Operand::Literal(v) => {
                        Err(self.error(format!("literal {v} is not a filter condition")))
                    }
                };
            }
        };
        self.advance();
        let right = self.parse_operand()?;
        Ok(FilterExpr::Compare(left, op, right))
    }

    fn parse_match(&mut self, left: Operand) -> Result<FilterExpr, JsonLibError> {
        let Token::String(pattern) = self.current().clone() else {
            return Err(self.error("expected string pattern after '=~'".into()));
        };
        self.advance();
        let regex = Regex::new(&pattern).map_err(|e| JsonLibError::InvalidRegex {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        Ok(FilterExpr::Matches(left, Pattern(regex)))
    }

    fn parse_operand(&mut self) -> Result<Operand, JsonLibError> {
        let literal = match self.current().clone() {
            Token::Current | Token::Root => {
                let root = if matches!(self.advance(), Token::Current) {
                    QueryRoot::Current
                } else {
                    QueryRoot::Document
                };
                let segments = self.parse_segments()?;
                return Ok(Operand::Query(Query { root, segments }));
            }
            Token::Int(i) => Value::from(i),
            Token::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .ok_or_else(|| self.error(format!("number out of range: {f}")))?,
            Token::String(s) => Value::String(s),
            Token::Name(word) => match word.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                _ => return Err(self.error(format!("unknown word in filter: {word}"))),
            },
            other => return Err(self.error(format!("expected operand, got {other:?}"))),
        };
        self.advance();
        Ok(Operand::Literal(literal))
    }
}
