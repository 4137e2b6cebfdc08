use crate::error::JsonLibError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Int(i64),
    Float(f64),
    String(String),

    /// Bare member name after `.` or `..`, or a word inside a filter
    Name(String),

    // Roots
    Root,    // $
    Current, // @

    Dot,      // .
    DotDot,   // ..
    Star,     // *
    Comma,    // ,
    Colon,    // :
    Question, // ?

    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]

    // Comparison
    Eq,    // ==
    Ne,    // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=
    Match, // =~

    // Logic
    Not, // !
    And, // &&
    Or,  // ||

    Eof,
}

/// Characters that end a bare member name.
fn ends_name(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '.' | '[' | ']' | '(' | ')' | ',' | ':' | '?' | '=' | '!' | '<' | '>' | '&' | '|'
                | '\'' | '"'
        )
}

#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    /// Tokens paired with the character offset they start at.
    pub tokens: Vec<(Token, usize)>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    pub fn tokenize(&mut self) -> Result<&[(Token, usize)], JsonLibError> {
        while self.pos < self.input.len() {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                break;
            }

            let start = self.pos;
            let ch = self.input[self.pos];
            match ch {
                '.' => {
                    if self.peek_next() == Some('.') {
                        self.pos += 2;
                        self.push(Token::DotDot, start);
                    } else {
                        self.pos += 1;
                        self.push(Token::Dot, start);
                    }
                    // A member name may follow directly; it is read loosely so
                    // keys like `my-key` or `0abc` survive.
                    if self.peek_current().is_some_and(|c| !ends_name(c) && c != '*') {
                        self.read_name();
                    }
                }
                '$' => { self.pos += 1; self.push(Token::Root, start); }
                '@' => { self.pos += 1; self.push(Token::Current, start); }
                '*' => { self.pos += 1; self.push(Token::Star, start); }
                ',' => { self.pos += 1; self.push(Token::Comma, start); }
                ':' => { self.pos += 1; self.push(Token::Colon, start); }
                '?' => { self.pos += 1; self.push(Token::Question, start); }
                '(' => { self.pos += 1; self.push(Token::LParen, start); }
                ')' => { self.pos += 1; self.push(Token::RParen, start); }
                '[' => { self.pos += 1; self.push(Token::LBracket, start); }
                ']' => { self.pos += 1; self.push(Token::RBracket, start); }
                '=' => {
                    self.pos += 1;
                    match self.peek_current() {
                        Some('=') => {
                            self.pos += 1;
                            self.push(Token::Eq, start);
                        }
                        Some('~') => {
                            self.pos += 1;
                            self.push(Token::Match, start);
                        }
                        _ => {
                            return Err(JsonLibError::SyntaxError {
                                position: start,
                                message: "unexpected '=', did you mean '=='?".into(),
                            });
                        }
                    }
                }
                '!' => {
                    self.pos += 1;
                    if self.peek_current() == Some('=') {
                        self.pos += 1;
                        self.push(Token::Ne, start);
                    } else {
                        self.push(Token::Not, start);
                    }
                }
                '<' => {
                    self.pos += 1;
                    if self.peek_current() == Some('=') {
                        self.pos += 1;
                        self.push(Token::Le, start);
                    } else {
                        self.push(Token::Lt, start);
                    }
                }
                '>' => {
                    self.pos += 1;
                    if self.peek_current() == Some('=') {
                        self.pos += 1;
                        self.push(Token::Ge, start);
                    } else {
                        self.push(Token::Gt, start);
                    }
                }
                '&' => {
                    if self.peek_next() != Some('&') {
                        return Err(JsonLibError::SyntaxError {
                            position: start,
                            message: "unexpected '&', did you mean '&&'?".into(),
                        });
                    }
                    self.pos += 2;
                    self.push(Token::And, start);
                }
                '|' => {
                    if self.peek_next() != Some('|') {
                        return Err(JsonLibError::SyntaxError {
                            position: start,
                            message: "unexpected '|', did you mean '||'?".into(),
                        });
                    }
                    self.pos += 2;
                    self.push(Token::Or, start);
                }
                '\'' | '"' => {
                    self.read_string(ch)?;
                }
                '-' => {
                    if !self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                        return Err(JsonLibError::SyntaxError {
                            position: start,
                            message: "expected digit after '-'".into(),
                        });
                    }
                    self.read_number()?;
                }
                c if c.is_ascii_digit() => {
                    self.read_number()?;
                }
                c if c.is_alphabetic() || c == '_' => {
                    self.read_name();
                }
                _ => {
                    return Err(JsonLibError::SyntaxError {
                        position: start,
                        message: format!("unexpected character: '{ch}'"),
                    });
                }
            }
        }

        self.push(Token::Eof, self.input.len());
        Ok(&self.tokens)
    }

    fn push(&mut self, token: Token, position: usize) {
        self.tokens.push((token, position));
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.input.len() && self.input[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek_current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.input.get(self.pos + 1).copied()
    }

    fn read_name(&mut self) {
        let start = self.pos;
        while self.pos < self.input.len() && !ends_name(self.input[self.pos]) {
            self.pos += 1;
        }
        let name: String = self.input[start..self.pos].iter().collect();
        self.push(Token::Name(name), start);
    }

    fn read_number(&mut self) -> Result<(), JsonLibError> {
        let start = self.pos;
        let mut is_float = false;
        if self.input[self.pos] == '-' {
            self.pos += 1;
        }
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.peek_current() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.pos += 1;
            while self.pos < self.input.len() && self.input[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        // Scientific notation
        if matches!(self.peek_current(), Some('e' | 'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek_current(), Some('+' | '-')) {
                self.pos += 1;
            }
            while self.pos < self.input.len() && self.input[self.pos].is_ascii_digit() {
                self.pos += 1;
            }
        }
        let num_str: String = self.input[start..self.pos].iter().collect();
        let invalid = || JsonLibError::SyntaxError {
            position: start,
            message: format!("invalid number: {num_str}"),
        };
        let token = if is_float {
            Token::Float(num_str.parse().map_err(|_| invalid())?)
        } else {
            Token::Int(num_str.parse().map_err(|_| invalid())?)
        };
        self.push(token, start);
        Ok(())
    }

    fn read_string(&mut self, quote: char) -> Result<(), JsonLibError> {
        let start = self.pos;
        self.pos += 1; // skip opening quote
        let mut s = String::new();
        while self.pos < self.input.len() {
            match self.input[self.pos] {
                c if c == quote => {
                    self.pos += 1;
                    self.push(Token::String(s), start);
                    return Ok(());
                }
                '\\' => {
                    self.pos += 1;
                    let Some(escaped) = self.peek_current() else {
                        break;
                    };
                    match escaped {
                        'n' => s.push('\n'),
                        'r' => s.push('\r'),
                        't' => s.push('\t'),
                        'b' => s.push('\u{8}'),
                        'f' => s.push('\u{c}'),
                        '\\' | '/' | '\'' | '"' => s.push(escaped),
                        'u' => {
                            s.push(self.read_unicode_escape()?);
                            continue;
                        }
                        other => {
                            return Err(JsonLibError::SyntaxError {
                                position: self.pos,
                                message: format!("invalid escape: \\{other}"),
                            });
                        }
                    }
                    self.pos += 1;
                }
                c => {
                    s.push(c);
                    self.pos += 1;
                }
            }
        }
        Err(JsonLibError::SyntaxError {
            position: start,
            message: "unterminated string".into(),
        })
    }

    /// Reads `uXXXX` (cursor on the `u`), leaving the cursor after the digits.
    fn read_unicode_escape(&mut self) -> Result<char, JsonLibError> {
        let start = self.pos;
        self.pos += 1;
        let end = self.pos + 4;
        if end > self.input.len() {
            return Err(JsonLibError::SyntaxError {
                position: start,
                message: "truncated \\u escape".into(),
            });
        }
        let hex: String = self.input[self.pos..end].iter().collect();
        self.pos = end;
        u32::from_str_radix(&hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| JsonLibError::SyntaxError {
                position: start,
                message: format!("invalid \\u escape: {hex}"),
            })
    }
}
