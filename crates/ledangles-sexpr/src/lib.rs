//! A small S-expression reader for KiCad board files.
//!
//! Every node remembers the byte span it was parsed from, so callers can point
//! back at the originating line when a value inside the tree turns out to be
//! malformed.

use std::fmt;

use log::trace;

/// Byte range of a node within the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// 1-based line number of the span start within `source`.
    pub fn line(&self, source: &str) -> usize {
        line_number(source, self.start)
    }
}

/// 1-based line number of byte `offset` within `source`.
pub fn line_number(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}

/// The shape of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum SexprKind {
    /// Unquoted atom, e.g. `footprint` or `1.605281`
    Symbol(String),
    /// Quoted atom, e.g. `"Reference"`
    String(String),
    List(Vec<Sexpr>),
}

/// A parsed node plus its source span.
#[derive(Debug, Clone)]
pub struct Sexpr {
    pub kind: SexprKind,
    pub span: Span,
}

// Spans are bookkeeping; two trees are equal when their shapes are.
impl PartialEq for Sexpr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Sexpr {
    pub fn with_span(kind: SexprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Self::with_span(SexprKind::Symbol(s.into()), Span::default())
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::with_span(SexprKind::String(s.into()), Span::default())
    }

    pub fn list(items: Vec<Sexpr>) -> Self {
        Self::with_span(SexprKind::List(items), Span::default())
    }

    /// Text of a symbol or string atom.
    pub fn as_atom(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::Symbol(s) | SexprKind::String(s) => Some(s),
            SexprKind::List(_) => None,
        }
    }

    /// Text of an unquoted atom only.
    pub fn as_sym(&self) -> Option<&str> {
        match &self.kind {
            SexprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value of an atom. KiCad writes integers and floats alike as
    /// bare symbols, so both parse here.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_atom()?.parse().ok()
    }

    pub fn as_list(&self) -> Option<&[Sexpr]> {
        match &self.kind {
            SexprKind::List(items) => Some(items),
            _ => None,
        }
    }

    /// Head symbol of a list, e.g. `footprint` for `(footprint ...)`.
    pub fn tag(&self) -> Option<&str> {
        self.as_list()?.first()?.as_sym()
    }
}

/// Find a direct child list `(name ...)` within `items`.
pub fn find_child_list<'a>(items: &'a [Sexpr], name: &str) -> Option<&'a [Sexpr]> {
    items
        .iter()
        .filter_map(Sexpr::as_list)
        .find(|list| list.first().and_then(Sexpr::as_sym) == Some(name))
}

/// Find every direct child list `(name ...)` within `items`.
pub fn find_all_child_lists<'a>(items: &'a [Sexpr], name: &str) -> Vec<&'a [Sexpr]> {
    items
        .iter()
        .filter_map(Sexpr::as_list)
        .filter(|list| list.first().and_then(Sexpr::as_sym) == Some(name))
        .collect()
}

struct Parser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    current_pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Parser {
            input,
            chars: input.char_indices().peekable(),
            current_pos: 0,
        }
    }

    fn parse(&mut self) -> Result<Sexpr, ParseError> {
        self.skip_whitespace();
        if self.is_at_end() {
            return Err(ParseError::UnexpectedEof(self.current_pos));
        }

        if self.peek_char() == Some('(') {
            self.parse_list()
        } else {
            self.parse_atom()
        }
    }

    fn parse_list(&mut self) -> Result<Sexpr, ParseError> {
        let start = self.current_pos;
        self.expect('(')?;
        let mut items = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                return Err(ParseError::UnclosedList(start));
            }

            if self.peek_char() == Some(')') {
                self.advance();
                break;
            }

            items.push(self.parse()?);

            if items.len() % 1000 == 0 {
                trace!("Parsed {} items in list at offset {start}", items.len());
            }
        }

        Ok(Sexpr::with_span(
            SexprKind::List(items),
            Span::new(start, self.current_pos),
        ))
    }

    fn parse_atom(&mut self) -> Result<Sexpr, ParseError> {
        if self.peek_char() == Some('"') {
            return self.parse_string();
        }

        let start = self.current_pos;
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() || ch == '(' || ch == ')' {
                break;
            }
            self.advance();
        }

        if self.current_pos == start {
            return Err(ParseError::EmptyAtom(start));
        }

        Ok(Sexpr::with_span(
            SexprKind::Symbol(self.input[start..self.current_pos].to_string()),
            Span::new(start, self.current_pos),
        ))
    }

    fn parse_string(&mut self) -> Result<Sexpr, ParseError> {
        let start = self.current_pos;
        self.expect('"')?;
        let mut result = String::new();

        loop {
            match self.peek_char() {
                None => return Err(ParseError::UnterminatedString(start)),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some(ch) => ch,
                        None => return Err(ParseError::UnterminatedString(start)),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(ch) => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Ok(Sexpr::with_span(
            SexprKind::String(result),
            Span::new(start, self.current_pos),
        ))
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == ';' {
                // comment runs to end of line
                while let Some(ch) = self.peek_char() {
                    self.advance();
                    if ch == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn advance(&mut self) {
        if let Some((pos, ch)) = self.chars.next() {
            self.current_pos = pos + ch.len_utf8();
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(ParseError::UnexpectedChar(ch, expected, self.current_pos)),
            None => Err(ParseError::UnexpectedEof(self.current_pos)),
        }
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }
}

/// Parse the first S-expression in `input`. Anything after it is ignored.
pub fn parse(input: &str) -> Result<Sexpr, ParseError> {
    trace!("Parsing S-expression from {} bytes of input", input.len());
    let result = Parser::new(input).parse();
    if let Err(e) = &result {
        trace!("Failed to parse S-expression: {e:?}");
    }
    result
}

/// Errors that can occur during parsing. Each carries the byte offset where
/// the problem was detected.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    UnexpectedEof(usize),
    UnexpectedChar(char, char, usize),
    UnclosedList(usize),
    UnterminatedString(usize),
    EmptyAtom(usize),
}

impl ParseError {
    pub fn offset(&self) -> usize {
        match self {
            ParseError::UnexpectedEof(at)
            | ParseError::UnexpectedChar(_, _, at)
            | ParseError::UnclosedList(at)
            | ParseError::UnterminatedString(at)
            | ParseError::EmptyAtom(at) => *at,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof(_) => write!(f, "Unexpected end of input"),
            ParseError::UnexpectedChar(found, expected, _) => {
                write!(f, "Expected '{expected}', found '{found}'")
            }
            ParseError::UnclosedList(_) => write!(f, "Unclosed list"),
            ParseError::UnterminatedString(_) => write!(f, "Unterminated string"),
            ParseError::EmptyAtom(_) => write!(f, "Empty atom"),
        }
    }
}

impl std::error::Error for ParseError {}
