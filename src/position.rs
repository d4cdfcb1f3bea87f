use std::fmt;
use std::rc::Rc;

/// A cursor into a named source. All three counters are zero-based;
/// `Display` renders them one-based for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub source: Rc<str>,
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(source: &str) -> Position {
        Position {
            source: Rc::from(source),
            index: 0,
            line: 0,
            column: 0,
        }
    }

    /// Steps over `c`. A newline moves to column 0 of the next line.
    pub fn advance(&mut self, c: char) {
        self.index += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    pub fn advanced(&self, c: char) -> Position {
        let mut next = self.clone();
        next.advance(c);
        next
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source, self.line + 1, self.column + 1)
    }
}

/// Textual extent of a token or node. `right` is exclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub left: Position,
    pub right: Position,
}

impl Span {
    pub fn new(left: Position, right: Position) -> Span {
        Span { left, right }
    }

    /// A single-width span starting at `left`.
    pub fn at(left: Position) -> Span {
        let right = left.advanced(' ');
        Span { left, right }
    }

    /// The span covering `self` through the end of `other`.
    pub fn to(&self, other: &Span) -> Span {
        Span {
            left: self.left.clone(),
            right: other.right.clone(),
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.left)
    }
}
