use crate::position::{Position, Span};
use crate::token::{Literal, Token, TokenKind};
use log::{debug, trace};
use phf::phf_set;
use std::iter::Peekable;
use std::str::Chars;

struct Scanner<'a> {
    iter: Peekable<Chars<'a>>,
    pos: Position,
}

/// Splits `source` into tokens. The result always ends with an EOF token
/// positioned at the end of input. Characters that start no token are
/// skipped without error.
pub fn tokenize(source_name: &str, source: &str) -> Vec<Token> {
    trace!("tokenizing {} ({} bytes)", source_name, source.len());
    let mut scanner = Scanner {
        iter: source.chars().peekable(),
        pos: Position::new(source_name),
    };
    let mut tokens: Vec<Token> = Vec::new();

    while scanner.iter.peek().is_some() {
        if let Some(token) = scanner.scan_token() {
            tokens.push(token);
        }
    }
    tokens.push(Token::new(
        TokenKind::EOF,
        Literal::Empty,
        Span::at(scanner.pos.clone()),
    ));
    tokens
}

impl<'a> Scanner<'a> {
    fn scan_token(&mut self) -> Option<Token> {
        match self.peek_pair() {
            Some(('/', '/')) => return Some(self.line_comment()),
            Some(('/', '*')) => return Some(self.block_comment()),
            Some(('&', '&')) | Some(('|', '|')) => return Some(self.take(2, TokenKind::LogicalOp)),
            Some(('<', '=')) | Some(('>', '=')) | Some(('=', '=')) | Some(('!', '=')) => {
                return Some(self.take(2, TokenKind::CompOp))
            }
            _ => (),
        }
        match *self.iter.peek()? {
            '<' | '>' => Some(self.take(1, TokenKind::CompOp)),
            '+' | '-' | '*' | '/' | '%' | '!' => Some(self.take(1, TokenKind::Operator)),
            ',' | ';' | ':' | '=' => Some(self.take(1, TokenKind::Symbol)),
            '(' | ')' => Some(self.take(1, TokenKind::Paren)),
            '[' | ']' => Some(self.take(1, TokenKind::Bracket)),
            '{' | '}' => Some(self.take(1, TokenKind::Brace)),
            '0'..='9' => Some(self.number()),
            '"' | '\'' => Some(self.string()),
            'a'..='z' | 'A'..='Z' | '_' => Some(self.identifier()),
            c => {
                if !c.is_whitespace() {
                    debug!("skipping unrecognized character {:?} at {}", c, self.pos);
                }
                self.advance();
                None
            }
        }
    }
    fn peek_pair(&self) -> Option<(char, char)> {
        let mut ahead = self.iter.clone();
        Some((ahead.next()?, ahead.next()?))
    }
    fn advance(&mut self) -> Option<char> {
        let c = self.iter.next()?;
        self.pos.advance(c);
        Some(c)
    }
    fn take(&mut self, width: usize, kind: TokenKind) -> Token {
        let start = self.pos.clone();
        let text: String = (0..width).filter_map(|_| self.advance()).collect();
        Token::new(kind, Literal::Text(text), Span::new(start, self.pos.clone()))
    }
    fn line_comment(&mut self) -> Token {
        let start = self.pos.clone();
        self.advance();
        self.advance();
        let mut text = String::new();
        while let Some(&c) = self.iter.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::new(
            TokenKind::Comment,
            Literal::Text(text),
            Span::new(start, self.pos.clone()),
        )
    }
    fn block_comment(&mut self) -> Token {
        let start = self.pos.clone();
        self.advance();
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_pair() {
                Some(('*', '/')) => {
                    self.advance();
                    self.advance();
                    break;
                }
                _ => match self.advance() {
                    Some(c) => text.push(c),
                    None => break,
                },
            }
        }
        Token::new(
            TokenKind::Comment,
            Literal::Text(text),
            Span::new(start, self.pos.clone()),
        )
    }
    fn number(&mut self) -> Token {
        let start = self.pos.clone();
        let mut text = String::new();
        let mut seen_point = false;
        while let Some(&c) = self.iter.peek() {
            match c {
                '0'..='9' => text.push(c),
                '.' if !seen_point => {
                    seen_point = true;
                    text.push(c);
                }
                _ => break,
            }
            self.advance();
        }
        // Digits with at most one point always parse, "1." included.
        let value = text.parse::<f64>().unwrap_or(f64::NAN);
        Token::new(
            TokenKind::Number,
            Literal::Number(value),
            Span::new(start, self.pos.clone()),
        )
    }
    fn string(&mut self) -> Token {
        let start = self.pos.clone();
        let quote = self.advance();
        let mut text = String::new();
        loop {
            match self.advance() {
                None => {
                    debug!("unterminated string starting at {}", start);
                    break;
                }
                Some(c) if Some(c) == quote => break,
                Some(c) => text.push(c),
            }
        }
        Token::new(
            TokenKind::String,
            Literal::Text(text),
            Span::new(start, self.pos.clone()),
        )
    }
    fn identifier(&mut self) -> Token {
        let start = self.pos.clone();
        let mut name = String::new();
        while let Some(&c) = self.iter.peek() {
            match c {
                '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' => {
                    name.push(c);
                    self.advance();
                }
                _ => break,
            }
        }
        let kind = if KEYWORDS.contains(name.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Ident
        };
        Token::new(kind, Literal::Text(name), Span::new(start, self.pos.clone()))
    }
}

static KEYWORDS: phf::Set<&'static str> = phf_set! {
    "var",
    "let",
    "if",
    "else",
    "for",
    "while",
    "return",
    "function",
    "undefined",
    "null",
    "true",
    "false",
};

#[cfg(test)]
mod scanner_tests {
    use crate::scanner::tokenize;
    use crate::token::{Literal, TokenKind};
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize("test", source).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn basic_scanner_test() {
        let tokens = tokenize("test", "x = 2");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text(), Some("x"));
        assert!(tokens[1].is(TokenKind::Symbol, "="));
        assert_eq!(tokens[2].literal, Literal::Number(2.0));
        assert_eq!(tokens[3].kind, TokenKind::EOF);
    }

    #[test]
    fn number_parsing() {
        let tokens = tokenize("test", "1+2.5");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0].literal, Literal::Number(1.0));
        assert!(tokens[1].is(TokenKind::Operator, "+"));
        assert_eq!(tokens[2].literal, Literal::Number(2.5));
    }

    #[test]
    fn second_point_ends_number() {
        let tokens = tokenize("test", "1.2.3");
        assert_eq!(tokens[0].literal, Literal::Number(1.2));
        // The stray '.' is skipped and "3" starts a new number.
        assert_eq!(tokens[1].literal, Literal::Number(3.0));
        assert_eq!(tokens[2].kind, TokenKind::EOF);
    }

    #[test]
    fn operator_classes() {
        assert_eq!(
            kinds("a && b || !c <= 1 != 2 < 3"),
            vec![
                TokenKind::Ident,
                TokenKind::LogicalOp,
                TokenKind::Ident,
                TokenKind::LogicalOp,
                TokenKind::Operator,
                TokenKind::Ident,
                TokenKind::CompOp,
                TokenKind::Number,
                TokenKind::CompOp,
                TokenKind::Number,
                TokenKind::CompOp,
                TokenKind::Number,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn delimiters_and_symbols() {
        assert_eq!(
            kinds("f([1], {a: 2});"),
            vec![
                TokenKind::Ident,
                TokenKind::Paren,
                TokenKind::Bracket,
                TokenKind::Number,
                TokenKind::Bracket,
                TokenKind::Symbol,
                TokenKind::Brace,
                TokenKind::Ident,
                TokenKind::Symbol,
                TokenKind::Number,
                TokenKind::Brace,
                TokenKind::Paren,
                TokenKind::Symbol,
                TokenKind::EOF,
            ]
        );
    }

    #[test]
    fn comments_are_tokens() {
        let tokens = tokenize("test", "// line\n/* block\n */ x");
        assert_eq!(tokens[0].kind, TokenKind::Comment);
        assert_eq!(tokens[0].text(), Some(" line"));
        assert_eq!(tokens[1].kind, TokenKind::Comment);
        assert_eq!(tokens[1].text(), Some(" block\n "));
        assert_eq!(tokens[2].text(), Some("x"));
        assert_eq!(tokens[2].span.left.line, 2);
    }

    #[test]
    fn strings_keep_backslashes() {
        let tokens = tokenize("test", r#"'it"s' "a\n""#);
        assert_eq!(tokens[0].literal, Literal::Text("it\"s".to_string()));
        assert_eq!(tokens[1].literal, Literal::Text("a\\n".to_string()));
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = tokenize("test", "let letter = function_ true");
        assert!(tokens[0].is(TokenKind::Keyword, "let"));
        assert!(tokens[1].is(TokenKind::Ident, "letter"));
        assert!(tokens[3].is(TokenKind::Ident, "function_"));
        assert!(tokens[4].is(TokenKind::Keyword, "true"));
    }

    #[test]
    fn unrecognized_characters_are_skipped() {
        assert_eq!(
            kinds("1 @ # 2"),
            vec![TokenKind::Number, TokenKind::Number, TokenKind::EOF]
        );
    }

    #[test]
    fn spans_track_lines_and_columns() {
        let tokens = tokenize("test", "a\n  bc");
        let bc = &tokens[1];
        assert_eq!((bc.span.left.line, bc.span.left.column), (1, 2));
        assert_eq!((bc.span.right.line, bc.span.right.column), (1, 4));
        let eof = &tokens[2];
        assert_eq!(eof.span.left.index, 6);
    }
}
