//! Tokenizer for filter value expressions.
//!
//! The lexer only ever sees the value part of a filter (everything right of
//! the operator). It classifies the input one character at a time and never
//! fails: anything it cannot classify becomes a [`TokenKind::Illegal`] token,
//! which the parser treats as fatal.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

/// Classification of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// End of input. Returned forever once reached.
    Eof,
    /// A character (or character sequence) that starts no valid token.
    Illegal,
    /// A run of whitespace.
    Whitespace,
    /// `,`
    Comma,
    /// `[`
    SquareBracketOpen,
    /// `]`
    SquareBracketClose,
    /// A run of letters that is not a keyword.
    Ident,
    /// A quoted string; the text excludes the quotes.
    String,
    /// An integer or decimal number, optionally negative.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Eof => "EOF",
            Self::Illegal => "Illegal",
            Self::Whitespace => "Whitespace",
            Self::Comma => "Comma",
            Self::SquareBracketOpen => "SquareBracketOpen",
            Self::SquareBracketClose => "SquareBracketClose",
            Self::Ident => "Ident",
            Self::String => "String",
            Self::Number => "Number",
            Self::True => "True",
            Self::False => "False",
            Self::Null => "Null",
        };
        f.write_str(name)
    }
}

/// A classified slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token classification.
    pub kind: TokenKind,
    /// Token text. Empty for whitespace, illegal and end-of-input tokens;
    /// unquoted content for strings.
    pub text: &'a str,
    /// Byte offset of the token start in the input.
    pub offset: usize,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, text: &'a str, offset: usize) -> Self {
        Self { kind, text, offset }
    }

    fn bare(kind: TokenKind, offset: usize) -> Self {
        Self::new(kind, "", offset)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "{} at {}", self.kind, self.offset)
        } else {
            write!(f, "{} ({}) at {}", self.kind, self.text, self.offset)
        }
    }
}

/// Single-use tokenizer over a value expression.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    /// Create a lexer positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    /// Byte offset of the next unread character.
    fn pos(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    /// Produce the next token. After the end of input every call returns
    /// [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token<'a> {
        let start = self.pos();
        let Some(&(_, ch)) = self.chars.peek() else {
            return Token::bare(TokenKind::Eof, start);
        };

        match ch {
            ',' => self.single(TokenKind::Comma, start),
            '[' => self.single(TokenKind::SquareBracketOpen, start),
            ']' => self.single(TokenKind::SquareBracketClose, start),
            '"' | '\'' => self.read_string(ch, start),
            '-' => self.read_number(start),
            c if c.is_whitespace() => self.read_whitespace(start),
            c if c.is_alphabetic() => self.read_ident(start),
            c if c.is_ascii_digit() => self.read_number(start),
            _ => {
                self.chars.next();
                Token::bare(TokenKind::Illegal, start)
            }
        }
    }

    fn single(&mut self, kind: TokenKind, start: usize) -> Token<'a> {
        self.chars.next();
        let end = self.pos();
        Token::new(kind, &self.input[start..end], start)
    }

    fn read_whitespace(&mut self, start: usize) -> Token<'a> {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
        Token::bare(TokenKind::Whitespace, start)
    }

    fn read_ident(&mut self, start: usize) -> Token<'a> {
        while self.chars.next_if(|&(_, c)| c.is_alphabetic()).is_some() {}
        let text = &self.input[start..self.pos()];
        let kind = match text {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" => TokenKind::Null,
            _ => TokenKind::Ident,
        };
        Token::new(kind, text, start)
    }

    /// Reads up to the matching quote. An unterminated string runs to the
    /// end of input.
    fn read_string(&mut self, quote: char, start: usize) -> Token<'a> {
        self.chars.next(); // consume opening quote
        let content_start = self.pos();
        let mut content_end = self.input.len();
        for (i, c) in self.chars.by_ref() {
            if c == quote {
                content_end = i;
                break;
            }
        }
        Token::new(TokenKind::String, &self.input[content_start..content_end], start)
    }

    /// Number grammar: `-? digit+ ( '.' digit+ )?`.
    fn read_number(&mut self, start: usize) -> Token<'a> {
        self.chars.next_if(|&(_, c)| c == '-');
        if self.read_digits() == 0 {
            return Token::bare(TokenKind::Illegal, start);
        }
        if self.chars.next_if(|&(_, c)| c == '.').is_some() && self.read_digits() == 0 {
            return Token::bare(TokenKind::Illegal, start);
        }
        let end = self.pos();
        Token::new(TokenKind::Number, &self.input[start..end], start)
    }

    fn read_digits(&mut self) -> usize {
        let mut count = 0;
        while self.chars.next_if(|&(_, c)| c.is_ascii_digit()).is_some() {
            count += 1;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(input: &str) -> Vec<Token<'_>> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        lex_all(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_should_return_eof_repeatedly() {
        let mut lexer = Lexer::new("");
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);

        let mut lexer = Lexer::new("1");
        assert_eq!(lexer.next_token().kind, TokenKind::Number);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn test_should_lex_punctuation() {
        assert_eq!(
            kinds("[,]"),
            vec![
                TokenKind::SquareBracketOpen,
                TokenKind::Comma,
                TokenKind::SquareBracketClose
            ]
        );
    }

    #[test]
    fn test_should_lex_quoted_strings() {
        let tokens = lex_all(r#""foo" 'bar baz'"#);
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "foo");
        assert_eq!(tokens[2].kind, TokenKind::String);
        assert_eq!(tokens[2].text, "bar baz");
        assert_eq!(tokens[2].offset, 6);
    }

    #[test]
    fn test_should_keep_other_quote_inside_string() {
        let tokens = lex_all(r#""it's""#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "it's");
    }

    #[test]
    fn test_should_read_unterminated_string_to_end() {
        let tokens = lex_all(r#""foo bar"#);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "foo bar");
    }

    #[test]
    fn test_should_collapse_whitespace_run() {
        let tokens = lex_all(" \t\u{00a0} 1");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Whitespace);
        assert_eq!(tokens[0].text, "");
        assert_eq!(tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn test_should_lex_keywords_case_sensitively() {
        assert_eq!(
            kinds("true false null True NULL foo"),
            vec![
                TokenKind::True,
                TokenKind::Whitespace,
                TokenKind::False,
                TokenKind::Whitespace,
                TokenKind::Null,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_should_lex_non_ascii_letters_as_ident() {
        let tokens = lex_all("größe");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Ident);
        assert_eq!(tokens[0].text, "größe");
    }

    #[test]
    fn test_should_lex_numbers() {
        for input in ["0", "30", "-30", "2.5", "-0.25", "10.0"] {
            let tokens = lex_all(input);
            assert_eq!(tokens.len(), 1, "{input}");
            assert_eq!(tokens[0].kind, TokenKind::Number, "{input}");
            assert_eq!(tokens[0].text, input);
        }
    }

    #[test]
    fn test_should_mark_malformed_input_illegal() {
        for input in [".", "-", "5.", ".5", "_", "(", "-.5"] {
            let tokens = lex_all(input);
            assert_eq!(
                tokens.first().map(|t| t.kind),
                Some(TokenKind::Illegal),
                "{input} should start with an illegal token"
            );
            assert_eq!(tokens[0].text, "");
        }
    }

    #[test]
    fn test_should_split_number_and_letters() {
        assert_eq!(kinds("5abc"), vec![TokenKind::Number, TokenKind::Ident]);
    }

    #[test]
    fn test_should_lex_array_expression() {
        assert_eq!(
            kinds(r#"["a", 1]"#),
            vec![
                TokenKind::SquareBracketOpen,
                TokenKind::String,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::SquareBracketClose,
            ]
        );
    }
}
