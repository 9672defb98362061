//! Where-clause parser.
//!
//! A filter has the fixed shape `<key> <operator> <value>`: a key made of
//! ASCII letters, `.` and `_`, exactly one space, one of the operator
//! spellings, exactly one space, then a value expression. The value is
//! tokenized by [`Lexer`] and reduced to a single [`Value`]: one scalar
//! token, or a bracketed flat list of scalar tokens.

use fq_model::{KeyPath, Operator, Value, Where};

use super::lexer::{Lexer, Token, TokenKind};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while parsing a filter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The filter does not have the `<key> <operator> <value>` shape.
    #[error("malformed filter {input:?}: expected `<key> <operator> <value>`")]
    MalformedFilter {
        /// The raw filter.
        input: String,
    },
    /// The filter is well shaped but the operator is not supported.
    #[error("unknown operator {operator:?} in {input:?}")]
    UnknownOperator {
        /// The operator text.
        operator: String,
        /// The raw filter.
        input: String,
    },
    /// The value contains a character sequence that starts no valid token.
    #[error("illegal token at offset {offset} in value {input:?}")]
    IllegalToken {
        /// Byte offset of the illegal token within the value.
        offset: usize,
        /// The raw value expression.
        input: String,
    },
    /// The value expression has no tokens.
    #[error("empty value")]
    EmptyValue {
        /// The raw value expression.
        input: String,
    },
    /// Several tokens that are not enclosed in `[` and `]`.
    #[error("invalid value {input:?}: multiple tokens must form a bracketed list")]
    InvalidValueShape {
        /// The raw value expression.
        input: String,
    },
    /// A token that cannot stand as a value (identifier, bracket).
    #[error("unexpected token {found} in value {input:?}")]
    UnexpectedToken {
        /// Description of the token.
        found: String,
        /// The raw value expression.
        input: String,
    },
    /// A number that does not fit its type.
    #[error("invalid number {text:?} in value {input:?}")]
    InvalidNumber {
        /// The number text.
        text: String,
        /// The raw value expression.
        input: String,
    },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a filter such as `age > 30` or `tags in ["a", 1]`.
///
/// # Errors
///
/// Returns [`ParseError`] if the filter is malformed, uses an unknown
/// operator, or has an invalid value expression.
pub fn parse_where(raw: &str) -> Result<Where, ParseError> {
    let malformed = || ParseError::MalformedFilter {
        input: raw.to_owned(),
    };

    if raw.contains('\n') {
        return Err(malformed());
    }

    let (key, rest) = raw.split_once(' ').ok_or_else(malformed)?;
    if key.is_empty() || !key.chars().all(is_key_char) {
        return Err(malformed());
    }

    let (operator, value) = rest.split_once(' ').ok_or_else(malformed)?;
    if operator.is_empty() {
        return Err(malformed());
    }
    let operator = Operator::from_token(operator).ok_or_else(|| ParseError::UnknownOperator {
        operator: operator.to_owned(),
        input: raw.to_owned(),
    })?;

    let value = parse_value(value)?;
    Ok(Where::new(KeyPath::new(key), operator, value))
}

/// Parse a value expression: a scalar literal or a bracketed flat list.
///
/// # Errors
///
/// Returns [`ParseError`] if the expression has an illegal token, no tokens,
/// several tokens outside brackets, or a token that cannot stand as a value.
pub fn parse_value(text: &str) -> Result<Value, ParseError> {
    let tokens = significant_tokens(text)?;

    match tokens.as_slice() {
        [] => Err(ParseError::EmptyValue {
            input: text.to_owned(),
        }),
        [token] => scalar(token, text),
        [first, inner @ .., last]
            if first.kind == TokenKind::SquareBracketOpen
                && last.kind == TokenKind::SquareBracketClose =>
        {
            inner
                .iter()
                .map(|token| scalar(token, text))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        _ => Err(ParseError::InvalidValueShape {
            input: text.to_owned(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '.' || c == '_'
}

/// Lex to completion, dropping whitespace and commas.
fn significant_tokens(text: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut lexer = Lexer::new(text);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        match token.kind {
            TokenKind::Eof => return Ok(tokens),
            TokenKind::Illegal => {
                return Err(ParseError::IllegalToken {
                    offset: token.offset,
                    input: text.to_owned(),
                });
            }
            TokenKind::Whitespace | TokenKind::Comma => {}
            _ => tokens.push(token),
        }
    }
}

fn scalar(token: &Token<'_>, input: &str) -> Result<Value, ParseError> {
    match token.kind {
        TokenKind::String => Ok(Value::String(token.text.to_owned())),
        TokenKind::True => Ok(Value::Bool(true)),
        TokenKind::False => Ok(Value::Bool(false)),
        TokenKind::Null => Ok(Value::Null),
        TokenKind::Number => number(token.text, input),
        TokenKind::Eof
        | TokenKind::Illegal
        | TokenKind::Whitespace
        | TokenKind::Comma
        | TokenKind::SquareBracketOpen
        | TokenKind::SquareBracketClose
        | TokenKind::Ident => Err(ParseError::UnexpectedToken {
            found: token.to_string(),
            input: input.to_owned(),
        }),
    }
}

fn number(text: &str, input: &str) -> Result<Value, ParseError> {
    let invalid = || ParseError::InvalidNumber {
        text: text.to_owned(),
        input: input.to_owned(),
    };

    if text.contains('.') {
        let v: f64 = text.parse().map_err(|_| invalid())?;
        if !v.is_finite() {
            return Err(invalid());
        }
        Ok(Value::Float(v))
    } else {
        text.parse().map(Value::Int).map_err(|_| invalid())
    }
}
