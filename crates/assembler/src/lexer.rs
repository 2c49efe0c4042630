//! Tokenizer for opsem assembly text.

use crate::error::AsmError;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A bare word: mnemonic, number, descriptor, name. Case is kept.
    Word(String),
    /// A double-quoted string literal with escapes resolved.
    Str(String),
}

impl Token {
    /// Source-like text of the token, for error messages.
    pub(crate) fn text(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Str(s) => format!("{s:?}"),
        }
    }
}

/// Tokenize a single line of assembly text.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// A `;` where a token would start begins a comment that runs to end of
/// line. Inside a word (`Ljava/lang/Object;`) or a string it is ordinary.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == ';' {
            break;
        } else if c == '"' {
            chars.next();
            tokens.push(Token::Str(read_string(&mut chars, line_num)?));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || c == '"' {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    Ok(tokens)
}

/// Read the body of a string literal after its opening quote.
fn read_string(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
) -> Result<String, AsmError> {
    let mut out = String::new();
    loop {
        match chars.next() {
            None => return Err(AsmError::UnterminatedString { line }),
            Some('"') => return Ok(out),
            Some('\\') => out.push(read_escape(chars, line)?),
            Some(c) => out.push(c),
        }
    }
}

fn read_escape(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: usize,
) -> Result<char, AsmError> {
    let bad = |token: String| AsmError::InvalidLiteral { line, token };
    match chars.next() {
        None => Err(AsmError::UnterminatedString { line }),
        Some('n') => Ok('\n'),
        Some('t') => Ok('\t'),
        Some('r') => Ok('\r'),
        Some('0') => Ok('\0'),
        Some('\\') => Ok('\\'),
        Some('"') => Ok('"'),
        Some('\'') => Ok('\''),
        Some('u') => {
            if chars.next() != Some('{') {
                return Err(bad("\\u".to_string()));
            }
            let mut hex = String::new();
            loop {
                match chars.next() {
                    None => return Err(AsmError::UnterminatedString { line }),
                    Some('}') => break,
                    Some(c) => hex.push(c),
                }
            }
            u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| bad(format!("\\u{{{hex}}}")))
        }
        Some(c) => Err(bad(format!("\\{c}"))),
    }
}
