//! Error types for the opsem assembler.

use thiserror::Error;

/// Errors produced while assembling text into a block.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// An unrecognized opcode mnemonic was encountered.
    #[error("line {line}: unknown opcode '{token}'")]
    UnknownOpcode { line: usize, token: String },

    /// An opcode did not have enough operands.
    #[error("line {line}: {opcode} expects {expected} operand(s)")]
    MissingArgument {
        line: usize,
        opcode: &'static str,
        expected: usize,
    },

    /// A numeric literal could not be parsed or is out of range.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// A constant operand is not a literal, or has the wrong category
    /// for its opcode.
    #[error("line {line}: invalid literal '{token}'")]
    InvalidLiteral { line: usize, token: String },

    /// A field or method descriptor could not be parsed.
    #[error("line {line}: invalid descriptor '{token}'")]
    InvalidDescriptor { line: usize, token: String },

    /// An array element kind name or type code was not recognized.
    #[error("line {line}: invalid element kind '{token}'")]
    InvalidElementKind { line: usize, token: String },

    /// A token appeared where it was not expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },

    /// A string literal ran to the end of the line.
    #[error("line {line}: unterminated string literal")]
    UnterminatedString { line: usize },
}

impl AsmError {
    /// Line number the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            AsmError::UnknownOpcode { line, .. }
            | AsmError::MissingArgument { line, .. }
            | AsmError::InvalidNumber { line, .. }
            | AsmError::InvalidLiteral { line, .. }
            | AsmError::InvalidDescriptor { line, .. }
            | AsmError::InvalidElementKind { line, .. }
            | AsmError::UnexpectedToken { line, .. }
            | AsmError::UnterminatedString { line } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_unknown_opcode() {
        let e = AsmError::UnknownOpcode {
            line: 3,
            token: "iadd3".to_string(),
        };
        assert_eq!(e.to_string(), "line 3: unknown opcode 'iadd3'");
    }

    #[test]
    fn error_display_missing_argument() {
        let e = AsmError::MissingArgument {
            line: 7,
            opcode: "iinc",
            expected: 2,
        };
        assert_eq!(e.to_string(), "line 7: iinc expects 2 operand(s)");
    }

    #[test]
    fn error_display_invalid_number() {
        let e = AsmError::InvalidNumber {
            line: 2,
            token: "0xZZ".to_string(),
        };
        assert_eq!(e.to_string(), "line 2: invalid number '0xZZ'");
    }

    #[test]
    fn error_display_invalid_literal() {
        let e = AsmError::InvalidLiteral {
            line: 1,
            token: "3L".to_string(),
        };
        assert_eq!(e.to_string(), "line 1: invalid literal '3L'");
    }

    #[test]
    fn error_display_invalid_descriptor() {
        let e = AsmError::InvalidDescriptor {
            line: 9,
            token: "(Q)V".to_string(),
        };
        assert_eq!(e.to_string(), "line 9: invalid descriptor '(Q)V'");
    }

    #[test]
    fn error_display_invalid_element_kind() {
        let e = AsmError::InvalidElementKind {
            line: 4,
            token: "boolean".to_string(),
        };
        assert_eq!(e.to_string(), "line 4: invalid element kind 'boolean'");
    }

    #[test]
    fn error_display_unexpected_token() {
        let e = AsmError::UnexpectedToken {
            line: 4,
            token: "extra".to_string(),
        };
        assert_eq!(e.to_string(), "line 4: unexpected token 'extra'");
    }

    #[test]
    fn error_display_unterminated_string() {
        let e = AsmError::UnterminatedString { line: 6 };
        assert_eq!(e.to_string(), "line 6: unterminated string literal");
    }

    #[test]
    fn line_accessor() {
        assert_eq!(AsmError::UnterminatedString { line: 6 }.line(), 6);
        let e = AsmError::UnknownOpcode {
            line: 11,
            token: "x".to_string(),
        };
        assert_eq!(e.line(), 11);
    }
}
