//! Decode errors for opsem data-model lookups.

use thiserror::Error;

/// Errors that occur when turning raw codes or names into model types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Element type code outside the `newarray` primitive codes 5..=11.
    #[error("invalid array element type code: {0}")]
    InvalidElementKind(u8),

    /// Element kind name not recognized.
    #[error("unknown array element kind '{0}'")]
    UnknownElementKind(String),

    /// Mnemonic does not name any opcode.
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_element_kind() {
        assert_eq!(
            DecodeError::InvalidElementKind(4).to_string(),
            "invalid array element type code: 4"
        );
    }

    #[test]
    fn display_unknown_mnemonic() {
        assert_eq!(
            DecodeError::UnknownMnemonic("frob".to_string()).to_string(),
            "unknown mnemonic 'frob'"
        );
    }
}
