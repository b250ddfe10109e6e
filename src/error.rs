//! Translation errors.

use thiserror::Error;

/// Translation result type.
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Why a translation stopped. Every error is terminal; the partially built
/// graph must be discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Cannot handle the instruction {opcode}")]
    UnsupportedOpcode { opcode: String },

    #[error("Cannot call the function {name}")]
    UnresolvedCallee { name: String },

    #[error("No store instruction for dependent variable index {index}")]
    IncompleteOutput { index: usize },

    /// The IR violates a shape the translator relies on (operand count or
    /// type, unknown value, bound violation, ...).
    #[error("malformed input at instruction {inst}: {reason}")]
    MalformedInput { inst: usize, reason: String },
}

/// Coarse classification of a [`TranslateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unsupported,
    Unresolved,
    Incomplete,
    Malformed,
}

impl TranslateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranslateError::UnsupportedOpcode { .. } => ErrorKind::Unsupported,
            TranslateError::UnresolvedCallee { .. } => ErrorKind::Unresolved,
            TranslateError::IncompleteOutput { .. } => ErrorKind::Incomplete,
            TranslateError::MalformedInput { .. } => ErrorKind::Malformed,
        }
    }

    /// Index of the offending instruction, when the error has one.
    pub fn instruction(&self) -> Option<usize> {
        match self {
            TranslateError::MalformedInput { inst, .. } => Some(*inst),
            _ => None,
        }
    }
}

/// Single-string status of a translation: empty on success, the error
/// message otherwise.
pub fn status_message<T>(result: &Result<T>) -> String {
    match result {
        Ok(_) => String::new(),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = TranslateError::UnresolvedCallee { name: "foo".into() };
        assert_eq!(e.to_string(), "Cannot call the function foo");
        assert_eq!(e.kind(), ErrorKind::Unresolved);

        let e = TranslateError::IncompleteOutput { index: 0 };
        assert_eq!(
            e.to_string(),
            "No store instruction for dependent variable index 0"
        );

        let e = TranslateError::UnsupportedOpcode {
            opcode: "frem".into(),
        };
        assert_eq!(e.to_string(), "Cannot handle the instruction frem");

        let e = TranslateError::MalformedInput {
            inst: 4,
            reason: "load through an unknown pointer".into(),
        };
        assert_eq!(
            e.to_string(),
            "malformed input at instruction 4: load through an unknown pointer"
        );
        assert_eq!(e.instruction(), Some(4));
    }

    #[test]
    fn status_is_empty_on_success() {
        assert_eq!(status_message(&Ok(())), "");
        let failed: Result<()> = Err(TranslateError::IncompleteOutput { index: 2 });
        assert_eq!(
            status_message(&failed),
            "No store instruction for dependent variable index 2"
        );
    }
}
