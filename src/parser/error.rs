use thiserror::Error;

/// Failures while turning a source document into blocks
#[derive(Error, Debug)]
pub enum ParseError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    #[error("Input contained no data")]
    EmptyInput,

    #[error("Failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported encoding: {0}")]
    Encoding(String),
}

/// An element appeared somewhere its rule cannot handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("<{tag}> must appear inside a {expected} block, found {found}")]
    InvalidParent {
        tag: String,
        expected: &'static str,
        found: String,
    },

    #[error("Document nesting exceeds the limit of {limit} levels")]
    DepthExceeded { limit: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_error_messages() {
        let err = ParseError::from(StructureError::InvalidParent {
            tag: "tr".to_string(),
            expected: "table",
            found: "document".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "<tr> must appear inside a table block, found document"
        );
        assert!(matches!(err, ParseError::Structure(_)));
    }
}
