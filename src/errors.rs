/// Domain-specific error types for hopeval
///
/// The pipeline distinguishes fatal configuration errors (an answer type
/// outside the supported vocabulary, malformed input files) from soft parse
/// failures. Soft failures never surface here: the normalizers degrade to
/// returning their input unchanged and let the metric reflect the mismatch.

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("Unsupported answer type '{value}' in field '{field}'")]
    UnsupportedType {
        field: &'static str,
        value: String,
    },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("No cached model answers for item '{id}'")]
    MissingAnswers {
        id: String
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EvalError {
    /// Helper to create unsupported-type errors naming the offending field
    ///
    /// Example:
    /// ```
    /// use hopeval::errors::EvalError;
    /// let err = EvalError::unsupported("answer_type", "color");
    /// ```
    pub fn unsupported(field: &'static str, value: &str) -> Self {
        EvalError::UnsupportedType {
            field,
            value: value.to_string(),
        }
    }
}
