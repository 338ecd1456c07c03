use super::config::Encoding;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Unsupported binary operator in '{encoding}' encoding: {operator}")]
    UnsupportedBinaryOperator { encoding: Encoding, operator: String },

    #[error("Unsupported unary operator in '{encoding}' encoding: {operator}")]
    UnsupportedUnaryOperator { encoding: Encoding, operator: String },

    #[error("Exponentiation is not supported in '{0}' encoding")]
    UnsupportedExponentiation(Encoding),

    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// The caller broke a precondition of the engine. Never recoverable.
    #[error("Internal consistency violation: {0}")]
    InternalConsistency(String),

    #[error("IR error: {0}")]
    Ir(String),
}

impl From<solvc_core::IrError> for TransformError {
    fn from(err: solvc_core::IrError) -> Self {
        TransformError::Ir(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
