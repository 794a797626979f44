use thiserror::Error;

use super::{LspMethod, Position};

/// JSON-RPC error codes the query layer answers with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LspErrorCode {
    InvalidParams,
}

impl LspErrorCode {
    pub fn code(self) -> i32 {
        match self {
            LspErrorCode::InvalidParams => -32602,
        }
    }
}

/// A query the client should not have made.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("ignored file at uri {uri} in {method}")]
    IgnoredFile { uri: String, method: LspMethod },

    #[error("file not found at uri {uri} in {method}")]
    FileNotFound { uri: String, method: LspMethod },

    #[error("invalid location: position {position} in {uri} does not correspond to a valid location")]
    InvalidLocation { uri: String, position: Position },
}

impl QueryError {
    pub fn code(&self) -> LspErrorCode {
        match self {
            QueryError::IgnoredFile { .. }
            | QueryError::FileNotFound { .. }
            | QueryError::InvalidLocation { .. } => LspErrorCode::InvalidParams,
        }
    }
}
