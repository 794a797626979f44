use std::fmt;

/// Error codes for all checker diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E1xxx: Parse errors
/// - E2xxx: Naming errors
/// - E3xxx: Resolution errors
/// - E4xxx: Definition validation errors
/// - E5xxx: Inference errors
/// - E9xxx: Internal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Parse Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Missing `end`
    E1003,
    /// Expected identifier or constant
    E1004,
    /// Unrecognized character
    E1005,

    // Naming Errors (E2xxx)
    /// Class reopened as module, or module as class
    E2001,
    /// Constant redefined as class or module
    E2002,
    /// Method redefined with a different number of parameters
    E2003,

    // Resolution Errors (E3xxx)
    /// Unable to resolve constant
    E3001,
    /// Circular superclass
    E3002,
    /// Superclass is not a class
    E3003,
    /// `include` of something that is not a module
    E3004,

    // Definition Validation Errors (E4xxx)
    /// Override has a different number of parameters than its parent
    E4001,
    /// Method body in an interface (RBI) file
    E4002,

    // Inference Errors (E5xxx)
    /// Method does not exist on receiver
    E5001,
    /// Wrong number of arguments
    E5002,

    // Internal Errors (E9xxx)
    /// Too many errors
    E9002,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// Check if this is a parser error (E1xxx range).
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    /// Check if this error is produced by definition-level phases (naming,
    /// resolution, validation) rather than by parsing or inference.
    pub fn is_definition_error(&self) -> bool {
        matches!(self.as_str().as_bytes().get(1), Some(b'2'..=b'4'))
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
