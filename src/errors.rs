use std::fmt;
use std::io;

#[derive(Debug)]
pub enum PbcError {
    // File and I/O errors
    FileReadError(String),
    FileWriteError(String),
    IoError(io::Error),

    // Lexical analysis errors
    InvalidNumber {
        number: String,
        line: usize,
    },

    // Parsing errors
    SyntaxError {
        expected: String,
        found: String,
        line: usize,
    },

    // Code generation errors
    CodeGenError {
        message: String,
        line: Option<usize>,
    },
    NoRegistersAvailable,
    ScratchpadExhausted {
        name: String,
    },

    // Generic errors
    GenericError(String),
}

impl PbcError {
    /// Create a syntax error
    pub fn syntax_error(expected: impl Into<String>, found: impl Into<String>, line: usize) -> Self {
        PbcError::SyntaxError {
            expected: expected.into(),
            found: found.into(),
            line,
        }
    }

    /// Create a code generation error
    pub fn codegen_error(message: impl Into<String>) -> Self {
        PbcError::CodeGenError {
            message: message.into(),
            line: None,
        }
    }

    /// Create a code generation error with line information
    pub fn codegen_error_with_line(message: impl Into<String>, line: usize) -> Self {
        PbcError::CodeGenError {
            message: message.into(),
            line: Some(line),
        }
    }

    /// Process exit status for batch mode. Each error kind keeps a stable code:
    /// 1 = file/I-O, 2 = lexical, 3 = syntax, 4 = register exhaustion,
    /// 5 = scratchpad exhaustion, 6 = code generation, 7 = other.
    pub fn exit_code(&self) -> i32 {
        match self {
            PbcError::FileReadError(_) | PbcError::FileWriteError(_) | PbcError::IoError(_) => 1,
            PbcError::InvalidNumber { .. } => 2,
            PbcError::SyntaxError { .. } => 3,
            PbcError::NoRegistersAvailable => 4,
            PbcError::ScratchpadExhausted { .. } => 5,
            PbcError::CodeGenError { .. } => 6,
            PbcError::GenericError(_) => 7,
        }
    }
}

impl fmt::Display for PbcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PbcError::FileReadError(msg) => write!(f, "File read error: {}", msg),
            PbcError::FileWriteError(msg) => write!(f, "File write error: {}", msg),
            PbcError::IoError(err) => write!(f, "I/O error: {}", err),

            PbcError::InvalidNumber { number, line } => {
                write!(f, "Invalid number '{}' at line {}", number, line)
            }

            PbcError::SyntaxError { expected, found, line } => {
                write!(f, "Syntax error at line {}: expected '{}', found '{}'", line, expected, found)
            }

            PbcError::CodeGenError { message, line } => {
                if let Some(l) = line {
                    write!(f, "Code generation error at line {}: {}", l, message)
                } else {
                    write!(f, "Code generation error: {}", message)
                }
            }
            PbcError::NoRegistersAvailable => {
                write!(f, "No registers available for allocation")
            }
            PbcError::ScratchpadExhausted { name } => {
                write!(f, "Out of scratchpad memory while binding variable '{}'", name)
            }

            PbcError::GenericError(msg) => {
                write!(f, "Error: {}", msg)
            }
        }
    }
}

impl std::error::Error for PbcError {}

// Conversion implementations for common error types
impl From<io::Error> for PbcError {
    fn from(err: io::Error) -> Self {
        PbcError::IoError(err)
    }
}

impl From<String> for PbcError {
    fn from(err: String) -> Self {
        PbcError::GenericError(err)
    }
}

impl From<&str> for PbcError {
    fn from(err: &str) -> Self {
        PbcError::GenericError(err.to_string())
    }
}

// Type alias for Result with PbcError
pub type PbcResult<T> = Result<T, PbcError>;
