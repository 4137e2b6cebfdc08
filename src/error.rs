use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonLibError {
    #[error("syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("invalid regex /{pattern}/: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("path not found: {0}")]
    PathNotFound(String),

    #[error("match found for path {path}: {value}")]
    UnexpectedMatch { path: String, value: String },

    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("type error: {0}")]
    TypeError(String),

    #[error("cannot delete the document root")]
    DeleteRoot,

    #[error("parse error: {0}")]
    Parse(String),

    #[error("output error: {0}")]
    Output(String),

    #[error("invalid schema: {0}")]
    InvalidSchema(String),

    #[error("json does not match schema:\n{}", .0.join("\n"))]
    SchemaViolation(Vec<String>),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for JsonLibError {
    fn from(e: serde_json::Error) -> Self {
        JsonLibError::Parse(e.to_string())
    }
}
