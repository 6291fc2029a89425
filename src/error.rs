use std::fmt;

#[derive(Debug)]
pub enum TabulaError {
    InvalidColumnCount(i64),
    InvalidConfiguration(String),
    Io(std::io::Error),
}

impl fmt::Display for TabulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabulaError::InvalidColumnCount(cols) => {
                write!(f, "cols must be greater than 0 (got {})", cols)
            }
            TabulaError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            TabulaError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for TabulaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TabulaError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TabulaError {
    fn from(value: std::io::Error) -> Self {
        TabulaError::Io(value)
    }
}
