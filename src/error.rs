/// Broad failure classes surfaced by the selection engines and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or configuration (shape, names, non-finite values, bad flags).
    Validation,
    /// Too few observations for the requested search.
    InsufficientData,
    /// The OLS solver could not produce a fit for a design matrix.
    FitFailed,
    /// Reading or writing files.
    Io,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Validation | ErrorKind::Io => 2,
            ErrorKind::InsufficientData => 3,
            ErrorKind::FitFailed => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientData, message)
    }

    pub fn fit_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FitFailed, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_kind() {
        assert_eq!(AppError::validation("x").exit_code(), 2);
        assert_eq!(AppError::io("x").exit_code(), 2);
        assert_eq!(AppError::insufficient_data("x").exit_code(), 3);
        assert_eq!(AppError::fit_failed("x").exit_code(), 4);
    }

    #[test]
    fn display_is_the_message() {
        let err = AppError::fit_failed("design matrix is rank deficient");
        assert_eq!(err.to_string(), "design matrix is rank deficient");
        assert_eq!(err.kind(), ErrorKind::FitFailed);
    }
}
