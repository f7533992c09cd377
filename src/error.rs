/// Top-level error carried out of `app::run()`.
///
/// `main` prints the message and exits with `exit_code`:
/// - 2: invalid user input or configuration, export I/O
/// - 4: fetching or decoding the remote dataset
/// - 5: a requested (category, year, mode) row does not exist
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
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
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures of the data layer (fetch, decode, lookup).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    /// The request could not be sent or the connection failed.
    #[error("request to emergency transport API failed: {0}")]
    Network(String),

    /// The API answered with a non-2xx status.
    #[error("emergency transport API returned status {0}")]
    Status(u16),

    /// The body was not a JSON array of records.
    #[error("failed to parse emergency transport API response: {0}")]
    Parse(String),

    /// No row exists for the requested combination.
    #[error("no {mode} record for category '{category}' in {year}")]
    MissingData {
        category: String,
        year: i32,
        mode: String,
    },
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        let code = match err {
            DataError::MissingData { .. } => 5,
            _ => 4,
        };
        AppError::new(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_maps_to_exit_codes() {
        let net: AppError = DataError::Network("connection refused".to_string()).into();
        assert_eq!(net.exit_code(), 4);
        assert!(net.to_string().contains("connection refused"));

        let status: AppError = DataError::Status(503).into();
        assert_eq!(status.exit_code(), 4);
        assert!(status.to_string().contains("503"));

        let missing: AppError = DataError::MissingData {
            category: "Other".to_string(),
            year: 2019,
            mode: "Dispatch".to_string(),
        }
        .into();
        assert_eq!(missing.exit_code(), 5);
        assert_eq!(missing.to_string(), "no Dispatch record for category 'Other' in 2019");
    }
}
