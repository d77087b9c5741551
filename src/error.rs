use std::path::PathBuf;

/// Binary-boundary error: an exit code plus a user-facing message.
///
/// Exit codes: 2 = input/output failure, 3 = snapshot not available.
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

/// File-level failure while reading or parsing one source file.
///
/// These never abort a run: the ingest stage logs them and moves on.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read CSV headers: {0}")]
    Headers(csv::Error),

    #[error("failed to read workbook '{}': {source}", path.display())]
    Workbook {
        path: PathBuf,
        source: calamine::Error,
    },

    #[error("workbook has no sheets")]
    EmptyWorkbook,

    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Failure to serve a view from the exported snapshot.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("data not found at '{}'; run `rxp process` first", path.display())]
    DataUnavailable { path: PathBuf },

    #[error("failed to read snapshot '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("snapshot '{}' is not a valid document: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        let exit_code = match e {
            QueryError::DataUnavailable { .. } => 3,
            QueryError::Read { .. } | QueryError::Corrupt { .. } => 2,
        };
        AppError::new(exit_code, e.to_string())
    }
}
