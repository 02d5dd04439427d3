/// Error from the background worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    /// Cache I/O error
    Io(String),
    /// Network error
    Network(String),
    /// Non-2xx response while pre-caching
    Http(u16, String),
    /// Invalid origin or request path
    Url(String),
    /// Notification surface refused to show
    Display(String),
}

impl std::fmt::Display for WorkerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerError::Io(msg) => write!(f, "I/O error: {}", msg),
            WorkerError::Network(msg) => write!(f, "Network error: {}", msg),
            WorkerError::Http(code, path) => write!(f, "HTTP {} for {}", code, path),
            WorkerError::Url(msg) => write!(f, "Invalid URL: {}", msg),
            WorkerError::Display(msg) => write!(f, "Notification error: {}", msg),
        }
    }
}

impl std::error::Error for WorkerError {}
