use std::fmt;

/// Result type for worktrace-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Store layer error
    Store(worktrace_store::Error),

    /// Domain rule violation (lifecycle, ordering, validation)
    Domain(worktrace_types::Error),

    /// Referenced entity does not exist
    NotFound(String),

    /// Entity exists but belongs to another tenant
    AccessDenied(String),

    /// Configuration error
    Config(String),

    /// IO operation failed
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Store(err) => write!(f, "Store error: {}", err),
            Error::Domain(err) => write!(f, "{}", err),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(err) => Some(err),
            Error::Domain(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::NotFound(_) | Error::AccessDenied(_) | Error::Config(_) => None,
        }
    }
}

impl From<worktrace_store::Error> for Error {
    fn from(err: worktrace_store::Error) -> Self {
        // Domain and not-found failures keep their meaning across the layer
        // boundary so callers can match on them without digging.
        match err {
            worktrace_store::Error::Domain(domain) => Error::Domain(domain),
            worktrace_store::Error::NotFound(msg) => Error::NotFound(msg),
            other => Error::Store(other),
        }
    }
}

impl From<worktrace_types::Error> for Error {
    fn from(err: worktrace_types::Error) -> Self {
        Error::Domain(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_domain_errors_stay_domain() {
        let inner = worktrace_types::Error::Validation("empty".to_string());
        let wrapped: Error = worktrace_store::Error::Domain(inner).into();
        assert!(matches!(wrapped, Error::Domain(_)));
    }

    #[test]
    fn test_store_not_found_stays_not_found() {
        let wrapped: Error = worktrace_store::Error::NotFound("task x".to_string()).into();
        assert!(matches!(wrapped, Error::NotFound(_)));
    }
}
