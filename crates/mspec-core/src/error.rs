//! Unified Error Model
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("TREE/{0}")]
    MalformedTree(String),

    #[error("TREE/MISSING_ID: {kind} '{name}' has no identifier")]
    MissingIdentifier { kind: &'static str, name: String },

    #[error("IO/{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("RENDER/{0}")]
    Render(String),

    #[error("PATH/UNCLASSIFIED: {} is neither a directory nor a file target", .0.display())]
    UnclassifiedPath(PathBuf),

    #[error("CONFIG/{0}")]
    Config(String),
}

impl ReportError {
    /// Attach the offending path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn missing_id(kind: &'static str, name: &str) -> Self {
        Self::MissingIdentifier {
            kind,
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_prefixes() {
        let err = ReportError::MalformedTree("null specification".to_string());
        assert_eq!(err.to_string(), "TREE/null specification");

        let err = ReportError::missing_id("specification", "should work");
        assert_eq!(
            err.to_string(),
            "TREE/MISSING_ID: specification 'should work' has no identifier"
        );

        let err = ReportError::UnclassifiedPath(PathBuf::from("/nowhere/x"));
        assert!(err.to_string().starts_with("PATH/UNCLASSIFIED: /nowhere/x"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = ReportError::io(
            "/out/report.html",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/out/report.html"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
