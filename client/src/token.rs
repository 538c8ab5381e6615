//! Auth token lookup.
//!
//! The dashboard keeps its token in client storage; here the analogue is a
//! small file. A missing token is a guarded no-op, not an error: `connect()`
//! skips the stream entirely and schedules nothing.

use std::path::PathBuf;
use tracing::debug;

pub trait TokenSource: Send + Sync {
    /// Current token, or `None` when no credential is available.
    fn load(&self) -> Option<String>;
}

/// Reads the token from a file, trimming surrounding whitespace.
pub struct FileTokenSource {
    path: PathBuf,
}

impl FileTokenSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenSource for FileTokenSource {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    debug!("Token file {} is empty", self.path.display());
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) => {
                debug!("Token file {} not readable: {}", self.path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_and_trims_token() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "  secret-token-123  ").unwrap();
        let source = FileTokenSource::new(f.path());
        assert_eq!(source.load().as_deref(), Some("secret-token-123"));
    }

    #[test]
    fn missing_file_is_none() {
        let source = FileTokenSource::new("/nonexistent/3f-token");
        assert!(source.load().is_none());
    }

    #[test]
    fn whitespace_only_file_is_none() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "   ").unwrap();
        let source = FileTokenSource::new(f.path());
        assert!(source.load().is_none());
    }
}
