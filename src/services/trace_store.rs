use crate::core::trace::Trace;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when persisting a trace
#[derive(Debug, Error)]
pub enum TraceStoreError {
    #[error("Failed to write trace to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write the trace to `path` as newline-joined lines, replacing any existing content
///
/// The file handle is scoped to this call and closed on every return path.
pub fn save_trace<P: AsRef<Path>>(path: P, trace: &Trace) -> Result<(), TraceStoreError> {
    let path = path.as_ref();
    let io_err = |source| TraceStoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(trace.lines().join("\n").as_bytes())
        .map_err(io_err)?;
    file.flush().map_err(io_err)?;

    tracing::info!("Saved {} trace entries to {}", trace.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trace::TraceTag;

    #[test]
    fn test_save_overwrites_existing_content() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "stale line\nanother stale line\nthird").unwrap();

        let mut trace = Trace::new();
        trace.record(TraceTag::System, "SEARCH COMPLETE");
        save_trace(file.path(), &trace).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert!(!written.contains("stale"));
        assert!(written.ends_with("[SYSTEM] SEARCH COMPLETE"));
    }

    #[test]
    fn test_save_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("trace.txt");

        let err = save_trace(&path, &Trace::new()).unwrap_err();
        assert!(err.to_string().contains("trace.txt"));
    }
}
