//! Bounded content preview of a single file
//!
//! Reads a file in fixed-size chunks and streams each chunk to a sink as soon as it is read.
//! Rendering stops at end of file (completion marker) or once the byte budget is spent
//! (truncation marker). The chunk that crosses the budget is rendered in full, so a preview
//! can exceed the budget by less than one chunk.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;
use tracing::{error, info};

use crate::config::PreviewConfig;
use crate::error::PreviewError;

/// Written after the content when the whole file was rendered
pub const COMPLETION_MARKER: &str = "\n";

/// Written after the content when the budget ran out before end of file
pub const TRUNCATION_MARKER: &str = "\n...\n";

/// How a successful preview ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewOutcome {
    /// End of file reached within the budget
    Completed { bytes: usize },
    /// Budget exhausted with content left over
    Truncated { bytes: usize },
}

impl PreviewOutcome {
    pub fn bytes(&self) -> usize {
        match self {
            PreviewOutcome::Completed { bytes } | PreviewOutcome::Truncated { bytes } => *bytes,
        }
    }
}

/// Render a bounded preview of `path` into `sink`.
///
/// The file handle is dropped on every return path.
pub fn preview<W: Write>(
    path: &Path,
    config: &PreviewConfig,
    mut sink: W,
) -> Result<PreviewOutcome, PreviewError> {
    let mut file = File::open(path).map_err(|source| PreviewError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let read_err = |source: io::Error| PreviewError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut buffer = vec![0u8; config.read_size()];
    let mut remaining = config.byte_budget;
    let mut rendered = 0;

    while remaining > 0 {
        let bytes_read = read_chunk(&mut file, &mut buffer).map_err(read_err)?;
        if bytes_read == 0 {
            render(&mut sink, path, COMPLETION_MARKER.as_bytes())?;
            return Ok(PreviewOutcome::Completed { bytes: rendered });
        }

        render(&mut sink, path, &buffer[..bytes_read])?;
        rendered += bytes_read;
        remaining = remaining.saturating_sub(bytes_read);
    }

    // A file that ends exactly on the budget is complete, one that overshot it is not
    if rendered == config.byte_budget && at_eof(&mut file).map_err(read_err)? {
        render(&mut sink, path, COMPLETION_MARKER.as_bytes())?;
        Ok(PreviewOutcome::Completed { bytes: rendered })
    } else {
        render(&mut sink, path, TRUNCATION_MARKER.as_bytes())?;
        Ok(PreviewOutcome::Truncated { bytes: rendered })
    }
}

/// Preview `path` to stdout and log how it went.
///
/// Failures are logged here; the result is handed back only so callers can observe it.
pub fn preview_to_stdout(
    path: &Path,
    config: &PreviewConfig,
) -> Result<PreviewOutcome, PreviewError> {
    info!(path = %path.display(), "content of {}:", path.display());

    let result = preview(path, config, io::stdout());
    match &result {
        Ok(PreviewOutcome::Completed { bytes }) => {
            info!(path = %path.display(), bytes, "end of read file");
        }
        Ok(PreviewOutcome::Truncated { bytes }) => {
            info!(
                path = %path.display(),
                bytes,
                budget = config.byte_budget,
                "end of read file (truncated)"
            );
        }
        Err(e) => error!(path = %path.display(), "{}", e),
    }
    result
}

fn read_chunk(file: &mut File, buffer: &mut [u8]) -> io::Result<usize> {
    loop {
        match file.read(buffer) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

fn at_eof(file: &mut File) -> io::Result<bool> {
    let mut probe = [0u8; 1];
    Ok(read_chunk(file, &mut probe)? == 0)
}

fn render<W: Write>(sink: &mut W, path: &Path, bytes: &[u8]) -> Result<(), PreviewError> {
    sink.write_all(bytes)
        .and_then(|_| sink.flush())
        .map_err(|source| PreviewError::Render {
            path: path.to_path_buf(),
            source,
        })
}
