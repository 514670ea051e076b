use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to register the watch. Always fatal.
#[derive(Debug, Error)]
pub enum WatchSetupError {
    #[error("watch path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to watch {}: {source}", path.display())]
    Notify {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

/// Failure of a single preview task. Never leaves the task that hit it.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("error when opening {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error when reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error when rendering {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
