use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MenuError {
    /// Standard input reached end of file while a line was required.
    #[error("input closed before a selection was made")]
    InputClosed,

    #[error("console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write settings file {}: {source}", .path.display())]
    WriteSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures around the external renderer. None of these stop the menu.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("environment directory {} not found", .0.display())]
    EnvMissing(PathBuf),

    #[error("could not build PATH: {0}")]
    Path(#[from] std::env::JoinPathsError),

    #[error("{program}: {source}")]
    ProgramNotFound {
        program: String,
        #[source]
        source: which::Error,
    },

    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
