use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop the harness before the first frame.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("could not load flash image {path:?}: {source}")]
    Rom {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("SDL init error: {0}")]
    Sdl(String),
    #[error("SDL window error: {0}")]
    Window(String),
    #[error("SDL surface error: {0}")]
    Surface(String),
}

/// Failures raised while handing a finished frame to the display.
#[derive(Debug, Error)]
pub enum PresentError {
    #[error("frame buffer is owned by the presentation pipeline")]
    Busy,
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Init(#[from] InitError),
    #[error("presentation failed: {0}")]
    Present(#[from] PresentError),
}

impl HarnessError {
    pub fn exit_code(&self) -> i32 {
        match self {
            HarnessError::Init(_) | HarnessError::Present(_) => 1,
        }
    }
}
