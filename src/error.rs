use std::io;
use std::path::PathBuf;

use crate::ui::core::geom::Rect;
use crate::ui::core::id::NodeId;

/// Failures reported by a rendering backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("cannot allocate a surface for {rect:?}")]
    SurfaceAlloc { rect: Rect },
    #[error("no surface registered for node {0:?}")]
    UnknownSurface(NodeId),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum DesktopError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("node {0:?} is not in the tree")]
    UnknownNode(NodeId),
    #[error("i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Error raised by a widget's own lifecycle callbacks.
///
/// Teardown never propagates these; they are logged and the next node is
/// destroyed anyway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct WidgetError(pub String);

impl WidgetError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, DesktopError>;
