use std::fmt;
use std::sync::Arc;

use lfs_lib::ids;
use lfs_lib::quality::InvalidQuality;

pub type BoxDynError = Box<dyn std::error::Error + Send + Sync>;

/// collaborator failure that can be handed to every reader waiting on the
/// same fetch
#[derive(Debug, Clone)]
pub struct SharedError(Arc<dyn std::error::Error + Send + Sync>);

impl SharedError {
    pub fn new(err: BoxDynError) -> Self {
        SharedError(Arc::from(err))
    }
}

impl fmt::Display for SharedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl std::error::Error for SharedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("\"{0}\" does not exist")]
    NotFound(String),

    #[error("\"{0}\" is not a directory")]
    NotADirectory(String),

    #[error("\"{0}\" is a directory")]
    IsADirectory(String),

    #[error("\"{0}\" cannot be opened for writing")]
    PermissionDenied(String),

    #[error("offset {offset} is out of range for \"{path}\" with length {length}")]
    Range {
        path: String,
        offset: u64,
        length: u64,
    },

    #[error(transparent)]
    InvalidArgument(#[from] InvalidQuality),

    #[error("{context}")]
    Transport {
        context: String,
        #[source]
        source: SharedError,
    },

    #[error("album {0} was reached more than once while crawling")]
    Cycle(ids::AlbumId),
}

impl FsError {
    pub fn transport<C>(context: C, source: SharedError) -> Self
    where
        C: Into<String>
    {
        FsError::Transport {
            context: context.into(),
            source
        }
    }
}
