use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::Manifest {
                path: path.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }

    pub fn pool_shutdown() -> Error {
        Error(ErrorKind::PoolShutdown.into())
    }

    pub fn thread_spawn(name: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::ThreadSpawn {
                name: name.into(),
                source,
            }
            .into(),
        )
    }

    pub fn task_failed(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::TaskFailed {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid manifest '{}': {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },

    #[error("work submitted to a worker pool that has been shut down")]
    PoolShutdown,

    #[error("failed to spawn thread '{name}': {source}")]
    ThreadSpawn {
        name: String,
        source: std::io::Error,
    },

    #[error("task '{name}' failed: {message}")]
    TaskFailed { name: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}
