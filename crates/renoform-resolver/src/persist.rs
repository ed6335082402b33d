use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
#[must_use]
pub enum PersistError {
    #[error("An I/O error occurred, path at fault: {path:?}")]
    Io {
        source: io::Error,
        path: Option<PathBuf>,
    },

    #[error("Failed to (de)serialize data to/from YAML")]
    SerdeYml(#[from] serde_yml::Error),
}

impl PersistError {
    pub const fn io(source: io::Error, path: PathBuf) -> Self {
        Self::Io {
            source,
            path: Some(path),
        }
    }
}

/// A trait that represents an entity (type) that can be persisted in a file.
pub trait PersistedEntity: Serialize + for<'de> Deserialize<'de> + Default {
    /// The name of the file where this entity should be persisted.
    const FILE_PATH: &'static str;

    /// Deserializes an instance of [`Self`] from [`Self::FILE_PATH`] inside of
    /// `directory`.
    ///
    /// # Errors
    ///
    /// This function will return an error if there is an error reading the
    /// file or an error occurs when deserializing its contents into [`Self`].
    fn read_from(directory: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = directory.as_ref().join(Self::FILE_PATH);
        let yml = fs::read_to_string(&path).map_err(|source| PersistError::io(source, path))?;
        let entity = serde_yml::from_str(&yml)?;
        Ok(entity)
    }

    /// Like [`Self::read_from`], but falls back to [`Default`] when the file
    /// doesn't exist.
    ///
    /// # Errors
    ///
    /// See [`Self::read_from`]. A missing file is not an error.
    fn read_from_or_default(directory: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = directory.as_ref().join(Self::FILE_PATH);
        match path.try_exists() {
            Ok(true) => Self::read_from(directory),
            Ok(false) => {
                tracing::debug!(?path, "No persisted file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(PersistError::io(source, path)),
        }
    }

    /// Serialize `self` into a string and write it to [`Self::FILE_PATH`]
    /// inside of `directory`.
    ///
    /// # Errors
    ///
    /// This function will return an error if an error occurs while serializing
    /// [`self`](Self) to a string or while writing that string to the file.
    fn write_to(&self, directory: impl AsRef<Path>) -> Result<PathBuf, PersistError> {
        let path = directory.as_ref().join(Self::FILE_PATH);
        let yml = serde_yml::to_string(self)?;
        fs::write(&path, yml).map_err(|source| PersistError::io(source, path.clone()))?;
        Ok(path)
    }
}
