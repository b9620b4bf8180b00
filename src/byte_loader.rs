//! Reading user-supplied files into memory.

use std::{fmt, io, pin::Pin};

use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt as _},
};

use crate::{error::PipelineError, prelude::*};

/// A file supplied by the user, which we read exactly once.
pub struct SourceFile {
    /// A human-readable description of the input source, for error messages.
    description: String,
    /// Where our bytes come from.
    origin: Origin,
}

/// The places we can read a [`SourceFile`] from.
enum Origin {
    Path(PathBuf),
    Reader(Pin<Box<dyn AsyncRead + Send + 'static>>),
}

impl SourceFile {
    /// A file on disk. It is not opened until [`load`] is called.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            description: path.display().to_string(),
            origin: Origin::Path(path),
        }
    }

    /// Standard input.
    pub fn stdin() -> Self {
        Self::from_reader("stdin", tokio::io::stdin())
    }

    /// Any async reader.
    pub fn from_reader(
        description: impl Into<String>,
        reader: impl AsyncRead + Send + 'static,
    ) -> Self {
        Self {
            description: description.into(),
            origin: Origin::Reader(Box::pin(reader)),
        }
    }

    /// Bytes we already have in memory.
    #[cfg(test)]
    pub fn from_bytes(description: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::from_reader(description, io::Cursor::new(bytes))
    }

    /// Either a path, or standard input if the path is missing or `-`.
    pub fn from_path_or_stdin(path: Option<&Path>) -> Self {
        match path {
            Some(path) if path != Path::new("-") => Self::from_path(path),
            _ => Self::stdin(),
        }
    }

    /// A human-readable description of this file.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Read the full contents of `file` into memory.
///
/// Either all the bytes are returned, or [`PipelineError::Read`].
#[instrument(level = "debug", skip_all, fields(file = %file.description))]
pub async fn load(file: SourceFile) -> Result<Vec<u8>, PipelineError> {
    let SourceFile {
        description,
        origin,
    } = file;
    let result = match origin {
        Origin::Path(path) => read_path(&path).await,
        Origin::Reader(mut reader) => {
            let mut bytes = vec![];
            reader.read_to_end(&mut bytes).await.map(|_| bytes)
        }
    };
    match result {
        Ok(bytes) => {
            debug!(bytes = bytes.len(), "Read input file");
            Ok(bytes)
        }
        Err(source) => Err(PipelineError::Read {
            description,
            source,
        }),
    }
}

/// Read a file from disk.
async fn read_path(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path).await?;
    let mut bytes = vec![];
    file.read_to_end(&mut bytes).await?;
    Ok(bytes)
}
