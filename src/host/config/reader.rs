use std::fs::File;
use std::io::{Error as IoError, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::prelude::*;

/// A reader which reads the configuration content. A missing file is either
/// an error or means "use defaults", depending on `required`.
pub struct ContentReader {
    path: PathBuf,
    required: bool,
}

impl ContentReader {
    /// Creates a new [`ContentReader`].
    pub fn new<P: AsRef<Path>>(path: P, required: bool) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            required,
        }
    }

    /// Read content from the file. Returns `None` if an optional file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// This function will return an error if a required file doesn't exist or
    /// the file can't be read.
    pub fn read(self) -> Result<Option<String>, ReadContentError> {
        let Self { path, required } = self;
        let Some(mut file) = Self::open_configuration(path, required)? else {
            return Ok(None);
        };

        let mut content = String::new();
        file.read_to_string(&mut content).context(FileSystemSnafu {
            when: "Reading configuration",
        })?;
        Ok(Some(content))
    }

    /// Open the configuration file.
    ///
    /// # Errors
    ///
    /// This function will return an error if a required file doesn't exist
    /// or opening fails for another reason.
    fn open_configuration(path: PathBuf, required: bool) -> Result<Option<File>, ReadContentError> {
        match File::open(path.as_path()) {
            Ok(file) => Ok(Some(file)),
            Err(err) => match err.kind() {
                ErrorKind::NotFound if required => NotFoundSnafu { path }.fail(),
                ErrorKind::NotFound => {
                    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                    Ok(None)
                }
                _ => Err(err).context(FileSystemSnafu {
                    when: "Opening configuration file",
                }),
            },
        }
    }
}

/// An error type for reading content from the configuration file.
#[derive(Debug, Snafu, Clone)]
#[non_exhaustive]
pub enum ReadContentError {
    #[snafu(display("Could not open inexistent file {}", path.display()))]
    NotFound { path: PathBuf },
    #[snafu(display("Could not read configuration: {when}"))]
    FileSystem {
        when: String,
        #[snafu(source(from(IoError, Arc::new)))]
        source: Arc<IoError>,
    },
}
