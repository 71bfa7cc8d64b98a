use std::path::{Path, PathBuf};
use std::sync::Arc;

use snafu::prelude::*;
use xdg::{BaseDirectories, BaseDirectoriesError};

/// Helper for locating files in XDG base directories.
pub struct Xdg {
    base: BaseDirectories,
}

impl Xdg {
    /// Create a [`Xdg`]. All files are looked up in a subdirectory named
    /// prefix.
    ///
    /// # Errors
    ///
    /// This function will return an error if XDG settings is missing.
    pub fn new<P: AsRef<Path>>(prefix: P) -> Result<Self, XdgError> {
        let base = BaseDirectories::with_prefix(prefix).context(InitSnafu)?;
        Ok(Self { base })
    }

    /// Resolve the absolute path of a configuration file. The file and its
    /// directories are not created.
    pub fn config_file<P: AsRef<Path>>(&self, file: P) -> PathBuf {
        self.base.get_config_file(file)
    }
}

/// An error for XDG-related operations.
#[derive(Debug, Snafu, Clone)]
pub enum XdgError {
    #[snafu(display("Could not get XDG settings"))]
    Init {
        #[snafu(source(from(BaseDirectoriesError, Arc::new)))]
        source: Arc<BaseDirectoriesError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_in_prefix() {
        let Ok(xdg) = Xdg::new("repeat-timer") else {
            return;
        };
        let path = xdg.config_file("config.toml");
        assert!(path.ends_with("repeat-timer/config.toml"));
    }
}
