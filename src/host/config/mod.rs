mod content;
mod reader;

use std::path::Path;

pub use content::{Configuration, NotificationContent, ScheduleContent};
pub use reader::ReadContentError;

use snafu::prelude::*;
use toml::de::Error as DeError;

use crate::utils::xdg::{Xdg, XdgError};

use reader::ContentReader;

/// An error type for loading configuraton from files.
#[derive(Debug, Snafu, Clone)]
#[non_exhaustive]
pub enum LoadConfigurationError {
    #[snafu(display("Could not resolve XDG configuration directory"))]
    XdgConfig { source: XdgError },
    #[snafu(display("Could not read content from file"))]
    Read { source: ReadContentError },
    #[snafu(display("Could not parse invalid configurations"))]
    Parse { source: DeError },
}

/// Parse configuration from TOML text. Every missing key falls back to its
/// default.
///
/// # Errors
///
/// This function will return an error if the content is not valid.
pub fn parse(content: &str) -> Result<Configuration, LoadConfigurationError> {
    toml::from_str(content).context(ParseSnafu)
}

/// Read configuration from a custom path. The file must exist.
///
/// # Errors
///
/// This function will return an error if reading content from file fails or
/// parsing configuration fails.
pub fn load_with_path<P: AsRef<Path>>(path: P) -> Result<Configuration, LoadConfigurationError> {
    load(path, true)
}

/// Read configuration from XDG configuration directory. Defaults are used
/// when no file exists, nothing is written.
///
/// # Errors
///
/// This function will return an error if reading content from file fails or
/// parsing configuration fails.
pub fn load_with_xdg(app_name: &str) -> Result<Configuration, LoadConfigurationError> {
    let path = Xdg::new(Path::new(app_name))
        .map(|xdg| xdg.config_file("config.toml"))
        .context(XdgConfigSnafu)?;
    load(path, false)
}

fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Configuration, LoadConfigurationError> {
    let content = ContentReader::new(path.as_ref(), required)
        .read()
        .context(ReadSnafu)?;
    match content {
        Some(content) => parse(&content),
        None => Ok(Configuration::default()),
    }
}
