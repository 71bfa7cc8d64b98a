pub mod domain;
pub mod host;
pub mod utils;
