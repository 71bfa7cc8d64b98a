pub mod config;
pub mod console;
pub mod notify;

pub use console::{Console, ConsoleCommand, ConsoleError};
pub use notify::{NotifyPort, NotifyService};
