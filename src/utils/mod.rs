pub mod channel;
pub mod tracing;
pub mod xdg;
