pub mod codec;
pub mod service;

pub use service::{run_command_writer, HostIconSink, HostService};
