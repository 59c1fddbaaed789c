pub mod commands;
pub mod output;

pub use commands::{CliArgs, Commands, ConfigArgs, InitArgs, InspectArgs, ToolchainArgs};
pub use output::{OutputFormat, OutputFormatter};
