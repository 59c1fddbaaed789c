//! atstart - CMake support for Atmel START generated projects
//!
//! Atmel START delivers generated driver code together with a GCC makefile.
//! This crate reads that makefile, extracts the include directories, source
//! files, linker script, CPU and device it encodes, and renders a CMake
//! toolchain file from them so the generated code can be built with CMake.
//!
//! # Example Usage
//!
//! ```no_run
//! use atstart::{Makefile, ToolchainRenderer};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let makefile = Makefile::from_path(Path::new("atstart/gcc/Makefile"))?;
//! println!("CPU: {}", makefile.get_cpu()?);
//!
//! let toolchain = makefile.generate_cmake_toolchain(&ToolchainRenderer::new())?;
//! std::fs::write("atstart/toolchain.cmake", toolchain)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`extractors`]: makefile field extraction
//! - [`toolchain`]: template rendering of toolchain documents
//! - [`project`]: CMake project initialisation
//! - [`config`]: environment based configuration
//! - [`cli`]: command line definitions and output formatting

pub mod cli;
pub mod config;
pub mod extractors;
pub mod project;
pub mod toolchain;
pub mod util;

pub use config::{AtstartConfig, ConfigError};
pub use extractors::{Makefile, MakefileError, MandatoryField};
pub use project::{init, InitReport, ProjectError};
pub use toolchain::{write_cmake_toolchain, ToolchainError, ToolchainFields, ToolchainRenderer};
pub use util::{init_default, init_from_env, init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
