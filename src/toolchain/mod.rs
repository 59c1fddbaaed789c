//! CMake toolchain generation
//!
//! Turns the fields extracted from a makefile into a toolchain document by
//! rendering them through a Handlebars template. The built-in template targets
//! `arm-none-eabi-gcc`; any other template can be injected as long as it only
//! references the five fields of [`ToolchainFields`].

pub mod renderer;

pub use renderer::{ToolchainRenderer, CMAKELISTS_TEMPLATE, TOOLCHAIN_TEMPLATE};

use crate::extractors::{Makefile, MakefileError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Values substituted into the toolchain template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolchainFields {
    /// Include directories relative to the project root
    pub include_dirs: Vec<String>,
    /// Generated `.c` sources relative to the project root, `main.c` excluded
    pub source_files: Vec<String>,
    /// Linker script relative to the project root
    pub linker_script: String,
    /// Value of `-mcpu`
    pub cpu: String,
    /// Device name from the `-D__<device>__` define
    pub device: String,
}

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error(transparent)]
    Makefile(#[from] MakefileError),

    #[error("Invalid toolchain template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Failed to render toolchain: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Failed to write toolchain {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads `makefile`, renders the toolchain and writes it to `output`
///
/// The document is rendered completely before anything is written, so a
/// makefile with a missing mandatory field leaves `output` untouched.
pub fn write_cmake_toolchain(
    makefile: &Path,
    output: &Path,
    renderer: &ToolchainRenderer,
) -> Result<(), ToolchainError> {
    let content = Makefile::from_path(makefile)?.generate_cmake_toolchain(renderer)?;

    fs::write(output, content).map_err(|source| ToolchainError::Io {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        "Wrote toolchain {} from {}",
        output.display(),
        makefile.display()
    );
    Ok(())
}
