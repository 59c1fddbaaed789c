//! Project initialisation
//!
//! Lays out a fresh CMake project next to the generated Atmel START code: a
//! `src/` directory for the user's sources and a `CMakeLists.txt` that pulls
//! in the generated toolchain.

use crate::toolchain::renderer::cmake_registry;
use crate::toolchain::CMAKELISTS_TEMPLATE;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Directory holding the user's own sources
pub const SRC_DIR: &str = "src";

const CMAKELISTS: &str = "CMakeLists.txt";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Invalid project name: {0:?}")]
    InvalidName(String),

    #[error("{} already exists", .0.display())]
    CMakeListsExists(PathBuf),

    #[error("Failed to render CMakeLists.txt: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Failed to render CMakeLists.txt: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What [`init`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub src_dir: PathBuf,
    /// False when `src/` was already there
    pub src_dir_created: bool,
    pub cmakelists: PathBuf,
}

#[derive(Serialize)]
struct CMakeListsContext<'a> {
    project_name: &'a str,
}

/// Renders the built-in `CMakeLists.txt` for `project_name`
pub fn render_cmakelists(project_name: &str) -> Result<String, ProjectError> {
    validate_name(project_name)?;

    let mut handlebars = cmake_registry();
    handlebars.register_template_string(CMAKELISTS, CMAKELISTS_TEMPLATE)?;
    Ok(handlebars.render(CMAKELISTS, &CMakeListsContext { project_name })?)
}

/// Creates `src/` and `CMakeLists.txt` in `directory`
///
/// An existing `CMakeLists.txt` is never overwritten.
pub fn init(directory: &Path, project_name: &str) -> Result<InitReport, ProjectError> {
    validate_name(project_name)?;

    let cmakelists = directory.join(CMAKELISTS);
    if cmakelists.exists() {
        return Err(ProjectError::CMakeListsExists(cmakelists));
    }

    let src_dir = directory.join(SRC_DIR);
    let src_dir_created = if src_dir.is_dir() {
        warn!("{} already exists, keeping it", src_dir.display());
        false
    } else {
        info!("Creating {}", src_dir.display());
        fs::create_dir_all(&src_dir).map_err(|source| ProjectError::Io {
            path: src_dir.clone(),
            source,
        })?;
        true
    };

    info!("Generating {}", cmakelists.display());
    let content = render_cmakelists(project_name)?;
    fs::write(&cmakelists, content).map_err(|source| ProjectError::Io {
        path: cmakelists.clone(),
        source,
    })?;

    Ok(InitReport {
        src_dir,
        src_dir_created,
        cmakelists,
    })
}

fn validate_name(project_name: &str) -> Result<(), ProjectError> {
    let valid = !project_name.is_empty()
        && project_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ProjectError::InvalidName(project_name.to_string()))
    }
}
