//! Makefile field extraction
//!
//! Reads the GCC makefile that Atmel START puts under `gcc/Makefile` and pulls
//! out the values a CMake toolchain needs: include directories, source files,
//! linker script, CPU and device. Every extraction is an independent regex
//! scan over the immutable makefile text, so calling one twice yields the same
//! result and a `Makefile` can be shared between threads.
//!
//! Paths in the makefile are written relative to the `gcc/` directory
//! (`../hal/include`). The leading `../` is stripped, which leaves them
//! relative to the generated project root.

use crate::toolchain::{ToolchainError, ToolchainFields, ToolchainRenderer};
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Extension appended to every extracted source file name
pub const SOURCE_EXTENSION: &str = ".c";

/// Source file that is left to the user's own project
const MAIN_SOURCE: &str = "main";

static INCLUDE_DIR_RE: OnceLock<Regex> = OnceLock::new();
static DEPENDENCY_FILE_RE: OnceLock<Regex> = OnceLock::new();
static LINKER_SCRIPT_RE: OnceLock<Regex> = OnceLock::new();
static CPU_RE: OnceLock<Regex> = OnceLock::new();
static DEVICE_RE: OnceLock<Regex> = OnceLock::new();

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid regex"))
}

/// A field the toolchain cannot be generated without
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MandatoryField {
    LinkerScript,
    Cpu,
    Device,
}

impl fmt::Display for MandatoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkerScript => write!(f, "linker script"),
            Self::Cpu => write!(f, "CPU"),
            Self::Device => write!(f, "device"),
        }
    }
}

/// Errors raised while reading or scanning a makefile
#[derive(Debug, Error)]
pub enum MakefileError {
    /// A mandatory pattern had no match
    #[error("Could not find {0} in makefile")]
    NotFound(MandatoryField),

    /// The makefile could not be read
    #[error("Failed to read makefile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MakefileError {
    /// Returns the missing field for `NotFound` errors
    pub fn missing_field(&self) -> Option<MandatoryField> {
        match self {
            Self::NotFound(field) => Some(*field),
            Self::Io { .. } => None,
        }
    }
}

/// An Atmel START generated makefile
///
/// Construction never validates the content. Each getter checks only the
/// pattern it needs, so reading the CPU works even when the linker script
/// reference is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Makefile {
    content: String,
}

impl Makefile {
    /// Wraps makefile text
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Reads a makefile from disk
    pub fn from_path(path: &Path) -> Result<Self, MakefileError> {
        debug!("Reading makefile {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| MakefileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(content))
    }

    /// Raw makefile text
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Include directories from `-I"../<dir>"` flags
    ///
    /// Order of first appearance is kept; empty and repeated entries are dropped.
    pub fn get_include_dirs(&self) -> Vec<String> {
        let re = regex(&INCLUDE_DIR_RE, r#"-I"\.\./(\S*?)""#);

        let mut seen = HashSet::new();
        let mut dirs = Vec::new();
        for cap in re.captures_iter(&self.content) {
            let dir = cap.get(1).map_or("", |m| m.as_str());
            if !dir.is_empty() && seen.insert(dir) {
                dirs.push(dir.to_string());
            }
        }

        debug!(count = dirs.len(), "Extracted include directories");
        dirs
    }

    /// Source files derived from `"<name>.d"` dependency references
    ///
    /// Names are deduplicated, `main` is removed, the rest is sorted and
    /// suffixed with [`SOURCE_EXTENSION`].
    pub fn get_source_files(&self) -> Vec<String> {
        let re = regex(&DEPENDENCY_FILE_RE, r#""(\S+?)\.d""#);

        let mut names: Vec<&str> = re
            .captures_iter(&self.content)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
            .filter(|name| !name.is_empty() && *name != MAIN_SOURCE)
            .collect();
        names.sort_unstable();
        names.dedup();

        debug!(count = names.len(), "Extracted source files");
        names
            .into_iter()
            .map(|name| format!("{}{}", name, SOURCE_EXTENSION))
            .collect()
    }

    /// Linker script from the first `"../<path>.ld"` reference
    pub fn get_linker_script(&self) -> Result<String, MakefileError> {
        let re = regex(&LINKER_SCRIPT_RE, r#""\.\./(\S+\.ld)""#);
        first_capture(re, &self.content, MandatoryField::LinkerScript)
    }

    /// CPU from the first `-mcpu=<cpu>` flag
    pub fn get_cpu(&self) -> Result<String, MakefileError> {
        let re = regex(&CPU_RE, r"-mcpu=(\S*)");
        first_capture(re, &self.content, MandatoryField::Cpu)
    }

    /// Device from the first `-D__<device>__` define
    pub fn get_device(&self) -> Result<String, MakefileError> {
        let re = regex(&DEVICE_RE, r"-D__(\S+)__");
        first_capture(re, &self.content, MandatoryField::Device)
    }

    /// Runs all five extractions
    pub fn fields(&self) -> Result<ToolchainFields, MakefileError> {
        Ok(ToolchainFields {
            include_dirs: self.get_include_dirs(),
            source_files: self.get_source_files(),
            linker_script: self.get_linker_script()?,
            cpu: self.get_cpu()?,
            device: self.get_device()?,
        })
    }

    /// Renders the toolchain document for this makefile
    ///
    /// A missing mandatory field aborts rendering; no partial document is produced.
    pub fn generate_cmake_toolchain(
        &self,
        renderer: &ToolchainRenderer,
    ) -> Result<String, ToolchainError> {
        let fields = self.fields()?;
        renderer.render(&fields)
    }
}

/// First match wins. An empty capture counts as missing.
fn first_capture(
    re: &Regex,
    content: &str,
    field: MandatoryField,
) -> Result<String, MakefileError> {
    let value = re
        .captures(content)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|value| !value.is_empty())
        .ok_or(MakefileError::NotFound(field))?;

    debug!(%field, value, "Extracted mandatory field");
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
OBJS_AS_ARGS +=  \
"hal/src/hal_io.o" \
"main.o"

DEPS_AS_ARGS +=  \
"hal/src/hal_io.d" \
"atmel_start.d" \
"main.d" \
"hal/src/hal_io.d"

$(QUOTE)arm-none-eabi-gcc$(QUOTE) -x c -mthumb -DDEBUG -Os -ffunction-sections -mlong-calls -g3 -Wall -c -std=gnu99 \
-D__SAMD21J18A__ -mcpu=cortex-m0plus  \
-I"../" -I"../config" -I"../hal/include" -I"../config" \
-I"../hal/utils/include" \
-MD -MP -MF "$(@:%.o=%.d)" -MT"$(@:%.o=%.d)" -MT"$(@:%.o=%.o)"  -o "$@" "$<"

$(QUOTE)arm-none-eabi-gcc$(QUOTE) -o $(OUTPUT_FILE_PATH_AS_ARGS) -Wl,--start-group $(LIBS) -Wl,--end-group -mthumb \
-Wl,-Map="$(OUTPUT_FILE_NAME).map" --specs=nano.specs -Wl,--gc-sections -mcpu=cortex-m0plus \
-T"../samd21a/gcc/gcc/samd21j18a_flash.ld" \
-L"../samd21a/gcc/gcc"
"#;

    #[test]
    fn test_include_dirs_keep_first_seen_order() {
        let makefile = Makefile::new(SAMPLE);
        assert_eq!(
            makefile.get_include_dirs(),
            vec!["config", "hal/include", "hal/utils/include"]
        );
    }

    #[test]
    fn test_include_dirs_skip_empty_capture() {
        let makefile = Makefile::new(r#"-I"../" -I"../a/b""#);
        assert_eq!(makefile.get_include_dirs(), vec!["a/b"]);
    }

    #[test]
    fn test_include_dirs_none() {
        let makefile = Makefile::new("-I/usr/include -Iinclude");
        assert!(makefile.get_include_dirs().is_empty());
    }

    #[test]
    fn test_include_dirs_deduplicated() {
        let makefile = Makefile::new(r#"-I"../a/b" -I"../c" -I"../a/b""#);
        assert_eq!(makefile.get_include_dirs(), vec!["a/b", "c"]);
    }

    #[test]
    fn test_source_files_from_sample() {
        let makefile = Makefile::new(SAMPLE);
        assert_eq!(
            makefile.get_source_files(),
            vec!["atmel_start.c", "hal/src/hal_io.c"]
        );
    }

    #[test]
    fn test_source_files_exclude_main_and_sort() {
        let makefile = Makefile::new(r#""foo.d" "bar.d" "main.d""#);
        assert_eq!(makefile.get_source_files(), vec!["bar.c", "foo.c"]);
    }

    #[test]
    fn test_source_files_keep_nested_main() {
        let makefile = Makefile::new(r#""examples/main.d" "main.d""#);
        assert_eq!(makefile.get_source_files(), vec!["examples/main.c"]);
    }

    #[test]
    fn test_source_files_none() {
        let makefile = Makefile::new("SOURCES := foo.c bar.c");
        assert!(makefile.get_source_files().is_empty());
    }

    #[test]
    fn test_linker_script() {
        let makefile = Makefile::new(SAMPLE);
        assert_eq!(
            makefile.get_linker_script().unwrap(),
            "samd21a/gcc/gcc/samd21j18a_flash.ld"
        );

        let makefile = Makefile::new(r#"-T"../gcc/script.ld""#);
        assert_eq!(makefile.get_linker_script().unwrap(), "gcc/script.ld");
    }

    #[test]
    fn test_linker_script_first_match_wins() {
        let makefile = Makefile::new(r#""../flash.ld" "../sram.ld""#);
        assert_eq!(makefile.get_linker_script().unwrap(), "flash.ld");
    }

    #[test]
    fn test_linker_script_missing() {
        let makefile = Makefile::new(r#"-T"script.ld""#);
        let err = makefile.get_linker_script().unwrap_err();
        assert_eq!(err.missing_field(), Some(MandatoryField::LinkerScript));
    }

    #[test]
    fn test_cpu() {
        let makefile = Makefile::new("-mthumb -mcpu=cortex-m4 -O2");
        assert_eq!(makefile.get_cpu().unwrap(), "cortex-m4");
    }

    #[test]
    fn test_cpu_first_match_wins() {
        let makefile = Makefile::new("-mcpu=cortex-m0plus -mcpu=cortex-m4");
        assert_eq!(makefile.get_cpu().unwrap(), "cortex-m0plus");
    }

    #[test]
    fn test_cpu_missing() {
        let makefile = Makefile::new("-mthumb -O2");
        assert!(matches!(
            makefile.get_cpu(),
            Err(MakefileError::NotFound(MandatoryField::Cpu))
        ));
    }

    #[test]
    fn test_cpu_empty_value_is_missing() {
        let makefile = Makefile::new("-mcpu= -mthumb");
        assert!(matches!(
            makefile.get_cpu(),
            Err(MakefileError::NotFound(MandatoryField::Cpu))
        ));
    }

    #[test]
    fn test_device() {
        let makefile = Makefile::new("-DDEBUG -D__SAMD21G18A__ -Os");
        assert_eq!(makefile.get_device().unwrap(), "SAMD21G18A");
    }

    #[test]
    fn test_device_missing() {
        let makefile = Makefile::new("-DDEBUG -D_SAMD21G18A_");
        assert!(matches!(
            makefile.get_device(),
            Err(MakefileError::NotFound(MandatoryField::Device))
        ));
    }

    #[test]
    fn test_partial_use_with_missing_fields() {
        let makefile = Makefile::new("-mcpu=cortex-m7");
        assert_eq!(makefile.get_cpu().unwrap(), "cortex-m7");
        assert!(makefile.get_device().is_err());
        assert!(makefile.get_linker_script().is_err());
    }

    #[test]
    fn test_extractions_are_idempotent() {
        let makefile = Makefile::new(SAMPLE);
        assert_eq!(makefile.get_include_dirs(), makefile.get_include_dirs());
        assert_eq!(makefile.get_source_files(), makefile.get_source_files());
        assert_eq!(
            makefile.get_linker_script().unwrap(),
            makefile.get_linker_script().unwrap()
        );
        assert_eq!(makefile.get_cpu().unwrap(), makefile.get_cpu().unwrap());
        assert_eq!(makefile.get_device().unwrap(), makefile.get_device().unwrap());
    }

    #[test]
    fn test_fields() {
        let fields = Makefile::new(SAMPLE).fields().unwrap();
        assert_eq!(fields.cpu, "cortex-m0plus");
        assert_eq!(fields.device, "SAMD21J18A");
        assert_eq!(fields.linker_script, "samd21a/gcc/gcc/samd21j18a_flash.ld");
        assert_eq!(fields.include_dirs.len(), 3);
        assert_eq!(fields.source_files.len(), 2);
    }

    #[test]
    fn test_fields_propagates_missing_device() {
        let makefile = Makefile::new(r#"-mcpu=cortex-m4 "../flash.ld""#);
        let err = makefile.fields().unwrap_err();
        assert_eq!(err.missing_field(), Some(MandatoryField::Device));
        assert_eq!(err.to_string(), "Could not find device in makefile");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Makefile::from_path(Path::new("/nonexistent/gcc/Makefile")).unwrap_err();
        assert!(matches!(err, MakefileError::Io { .. }));
        assert!(err.missing_field().is_none());
    }
}
