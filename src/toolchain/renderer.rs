//! Handlebars rendering of toolchain documents

use super::{ToolchainError, ToolchainFields};
use handlebars::Handlebars;
use tracing::debug;

/// Built-in CMake toolchain template for `arm-none-eabi-gcc`
pub const TOOLCHAIN_TEMPLATE: &str = include_str!("templates/toolchain.cmake.hbs");

/// Built-in project `CMakeLists.txt` template
pub const CMAKELISTS_TEMPLATE: &str = include_str!("templates/CMakeLists.txt.hbs");

const TOOLCHAIN: &str = "toolchain";

/// Registry configured for CMake output
///
/// Strict mode turns a reference to an unknown field into an error, and
/// escaping is disabled because the output is not HTML.
pub(crate) fn cmake_registry() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
}

/// Renders [`ToolchainFields`] through a compiled template
pub struct ToolchainRenderer {
    handlebars: Handlebars<'static>,
}

impl ToolchainRenderer {
    /// Renderer using [`TOOLCHAIN_TEMPLATE`]
    pub fn new() -> Self {
        // The built-in template is covered by tests, so it always compiles.
        Self::with_template(TOOLCHAIN_TEMPLATE).expect("built-in toolchain template is valid")
    }

    /// Renderer using caller supplied template text
    pub fn with_template(template: &str) -> Result<Self, ToolchainError> {
        let mut handlebars = cmake_registry();
        handlebars.register_template_string(TOOLCHAIN, template)?;
        Ok(Self { handlebars })
    }

    pub fn render(&self, fields: &ToolchainFields) -> Result<String, ToolchainError> {
        debug!(
            cpu = %fields.cpu,
            device = %fields.device,
            "Rendering toolchain template"
        );
        Ok(self.handlebars.render(TOOLCHAIN, fields)?)
    }
}

impl Default for ToolchainRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ToolchainFields {
        ToolchainFields {
            include_dirs: vec!["config".to_string(), "hal/include".to_string()],
            source_files: vec!["atmel_start.c".to_string(), "hal/src/hal_io.c".to_string()],
            linker_script: "samd21a/gcc/gcc/samd21j18a_flash.ld".to_string(),
            cpu: "cortex-m0plus".to_string(),
            device: "SAMD21J18A".to_string(),
        }
    }

    #[test]
    fn test_builtin_template_compiles() {
        assert!(ToolchainRenderer::with_template(TOOLCHAIN_TEMPLATE).is_ok());
    }

    #[test]
    fn test_builtin_template_renders_all_fields() {
        let output = ToolchainRenderer::new().render(&fields()).unwrap();

        assert!(output.contains("set(CMAKE_SYSTEM_PROCESSOR cortex-m0plus)"));
        assert!(output.contains("set(ATSTART_DEVICE SAMD21J18A)"));
        assert!(output.contains("${CMAKE_CURRENT_LIST_DIR}/config"));
        assert!(output.contains("${CMAKE_CURRENT_LIST_DIR}/hal/include"));
        assert!(output.contains("${CMAKE_CURRENT_LIST_DIR}/atmel_start.c"));
        assert!(output.contains("${CMAKE_CURRENT_LIST_DIR}/hal/src/hal_io.c"));
        assert!(output
            .contains("${CMAKE_CURRENT_LIST_DIR}/samd21a/gcc/gcc/samd21j18a_flash.ld"));
        assert!(output.contains("-mcpu=cortex-m0plus"));
        assert!(output.contains("-D__SAMD21J18A__"));
        assert!(!output.contains("{{"));
    }

    #[test]
    fn test_custom_template() {
        let renderer = ToolchainRenderer::with_template(
            "{{cpu}}|{{device}}|{{linker_script}}|{{#each include_dirs}}{{this}};{{/each}}|{{#each source_files}}{{this}};{{/each}}",
        )
        .unwrap();

        let output = renderer.render(&fields()).unwrap();
        assert_eq!(
            output,
            "cortex-m0plus|SAMD21J18A|samd21a/gcc/gcc/samd21j18a_flash.ld|config;hal/include;|atmel_start.c;hal/src/hal_io.c;"
        );
    }

    #[test]
    fn test_output_is_not_html_escaped() {
        let mut fields = fields();
        fields.include_dirs = vec!["a&b/<c>".to_string()];
        let renderer =
            ToolchainRenderer::with_template("{{#each include_dirs}}{{this}}{{/each}}").unwrap();

        assert_eq!(renderer.render(&fields).unwrap(), "a&b/<c>");
    }

    #[test]
    fn test_invalid_template_syntax() {
        let result = ToolchainRenderer::with_template("{{#each include_dirs}}");
        assert!(matches!(result, Err(ToolchainError::Template(_))));
    }

    #[test]
    fn test_unknown_placeholder_fails_in_strict_mode() {
        let renderer = ToolchainRenderer::with_template("{{compiler}}").unwrap();
        assert!(matches!(
            renderer.render(&fields()),
            Err(ToolchainError::Render(_))
        ));
    }
}
