//! Output formatting for the extracted makefile settings
//!
//! JSON and YAML serialize [`ToolchainFields`] as-is so they can be consumed
//! by scripts; the human format prints a tree.

use anyhow::{Context, Result};
use std::collections::BTreeMap;

use crate::config::AtstartConfig;
use crate::toolchain::ToolchainFields;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format (machine-readable)
    Json,
    /// YAML format
    Yaml,
    /// Human-readable formatted text
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the fields extracted from a makefile
    pub fn format(&self, fields: &ToolchainFields) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(fields)
                .context("Failed to serialize makefile settings to JSON"),
            OutputFormat::Yaml => serde_yaml::to_string(fields)
                .context("Failed to serialize makefile settings to YAML"),
            OutputFormat::Human => Ok(self.format_human(fields)),
        }
    }

    /// Formats configuration display
    pub fn format_config(&self, config: &AtstartConfig) -> Result<String> {
        // Sorted for stable output
        let config_map: BTreeMap<_, _> = config.to_display_map().into_iter().collect();
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config_map)
                .context("Failed to serialize config to JSON"),
            OutputFormat::Yaml => {
                serde_yaml::to_string(&config_map).context("Failed to serialize config to YAML")
            }
            OutputFormat::Human => Ok(config.to_string()),
        }
    }

    fn format_human(&self, fields: &ToolchainFields) -> String {
        let mut output = String::new();

        output.push_str("Atmel START Makefile\n");
        output.push_str(&"\u{2501}".repeat(42));
        output.push_str("\n\n");

        output.push_str(&format!("Device:         {}\n", fields.device));
        output.push_str(&format!("CPU:            {}\n", fields.cpu));
        output.push_str(&format!("Linker Script:  {}\n\n", fields.linker_script));

        push_tree(&mut output, "Include Directories", &fields.include_dirs);
        output.push('\n');
        push_tree(&mut output, "Source Files", &fields.source_files);

        output
    }
}

fn push_tree(output: &mut String, title: &str, entries: &[String]) {
    output.push_str(&format!("{} ({}):\n", title, entries.len()));
    if entries.is_empty() {
        output.push_str("\u{2514}\u{2500} (none)\n");
        return;
    }
    for (i, entry) in entries.iter().enumerate() {
        let connector = if i == entries.len() - 1 {
            "\u{2514}"
        } else {
            "\u{251C}"
        };
        output.push_str(&format!("{}\u{2500} {}\n", connector, entry));
    }
}
