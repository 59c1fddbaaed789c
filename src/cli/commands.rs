use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CMake toolchain generation for Atmel START projects
#[derive(Parser, Debug)]
#[command(
    name = "atstart",
    about = "CMake toolchain generation for Atmel START projects",
    version,
    long_about = "atstart reads the GCC makefile of an Atmel START generated project and \
                  derives a CMake toolchain file from it: include directories, generated \
                  sources, linker script, CPU and device."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate a CMake toolchain file from the makefile",
        long_about = "Extracts the build settings from an Atmel START makefile and renders \
                      them into a CMake toolchain file.\n\n\
                      Examples:\n  \
                      atstart toolchain\n  \
                      atstart toolchain --makefile start/gcc/Makefile --output start/toolchain.cmake\n  \
                      atstart toolchain --template my-toolchain.cmake.hbs --stdout"
    )]
    Toolchain(ToolchainArgs),

    #[command(
        about = "Show the settings extracted from the makefile",
        long_about = "Prints include directories, sources, linker script, CPU and device \
                      as found in the makefile.\n\n\
                      Examples:\n  \
                      atstart inspect\n  \
                      atstart inspect --format json"
    )]
    Inspect(InspectArgs),

    #[command(
        about = "Initialize a CMake project",
        long_about = "Creates a src/ directory and a CMakeLists.txt that builds the user's \
                      sources together with the generated Atmel START code.\n\n\
                      Examples:\n  \
                      atstart init --name blinky\n  \
                      atstart init /path/to/project --name blinky"
    )]
    Init(InitArgs),

    #[command(
        about = "Show the effective configuration",
        long_about = "Prints the settings resolved from ATSTART_* environment variables \
                      and defaults.\n\n\
                      Examples:\n  \
                      atstart config\n  \
                      atstart config --format yaml"
    )]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct ToolchainArgs {
    #[arg(
        short = 'm',
        long,
        value_name = "FILE",
        help = "Makefile to read (default: atstart/gcc/Makefile)"
    )]
    pub makefile: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Toolchain file to write (default: atstart/toolchain.cmake)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 't',
        long,
        value_name = "FILE",
        help = "Handlebars template to use instead of the built-in one"
    )]
    pub template: Option<PathBuf>,

    #[arg(long, conflicts_with = "output", help = "Print the toolchain to stdout")]
    pub stdout: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct InspectArgs {
    #[arg(
        short = 'm',
        long,
        value_name = "FILE",
        help = "Makefile to read (default: atstart/gcc/Makefile)"
    )]
    pub makefile: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    #[arg(
        value_name = "DIR",
        help = "Project directory (defaults to current directory)"
    )]
    pub directory: Option<PathBuf>,

    #[arg(short = 'n', long, value_name = "NAME", help = "CMake project name")]
    pub name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
