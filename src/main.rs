use atstart::cli::commands::{CliArgs, Commands, ConfigArgs, InitArgs, InspectArgs, ToolchainArgs};
use atstart::cli::output::OutputFormatter;
use atstart::config::AtstartConfig;
use atstart::toolchain::{write_cmake_toolchain, ToolchainError, ToolchainRenderer};
use atstart::util::logging::{init_logging, parse_level, LoggingConfig};
use atstart::{Makefile, NAME, VERSION};

use clap::Parser;
use std::env;
use std::process;
use tracing::{debug, error, info, Level};

fn main() {
    let args = CliArgs::parse();
    let config = AtstartConfig::default();
    init_logging_from_args(&args, &config);

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let exit_code = match &args.command {
        Commands::Toolchain(toolchain_args) => handle_toolchain(toolchain_args, config),
        Commands::Inspect(inspect_args) => handle_inspect(inspect_args, config),
        Commands::Init(init_args) => handle_init(init_args),
        Commands::Config(config_args) => handle_config(config_args, &config),
    };

    process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs, config: &AtstartConfig) {
    let level = if let Some(level_str) = &args.log_level {
        parse_level(level_str)
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::ERROR
    } else {
        parse_level(&config.log_level)
    };

    init_logging(LoggingConfig::with_level(level));
}

fn handle_toolchain(args: &ToolchainArgs, config: AtstartConfig) -> i32 {
    let config = AtstartConfig {
        makefile: args.makefile.clone().unwrap_or(config.makefile),
        toolchain: args.output.clone().unwrap_or(config.toolchain),
        template: args.template.clone().or(config.template),
        ..config
    };
    if let Err(e) = config.validate() {
        error!("{}", e);
        return 1;
    }

    let template = match config.load_template() {
        Ok(template) => template,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };
    let renderer = match ToolchainRenderer::with_template(&template) {
        Ok(renderer) => renderer,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    if args.stdout {
        let result = Makefile::from_path(&config.makefile)
            .map_err(ToolchainError::from)
            .and_then(|makefile| makefile.generate_cmake_toolchain(&renderer));
        return match result {
            Ok(toolchain) => {
                print!("{}", toolchain);
                0
            }
            Err(e) => {
                error!("{}", e);
                1
            }
        };
    }

    info!(
        "Generating {} from {}",
        config.toolchain.display(),
        config.makefile.display()
    );
    match write_cmake_toolchain(&config.makefile, &config.toolchain, &renderer) {
        Ok(()) => 0,
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

fn handle_inspect(args: &InspectArgs, config: AtstartConfig) -> i32 {
    let makefile_path = args.makefile.clone().unwrap_or(config.makefile);

    let fields = match Makefile::from_path(&makefile_path).and_then(|m| m.fields()) {
        Ok(fields) => fields,
        Err(e) => {
            error!("{}", e);
            return 1;
        }
    };

    match OutputFormatter::new(args.format.into()).format(&fields) {
        Ok(output) => {
            println!("{}", output.trim_end());
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}

fn handle_init(args: &InitArgs) -> i32 {
    let directory = match args.directory.clone() {
        Some(directory) => directory,
        None => match env::current_dir() {
            Ok(directory) => directory,
            Err(e) => {
                error!("Failed to get current directory: {}", e);
                return 1;
            }
        },
    };

    if !directory.is_dir() {
        error!(
            "Project directory does not exist: {}",
            directory.display()
        );
        return 1;
    }

    match atstart::init(&directory, &args.name) {
        Ok(report) => {
            info!("Generated {}", report.cmakelists.display());
            0
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

fn handle_config(args: &ConfigArgs, config: &AtstartConfig) -> i32 {
    match OutputFormatter::new(args.format.into()).format_config(config) {
        Ok(output) => {
            println!("{}", output.trim_end());
            0
        }
        Err(e) => {
            error!("Failed to format output: {:#}", e);
            1
        }
    }
}
