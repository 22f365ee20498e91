mod commands;

use ascode_core::{AscodeConfig, DistroFactory};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{exit_code_for, EXIT_FAILURE};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "ascode",
    version,
    about = "Inspect distro-as-code definitions and synthesize image manifests"
)]
struct Cli {
    /// Configuration file (default: ~/.config/ascode/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory holding one subdirectory per distribution.
    #[arg(long, global = true)]
    defs: Option<PathBuf>,

    /// Manifest tool backend: osbuild-mpp or mock.
    #[arg(long, global = true)]
    tool: Option<String>,

    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List distributions under the definitions root.
    Distros,
    /// List the architectures a distribution defines image types for.
    Arches {
        /// Distribution name, e.g. fedorang-39.
        distro: String,
    },
    /// List image types for one architecture of a distribution.
    ImageTypes { distro: String, arch: String },
    /// Show everything an image type definition declares.
    Inspect {
        distro: String,
        arch: String,
        image_type: String,
    },
    /// Synthesize the final manifest for an image type.
    Manifest {
        distro: String,
        arch: String,
        image_type: String,
        /// Blueprint TOML file with packages and customizations.
        #[arg(long)]
        blueprint: Option<PathBuf>,
        /// Write the manifest here instead of standard output.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run diagnostic checks on configuration, definitions and tooling.
    Doctor,
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("ASCODE_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let result = resolve_config(&cli).and_then(|config| dispatch(cli, &config));

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(exit_code_for(&msg))
        }
    }
}

fn resolve_config(cli: &Cli) -> Result<AscodeConfig, String> {
    let mut config = match &cli.config {
        Some(path) => AscodeConfig::load(path),
        None => AscodeConfig::load_default(),
    }
    .map_err(|e| e.to_string())?;

    if let Some(defs) = &cli.defs {
        config.defs_dir.clone_from(defs);
    }
    if let Some(tool) = &cli.tool {
        config.tool.backend.clone_from(tool);
    }
    tracing::debug!(
        "definitions root {}, tool backend {}",
        config.defs_dir.display(),
        config.tool.backend
    );
    Ok(config)
}

fn dispatch(cli: Cli, config: &AscodeConfig) -> Result<u8, String> {
    let json = cli.json;

    let factory = || DistroFactory::from_config(config).map_err(|e| e.to_string());

    if matches!(cli.command, Commands::Manifest { .. })
        && std::env::var("ASCODE_SKIP_PREREQS").as_deref() != Ok("1")
        && !factory()?.tool().available()
    {
        let missing = ascode_runtime::check_tool_prereqs(&config.tool.binary);
        eprintln!("error: {}", ascode_runtime::format_missing(&missing));
        return Ok(EXIT_FAILURE);
    }

    match cli.command {
        Commands::Distros => commands::distros::run(&factory()?, json),
        Commands::Arches { distro } => commands::arches::run(&factory()?, &distro, json),
        Commands::ImageTypes { distro, arch } => {
            commands::image_types::run(&factory()?, &distro, &arch, json)
        }
        Commands::Inspect {
            distro,
            arch,
            image_type,
        } => commands::inspect::run(&factory()?, &distro, &arch, &image_type, json),
        Commands::Manifest {
            distro,
            arch,
            image_type,
            blueprint,
            output,
        } => commands::manifest::run(
            &factory()?,
            &commands::manifest::Target {
                distro: &distro,
                arch: &arch,
                image_type: &image_type,
            },
            blueprint.as_deref(),
            output.as_deref(),
            json,
        ),
        Commands::Doctor => commands::doctor::run(config, json),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    }
}
