mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use quarry_core::DescriptorFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "quarry",
    version,
    about = "Assemble deterministic build descriptors from capability catalogs"
)]
struct Cli {
    /// Path to a catalog TOML file. Falls back to $QUARRY_CATALOG, then the built-in catalog.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

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
    /// Assemble a project descriptor from a request file and/or flags.
    Assemble {
        /// Path to a request TOML file.
        request: Option<PathBuf>,
        /// Runtime version pinned on `runtime:` artifacts.
        #[arg(long)]
        runtime_version: Option<String>,
        /// Override the catalog version used for the BOM import.
        #[arg(long)]
        catalog_version: Option<String>,
        /// Dependency token (repeatable), appended after the request file's.
        #[arg(short = 'd', long = "dependency")]
        dependencies: Vec<String>,
        /// Repository spec (repeatable), appended after the request file's.
        #[arg(short = 'r', long = "repository")]
        repositories: Vec<String>,
        /// Descriptor format: json or toml.
        #[arg(long)]
        format: Option<DescriptorFormat>,
        /// Write the descriptor to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show how a single capability expands.
    Resolve {
        /// Capability name, with or without the `runtime:` prefix.
        capability: String,
        /// Runtime version pinned on runtime artifacts.
        #[arg(long)]
        runtime_version: Option<String>,
    },
    /// List the runtimes and components of the catalog.
    Catalog,
    /// Parse a repository spec and show the resulting entry.
    Repository {
        /// Spec of the form `<url>[@id=<id>][@snapshots][@noreleases]...`.
        spec: String,
    },
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
            || msg.contains("broken pipe")
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
            tracing_subscriber::EnvFilter::try_from_env("QUARRY_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let catalog_path = cli.catalog.as_deref();
    let result = match cli.command {
        Commands::Assemble {
            request,
            runtime_version,
            catalog_version,
            dependencies,
            repositories,
            format,
            output,
        } => commands::load_catalog(catalog_path).and_then(|catalog| {
            commands::assemble::run(
                &catalog,
                &commands::assemble::AssembleOptions {
                    request,
                    runtime_version,
                    catalog_version,
                    dependencies,
                    repositories,
                    format,
                    output,
                },
                json_output,
            )
        }),
        Commands::Resolve {
            capability,
            runtime_version,
        } => commands::load_catalog(catalog_path).and_then(|catalog| {
            commands::resolve::run(
                &catalog,
                &capability,
                runtime_version.as_deref(),
                json_output,
            )
        }),
        Commands::Catalog => commands::load_catalog(catalog_path)
            .and_then(|catalog| commands::catalog::run(&catalog, json_output)),
        Commands::Repository { spec } => commands::repository::run(&spec, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(commands::exit_code_for(&msg))
        }
    }
}
