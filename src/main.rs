//! Primer - project-aware context composition
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use primer::config::{primer_home, Config};
use primer::engine::Primer;
use primer::error::exit_codes;

// =============================================================================
// CLI Definition
// =============================================================================

/// Primer - compose project-aware instructions from detected markers
#[derive(Parser)]
#[command(name = "primer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project directory to inspect (defaults to the current directory)
    #[arg(long, short, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect, apply overrides, and print the composed document
    Compose {
        /// Output the full result as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress the summary on stderr
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show matched rules and activated modules
    Detect {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List the effective rule table
    Rules {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// List available modules and the layer providing each
    Modules {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Scaffold .primer/ in the project directory
    Init {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
        /// Overwrite an existing overrides file
        #[arg(long, short)]
        force: bool,
    },
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    setup_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("primer error: {}", e);
            ExitCode::from(exit_codes::FAILURE as u8)
        }
    }
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.primer/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("primer panic: {}", info);

        if let Some(home) = primer_home() {
            let _ = std::fs::create_dir_all(&home);
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Install the stderr subscriber, filtered by `PRIMER_LOG` (default `warn`).
fn setup_logging() {
    let filter = EnvFilter::try_from_env("PRIMER_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let target = match cli.dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Compose { json, quiet } => run_compose(json, quiet, &target),
        Commands::Detect { json, quiet } => run_detect(json, quiet, &target),
        Commands::Rules { json, quiet } => run_rules(json, quiet, &target),
        Commands::Modules { json, quiet } => run_modules(json, quiet, &target),
        Commands::Init { json, quiet, force } => run_init(json, quiet, force, &target),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Build the pipeline, or report the configuration error and its exit code.
fn load_primer(target: &Path) -> Result<Primer, ExitCode> {
    let config = Config::load_from_dir(target);
    Primer::from_config(&config, target).map_err(|e| {
        eprintln!("primer error: {}", e);
        ExitCode::from(exit_codes::CONFIG_ERROR as u8)
    })
}

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::FAILURE as u8)
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        println!("{}", formatted.trim_end_matches('\n'));
    }
}

fn run_compose(
    json: bool,
    quiet: bool,
    target: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use primer::cli::compose_cmd::{ComposeCommand, ComposeOptions};

    let primer = match load_primer(target) {
        Ok(primer) => primer,
        Err(code) => return Ok(code),
    };

    let cmd = ComposeCommand::new(&primer, target);
    let options = ComposeOptions { json, quiet };

    let output = cmd.run(&options);
    if !quiet {
        eprintln!("{}", cmd.format_summary(&output));
    }
    cmd.write_output(&output, &options, &mut std::io::stdout().lock())?;

    Ok(success_to_exit_code(output.success))
}

fn run_detect(
    json: bool,
    quiet: bool,
    target: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use primer::cli::detect_cmd::{DetectCommand, DetectOptions};

    let primer = match load_primer(target) {
        Ok(primer) => primer,
        Err(code) => return Ok(code),
    };

    let cmd = DetectCommand::new(primer.detector(), target);
    let options = DetectOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_rules(
    json: bool,
    quiet: bool,
    target: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use primer::cli::rules_cmd::{RulesCommand, RulesOptions};

    let primer = match load_primer(target) {
        Ok(primer) => primer,
        Err(code) => return Ok(code),
    };

    let cmd = RulesCommand::new(primer.rules());
    let options = RulesOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_modules(
    json: bool,
    quiet: bool,
    target: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use primer::cli::modules_cmd::{ModulesCommand, ModulesOptions};

    let primer = match load_primer(target) {
        Ok(primer) => primer,
        Err(code) => return Ok(code),
    };

    let cmd = ModulesCommand::new(primer.store());
    let options = ModulesOptions { json, quiet };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_init(
    json: bool,
    quiet: bool,
    force: bool,
    target: &Path,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    use primer::cli::init::{InitCommand, InitOptions};

    let cmd = InitCommand::new(target);
    let options = InitOptions { json, quiet, force };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}
