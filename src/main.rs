/// Pre-commit guard.
/// Blocks commits that stage files under protected paths and rejects
/// newly added console/print/log statements. With `--fix` the statements
/// are stripped from the working files and the files are re-staged instead.
use anyhow::Result;
use clap::{Parser, Subcommand};
use commit_guard::core::config::ConfigProvider;
use commit_guard::core::engine::Mode;
use commit_guard::utils;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "commit-guard")]
#[command(about = "A pre-commit guard for protected paths and stray debug statements")]
struct Cli {
    /// Remove matching lines from the staged files and re-stage them
    #[arg(long)]
    fix: bool,

    /// Print internal diagnostics
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default commit-guard.toml for this repository
    Init,
    /// Install the pre-commit hook
    InstallHook {
        /// Make the hook run in fix mode
        #[arg(long)]
        fix: bool,
    },
    /// Check commit-guard.toml for problems
    Validate,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            init_logging(cli.verbose);
            utils::initialize_repository()?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::InstallHook { fix }) => {
            init_logging(cli.verbose);
            utils::install_hooks(fix)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Validate) => {
            init_logging(cli.verbose);
            utils::validate_config()?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            let config_manager = utils::get_config_manager()?;
            let config = config_manager.load_config()?;
            init_logging(cli.verbose || config.global_settings.verbose);
            log::debug!("{}", config_manager.describe_source());

            let mode = if cli.fix { Mode::Fix } else { Mode::Scan };
            let outcome = utils::run_guard(config_manager.get_repo_root(), &config, mode)?;
            Ok(ExitCode::from(outcome.exit_code()))
        }
    }
}
