use clap::{Parser, Subcommand};
use linkdoctor::cli::{self, ValidateOptions};
use linkdoctor::settings::{Settings, load_settings};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = linkdoctor::APP_NAME)]
#[command(version = linkdoctor::VERSION)]
#[command(about = "Check an Android app's deep-link integration against its dashboard settings", long_about = None)]
struct Cli {
    /// Settings file (default: ~/.config/linkdoctor/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the integration checklist against a package
    Validate {
        /// APK file, or a build output directory containing one
        apk: PathBuf,

        /// Use a saved dashboard config (JSON) instead of fetching it
        #[arg(long)]
        dashboard: Option<PathBuf>,

        /// Key to use instead of the one declared in the package
        #[arg(long)]
        branch_key: Option<String>,

        /// Check with the test key
        #[arg(long)]
        test_mode: bool,

        /// Dashboard API base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Write the JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write the JSON report to the reports directory
        #[arg(long)]
        save_report: bool,
    },
    /// Print the deep-link schemes a package declares
    Schemes {
        /// APK file, or a build output directory containing one
        apk: PathBuf,
    },
    /// Escape link parameters and tag them with their source
    Sanitize {
        /// JSON file (default: stdin)
        input: Option<PathBuf>,

        /// Remove these keys first
        #[arg(long)]
        strip: Vec<String>,

        /// Print the escaped object only
        #[arg(long)]
        raw: bool,
    },
    /// Show tool info, or what a package declares
    Info {
        /// APK file, or a build output directory containing one
        apk: Option<PathBuf>,
    },
    /// Show or create the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Write default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("[{}] Error: {}", linkdoctor::APP_NAME, e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut settings: Settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate {
            apk,
            dashboard,
            branch_key,
            test_mode,
            api_url,
            report,
            save_report,
        } => {
            if let Some(key) = branch_key {
                settings.branch_key = Some(key);
            }
            if let Some(url) = api_url {
                settings.api_url = url;
            }
            settings.debug |= test_mode;

            let options = ValidateOptions {
                apk,
                config_file: dashboard,
                report,
                save_report,
            };
            let report = cli::validate_app(&options, &settings)?;
            if report.passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Commands::Schemes { apk } => {
            cli::show_schemes(&apk, &settings)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Sanitize { input, strip, raw } => {
            cli::sanitize_params(input.as_deref(), &strip, raw)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Info { apk } => {
            match apk {
                Some(apk) => cli::show_app_info(&apk, &settings)?,
                None => cli::show_tool_info(&settings)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => cli::show_config(&settings)?,
                ConfigAction::Init { force } => cli::init_config(cli.config.as_deref(), force)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
