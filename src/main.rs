//! Atipicidades - patient, staff and unit registration.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eframe::egui;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use atipicidades as app;

use app::client::ApiClient;
use app::config::{AppConfig, ConfigLoadResult};

/// Patient, staff and unit registration for the Atipicidades care organization.
#[derive(Parser)]
#[command(name = "atipicidades", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Explicit config file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Run the HTTP backend
    Serve,
    /// Open the desktop client (default)
    App,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::App);

    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let config = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => config,
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            // First run of the client leaves an editable file behind
            if command == Command::App
                && let Err(e) = config.save(&config_path)
            {
                eprintln!("Failed to write default config to {}: {e}", config_path.display());
            }
            config
        }
        ConfigLoadResult::Invalid(e) => {
            eprintln!("Invalid config {}: {e}", config_path.display());
            return ExitCode::FAILURE;
        }
    };

    let log_dir = match command {
        Command::Serve => config.logging.directory.as_deref(),
        Command::App => None,
    };
    let _guard = init_logging(log_dir);
    tracing::info!("Config path: {:?}", config_path);

    let result = match command {
        Command::Serve => run_server(config),
        Command::App => run_client(config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Console logging, plus a daily-rotated file when `log_dir` is set.
fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    match log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "atipicidades.log"));
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
            None
        }
    }
}

fn run_server(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Atipicidades backend starting...");
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(app::server::run(config))
}

fn run_client(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Atipicidades client starting (API {})", config.client.api_url);

    let rt = tokio::runtime::Runtime::new()?;
    let client = ApiClient::from_config(&config.client)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Atipicidades")
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Atipicidades",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(app::ui::App::new(client, rt)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
