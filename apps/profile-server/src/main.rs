use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use modkit::{Module, ModuleCtx, RestfulModule};
use runtime::{AppConfig, AppConfigProvider, CliArgs};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use api_ingress::{ApiIngress, ApiIngressConfig};
use users_info::config::UsersInfoConfig;
use users_info::UsersInfo;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Adapter to make AppConfigProvider implement modkit::ConfigProvider
struct ModkitConfigAdapter(Arc<AppConfigProvider>);

impl modkit::ConfigProvider for ModkitConfigAdapter {
    fn get_module_config(&self, module_name: &str) -> Option<&serde_json::Value> {
        self.0.get_module_config(module_name)
    }
}

/// Profile Server - users with discriminated profile fields
#[derive(Parser)]
#[command(name = "profile-server")]
#[command(about = "Profile Server - users with discriminated profile fields")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity)
    config.apply_cli_overrides(&args);

    // Initialize logging
    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Profile Server starting");
    tracing::debug!(server = ?config.server, "Effective server configuration");

    // Print config and exit if requested
    if args.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

fn parse_bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let raw = config.server.bind_addr();
    raw.parse()
        .with_context(|| format!("invalid bind address '{raw}'"))
}

async fn run_server(config: AppConfig) -> Result<()> {
    let addr = parse_bind_addr(&config)?;
    let drain_deadline =
        (config.server.timeout_sec > 0).then(|| Duration::from_secs(config.server.timeout_sec));

    tracing::info!("Initializing modules...");
    let cancel = CancellationToken::new();

    // Provide module configs to modkit
    let config_provider = Arc::new(ModkitConfigAdapter(Arc::new(AppConfigProvider::new(
        config,
    ))));
    let base_ctx = ModuleCtx::new(cancel.clone()).with_config_provider(config_provider);

    let ingress = ApiIngress::default();
    ingress
        .init(&base_ctx.clone().for_module(api_ingress::MODULE_NAME))
        .await?;

    let users = UsersInfo::default();
    let users_ctx = base_ctx.for_module(users_info::MODULE_NAME);
    users.init(&users_ctx).await?;

    // REST phase: modules contribute routes, the host wraps and finalizes them
    let routes = users.register_rest(&users_ctx, axum::Router::new(), &ingress)?;
    let router = ingress.build_router(routes)?;

    let mut server = tokio::spawn(api_ingress::serve(addr, router, cancel.clone()));

    tokio::select! {
        res = &mut server => {
            // Server stopped on its own (e.g. bind failure)
            cancel.cancel();
            return res.context("HTTP server task failed")?;
        }
        res = modkit::shutdown::wait_for_shutdown(cancel.clone()) => res?,
    }

    tracing::info!("Waiting for in-flight requests to finish");
    let drained = match drain_deadline {
        Some(deadline) => tokio::time::timeout(deadline, server)
            .await
            .context("graceful shutdown deadline exceeded")?,
        None => server.await,
    };
    drained.context("HTTP server task failed")??;

    tracing::info!("Profile Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    parse_bind_addr(&config)?;

    // Module sections must deserialize strictly
    if let Some(v) = config.modules.get(api_ingress::MODULE_NAME) {
        serde_json::from_value::<ApiIngressConfig>(v.clone())
            .with_context(|| format!("invalid {} config", api_ingress::MODULE_NAME))?;
    }
    if let Some(v) = config.modules.get(users_info::MODULE_NAME) {
        serde_json::from_value::<UsersInfoConfig>(v.clone())
            .with_context(|| format!("invalid {} config", users_info::MODULE_NAME))?;
    }

    // AppConfig::load_* already normalized & created home_dir
    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);

    Ok(())
}
