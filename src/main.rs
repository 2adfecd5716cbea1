//! procmem-api
//!
//! HTTP API serving host process snapshots and per-process memory maps.
//! This is the main entry point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod handlers;
mod health_stats;
mod process;
mod startup_checks;
mod state;

use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use procmem_api::SystemIdentityResolver;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;

use cli::{Args, Commands};
use commands::{command_check, command_config, command_parse};
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_BIND_ADDR,
    DEFAULT_PORT,
};
use handlers::build_router;
use process::SignalTerminator;
use startup_checks::validate_requirements;
use state::AppState;

/// Initializes tracing logging subsystem with configured log level.
fn setup_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let log_level: LevelFilter = config.log_level.as_deref().unwrap_or("info").parse()?;

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Logging initialized with level: {}", log_level);
    Ok(())
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Resolves once either Ctrl+C or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format.clone());
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        match command {
            Commands::Config {
                output,
                format,
                commented,
            } => {
                return command_config(output.clone(), format.clone(), *commented);
            }
            Commands::Check => {
                let config = resolve_config(&args)?;
                if let Err(e) = setup_logging(&config) {
                    eprintln!("⚠️  Logging not initialized: {}", e);
                }
                return command_check(&config);
            }
            Commands::Parse { file, pid, compact } => {
                let config = load_validated_config(&args)?;
                if let Err(e) = command_parse(file.clone(), *pid, *compact, &config) {
                    eprintln!("❌ {:#}", e);
                    std::process::exit(1);
                }
                return Ok(());
            }
        }
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config)?;

    // Startup checks only warn; the service serves whatever it can read.
    if let Err(e) = validate_requirements(&config) {
        warn!("Startup requirement check failed: {}", e);
    }

    let bind_ip_str = config
        .bind
        .clone()
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
    let port = config.port.unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port).parse()?;

    let terminator = Arc::new(SignalTerminator::new(config.kill_signal()));
    info!(
        "Data sources: proc_root={}, ram_snapshot={}, cpu_snapshot={}, unit_divisor={}",
        config.proc_root().display(),
        config.ram_snapshot_path().display(),
        config.cpu_snapshot_path().display(),
        config.unit_divisor()
    );
    if config.enable_kill.unwrap_or(true) {
        info!("Process termination enabled (signal {})", terminator.signal());
    } else {
        info!("Process termination disabled");
    }

    let tls = match (
        config.enable_tls.unwrap_or(false),
        config.tls_cert_path.clone(),
        config.tls_key_path.clone(),
    ) {
        (true, Some(cert), Some(key)) => Some((cert, key)),
        (true, _, _) => {
            return Err("enable_tls requires tls_cert_path and tls_key_path".into());
        }
        (false, _, _) => None,
    };

    let state = Arc::new(AppState::new(
        config,
        Arc::new(SystemIdentityResolver),
        terminator,
    ));
    let app = build_router(state);

    if let Some((cert_path, key_path)) = tls {
        info!("Loading TLS certificate from: {}", cert_path);
        info!("Loading TLS private key from: {}", key_path);

        let tls_config = RustlsConfig::from_pem_file(&cert_path, &key_path)
            .await
            .map_err(|e| {
                error!("Failed to load TLS configuration: {}", e);
                e
            })?;

        info!("procmem-api listening on https://{}:{}", bind_ip_str, port);

        let server = axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service());

        tokio::select! {
            result = server => {
                if let Err(e) = result {
                    error!("Server error: {}", e);
                    return Err(e.into());
                }
            }
            _ = shutdown_signal() => {
                info!("Shutdown signal received, exiting...");
            }
        }
    } else {
        let listener = TcpListener::bind(addr).await?;
        info!("procmem-api listening on http://{}:{}", bind_ip_str, port);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                error!("Server error: {}", e);
                e
            })?;
    }

    info!("procmem-api stopped gracefully");
    Ok(())
}
