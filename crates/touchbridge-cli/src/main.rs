//! touchbridge CLI: remote touch, key and mouse injection over TCP.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use touchbridge_daemon::{Config, DaemonError, Dispatcher, Server, ShellSystem};
use touchbridge_input::{DeviceRegistry, InputInjector};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "touchbridge",
    about = "Inject remote touch, key and mouse input into local devices",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory scanned for input devices.
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover devices and serve control connections.
    Serve {
        /// TCP port to listen on.
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind.
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List discovered input devices and the touch calibration.
    Devices,

    /// Print the default configuration as TOML.
    DefaultConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (mut config, source) = match touchbridge_daemon::setup::load_config(cli.config.as_deref())
    {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("touchbridge: {e}");
            return ExitCode::from(e.exit_code());
        }
    };
    if let Some(dir) = cli.input_dir {
        config.devices.input_dir = dir;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.daemon.log_level)),
        )
        .init();

    match &source {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => info!("no config file found, using defaults"),
    }

    let result = match cli.command {
        Commands::Serve { port, bind } => {
            if let Some(port) = port {
                config.daemon.port = port;
            }
            if let Some(bind) = bind {
                config.daemon.bind = bind;
            }
            serve(&config)
        }
        Commands::Devices => list_devices(&config),
        Commands::DefaultConfig => print_default_config(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            ExitCode::from(e.exit_code())
        }
    }
}

fn serve(config: &Config) -> Result<(), DaemonError> {
    info!(input_dir = %config.devices.input_dir.display(), "starting touchbridge");

    let mut registry = DeviceRegistry::scan(config.registry())?;
    if let Err(e) = registry.enable_hotplug() {
        warn!(error = %e, "hot-plug disabled");
    }
    let system = ShellSystem::new(config.system.clone());
    let dispatcher = Dispatcher::new(
        Box::new(registry),
        Box::new(system),
        config.system.default_keyevent,
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| DaemonError::Other(e.into()))?;

    runtime.block_on(async {
        let server = Server::bind(&config.daemon, dispatcher)?;
        tokio::select! {
            result = server.run() => result,
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                Ok(())
            }
        }
    })
}

fn list_devices(config: &Config) -> Result<(), DaemonError> {
    let registry = DeviceRegistry::scan(config.registry())?;
    for device in registry.devices() {
        let id = &device.identity;
        println!(
            "{}\t{}\t{:?}\tbus {:04x} vendor {:04x} product {:04x}{}",
            device.path.display(),
            device.role,
            id.name,
            id.bus,
            id.vendor,
            id.product,
            if device.is_writable() { "" } else { "\t(read-only)" },
        );
    }
    if let Some(calibration) = registry.touch_calibration() {
        for (label, axis) in [
            ("x", calibration.x),
            ("y", calibration.y),
            ("pressure", calibration.pressure),
        ] {
            println!(
                "{label}: min {} max {} fuzz {} flat {} resolution {}",
                axis.minimum, axis.maximum, axis.fuzz, axis.flat, axis.resolution
            );
        }
    }
    Ok(())
}

fn print_default_config() -> Result<(), DaemonError> {
    let text = toml::to_string_pretty(&Config::default()).map_err(anyhow::Error::from)?;
    print!("{text}");
    Ok(())
}
