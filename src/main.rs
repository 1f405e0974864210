use clap::Parser;
use shirasagi::server::{build_server, load_config, LaunchFlags};
use std::path::PathBuf;

/// Shirasagi - on-demand image delivery built with Cloudflare's Pingora
#[derive(Parser, Debug)]
#[command(name = "shirasagi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Upgrade workers gracefully
    #[arg(long)]
    upgrade: bool,
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Load and validate configuration from file
    let config = load_config(&args.config).unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    let flags = LaunchFlags {
        daemon: args.daemon,
        test: args.test,
        upgrade: args.upgrade,
    };

    let server = build_server(&config, flags).unwrap_or_else(|e| {
        eprintln!("Failed to start server: {}", e);
        std::process::exit(1);
    });

    tracing::info!(
        config_file = %args.config.display(),
        "Configuration loaded successfully"
    );

    // Run server forever (blocks until shutdown)
    server.run_forever();
}
