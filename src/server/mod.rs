// Server module - Pingora HTTP server setup and configuration

use pingora::server::configuration::Opt as ServerOpt;
use pingora::server::Server;
use std::path::Path;

use crate::assets::AssetService;
use crate::config::Config;
use crate::error::StartupError;
use crate::logging::init_subscriber;
use crate::origin::build_origin;
use crate::proxy::AssetProxy;

/// Command-line switches forwarded to Pingora
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LaunchFlags {
    pub daemon: bool,
    pub test: bool,
    pub upgrade: bool,
}

impl LaunchFlags {
    /// Pingora server options for these flags
    pub fn server_opt(&self) -> ServerOpt {
        ServerOpt {
            daemon: self.daemon,
            test: self.test,
            upgrade: self.upgrade,
            ..Default::default()
        }
    }
}

/// Read and validate the configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, StartupError> {
    let config = Config::from_file(path).map_err(StartupError::Config)?;
    config.validate().map_err(StartupError::Config)?;
    Ok(config)
}

/// Build a ready-to-run Pingora server serving assets per `config`
///
/// Installs the logging subscriber, constructs the origin store and
/// registers the proxy service on `server.address:server.port`.
pub fn build_server(config: &Config, flags: LaunchFlags) -> Result<Server, StartupError> {
    init_subscriber(&config.logging).map_err(|e| StartupError::Logging(e.to_string()))?;

    let origin = build_origin(&config.origin).map_err(StartupError::Origin)?;
    tracing::info!(
        origin = origin.name(),
        route_prefix = %config.server.route_prefix,
        fetch_timeout_ms = config.origin.fetch_timeout_ms,
        "Origin store ready"
    );

    let service = AssetService::from_config(config, origin);

    let mut server =
        Server::new(Some(flags.server_opt())).map_err(|e| StartupError::Server(e.to_string()))?;
    server.bootstrap();

    let mut proxy_service =
        pingora_proxy::http_proxy_service(&server.configuration, AssetProxy::new(service));
    proxy_service.threads = Some(config.server.threads);

    let listen_addr = config.server.listen_addr();
    proxy_service.add_tcp(&listen_addr);

    tracing::info!(
        address = %listen_addr,
        threads = config.server.threads,
        "Starting Shirasagi asset server"
    );

    server.add_service(proxy_service);
    Ok(server)
}
