use parcel_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        web_port = config.server.web_port,
        bind = %config.server.bind_address,
        database = %config.database.path,
        cache = if config.cache.url.is_some() { "redis" } else { "memory" },
        fallback = ?config.resolution.fallback,
        "Configuration loaded"
    );

    Ok(config)
}
