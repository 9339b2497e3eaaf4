//! `lookout serve`: start the HTTP relay gateway.

use lookout_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🔭 Lookout Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Vision backend: mock");
    println!("   Body limit: {} bytes", config.gateway.max_body_bytes);

    lookout_gateway::start(config).await?;

    Ok(())
}
