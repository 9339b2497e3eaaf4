//! `lookout doctor`: diagnose config, camera, and relay.

use lookout_config::AppConfig;
use lookout_providers::{FileCamera, HttpRelay};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Lookout Doctor, System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults (run `lookout onboard`)");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running other checks.");
            return Ok(());
        }
    };

    match &config.camera.frames {
        Some(path) => match FileCamera::open(path) {
            Ok(camera) => println!("  ✅ Camera: {} frame(s) at {}", camera.frame_count(), path.display()),
            Err(e) => {
                println!("  ❌ Camera: {e}");
                issues += 1;
            }
        },
        None => {
            println!("  ⚠️  No camera frames configured, pass --frames to find/ask");
            issues += 1;
        }
    }

    let relay = HttpRelay::from_config(&config.relay);
    match relay.health_check().await {
        Ok(message) => println!("  ✅ Relay at {}: {message}", relay.base_url()),
        Err(e) => {
            println!("  ❌ Relay at {} unreachable: {e}", relay.base_url());
            issues += 1;
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
