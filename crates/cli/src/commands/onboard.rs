//! `lookout onboard`: first-time setup.

use lookout_config::AppConfig;
use lookout_finder::{QUICK_SEARCHES, script};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🔭 Lookout, First-Time Setup");
    println!("============================\n");
    println!("  {}\n", script::WELCOME);

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Run: lookout serve          (relay gateway on port 3000)");
        println!("   2. Point [camera] frames at an image or folder of images");
        println!("   3. Run: lookout find {}\n", QUICK_SEARCHES[0]);
    }

    println!("🎉 Setup complete! Quick searches: {}\n", QUICK_SEARCHES.join(", "));

    Ok(())
}
