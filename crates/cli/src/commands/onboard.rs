//! `lifexia onboard`: Write the default configuration.

use super::config_file;
use lifexia_config::AppConfig;
use std::path::Path;

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let path = config_file(config_path);

    println!("Lifexia — First-Time Setup");
    println!("==========================\n");

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
            println!("✅ Created config directory: {}", dir.display());
        }
    }

    if path.exists() {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", path.display());
    println!("\n📝 Next steps:");
    println!("   1. Start Ollama and pull the model named in [generation]");
    println!("   2. Run: lifexia doctor");
    println!("   3. Run: lifexia chat --user <your-name>\n");

    Ok(())
}
