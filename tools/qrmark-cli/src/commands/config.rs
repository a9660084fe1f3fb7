//! Show or initialize the configuration file.

use qrmark_common::config::{config_file_path, AppConfig};

pub fn run(config: AppConfig, init: bool) -> anyhow::Result<()> {
    if init {
        let path = AppConfig::default().save()?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    println!("# {}", config_file_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
