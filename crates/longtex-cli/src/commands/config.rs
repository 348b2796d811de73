use anyhow::Result;
use longtex_core::Config;

/// Print the effective configuration as TOML.
pub fn show_config(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}
