use clap::Subcommand;
use classroll_core::Config;

use crate::plan::Context;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "policy.missing_semester", "upcoming.default_count")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(ctx: &Context, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = ctx.config()?;
            let value = config.get(&key).ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = ctx.config()?;
            config.set(&key, &value)?;
            ctx.save_config(&config)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = ctx.config()?;
            let json = serde_json::to_string_pretty(&config)?;
            println!("{json}");
        }
        ConfigAction::Reset => {
            let config = Config::default();
            ctx.save_config(&config)?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
