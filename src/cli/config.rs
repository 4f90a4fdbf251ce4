//! Config command handler
//!
//! View and modify configuration settings.

use crate::config::Config;
use crate::error::{Error, Result};
use clap::Args;

/// Config command arguments
#[derive(Args)]
pub struct ConfigArgs {
    /// Configuration key (e.g., "search.debounce_ms")
    pub key: Option<String>,

    /// Value to set (if not provided, shows current value)
    pub value: Option<String>,

    /// Show config file path
    #[arg(long)]
    pub path: bool,

    /// Reset config to defaults
    #[arg(long)]
    pub reset: bool,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    if args.path {
        let path = Config::config_path()?;
        println!("{}", path.display());
        return Ok(());
    }

    if args.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        return Ok(());
    }

    let mut config = Config::load()?;

    match (&args.key, &args.value) {
        // No arguments: show all config
        (None, None) => {
            show_all_config(&config);
        }

        // Key only: show that value
        (Some(key), None) => {
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                let keys = Config::available_keys().join("\n  ");
                return Err(Error::Config(format!(
                    "Unknown config key: {}\n\nAvailable keys:\n  {}",
                    key, keys
                )));
            }
        }

        // Key and value: set the value
        (Some(key), Some(value)) => {
            config.set(key, value)?;
            config.save()?;
            println!("{} = {}", key, value);
        }

        // Value without key: not valid
        (None, Some(_)) => {
            return Err(Error::Config("Must specify a key to set a value".to_string()));
        }
    }

    Ok(())
}

/// Display all configuration values
fn show_all_config(config: &Config) {
    println!("[geocoder]");
    println!("base_url = \"{}\"", config.geocoder.base_url);
    println!("user_agent = \"{}\"", config.geocoder.user_agent);
    println!("suggestion_limit = {}", config.geocoder.suggestion_limit);
    println!();

    println!("[search]");
    println!("debounce_ms = {}", config.search.debounce_ms);
    println!();

    println!("[map]");
    println!("initial_zoom = {}", config.map.initial_zoom);
    println!("recenter_zoom = {}", config.map.recenter_zoom);
    println!("selection_zoom = {}", config.map.selection_zoom);
    println!("default_lat = {}", config.map.default_lat);
    println!("default_lng = {}", config.map.default_lng);
    println!();

    println!("[session]");
    println!("backend_url = \"{}\"", config.session.backend_url);
    println!();

    println!("[server]");
    println!("host = \"{}\"", config.server.host);
    println!("port = {}", config.server.port);

    for rule in &config.resolver.city_overrides {
        println!();
        println!("[[resolver.city_overrides]]");
        println!("city = \"{}\"", rule.city);
        let predicates = [
            ("subdivision_code", &rule.subdivision_code),
            ("state", &rule.state),
            ("display_name_contains", &rule.display_name_contains),
        ];
        for (name, value) in predicates {
            if let Some(value) = value {
                println!("{} = \"{}\"", name, value);
            }
        }
    }
}
