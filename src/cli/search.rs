//! Search command handler
//!
//! Lists geocoder suggestions for a query, or resolves one of them.

use crate::cli::print_location;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, GeoBackend};
use crate::location::SelectionResolver;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Free-text place query
    pub query: String,

    /// Resolve the Nth suggestion (1-based) instead of listing them
    #[arg(long, short = 'p')]
    pub pick: Option<usize>,

    /// Maximum number of suggestions
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    let config = Config::load()?;
    let query = args.query.trim();
    if query.is_empty() {
        return Err(Error::Geocoding("Query must not be empty".to_string()));
    }

    let geocoder = get_geocoder(&config.geocoder)?;
    let limit = args.limit.unwrap_or(config.geocoder.suggestion_limit);
    let suggestions = geocoder.search(query, limit).await?;

    match args.pick {
        Some(n) => {
            let candidate = n
                .checked_sub(1)
                .and_then(|i| suggestions.get(i))
                .ok_or_else(|| {
                    Error::Geocoding(format!(
                        "No suggestion #{} for '{}' ({} found)",
                        n,
                        query,
                        suggestions.len()
                    ))
                })?;
            let resolver = SelectionResolver::new(config.resolver.city_overrides.clone());
            print_location(&resolver.resolve(candidate), args.json)
        }
        None if args.json => {
            println!("{}", serde_json::to_string_pretty(&suggestions)?);
            Ok(())
        }
        None => {
            if suggestions.is_empty() {
                println!("No places found for '{}'", query);
            }
            for (i, candidate) in suggestions.iter().enumerate() {
                println!(
                    "{:>2}. {} ({:.4}, {:.4})",
                    i + 1,
                    candidate.display_name,
                    candidate.latitude,
                    candidate.longitude
                );
            }
            Ok(())
        }
    }
}
