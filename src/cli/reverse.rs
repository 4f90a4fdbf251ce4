//! Reverse command handler

use crate::cli::print_location;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::geo::{get_geocoder, Coordinates, GeoBackend};
use crate::location::{ResolvedLocation, SelectionResolver};
use clap::Args;

/// Reverse command arguments
#[derive(Args)]
pub struct ReverseArgs {
    /// Latitude
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the reverse command
pub async fn run(args: ReverseArgs) -> Result<()> {
    let config = Config::load()?;
    let coords = Coordinates::new(args.lat, args.lng);
    coords.validate()?;

    let geocoder = get_geocoder(&config.geocoder)?;
    let resolver = SelectionResolver::new(config.resolver.city_overrides.clone());

    let location = lookup(&geocoder, &resolver, coords).await?;
    print_location(&location, args.json)
}

/// Reverse geocode `coords`, keeping geocoder failures distinct from "no address"
async fn lookup<B: GeoBackend>(
    geocoder: &B,
    resolver: &SelectionResolver,
    coords: Coordinates,
) -> Result<ResolvedLocation> {
    let hit = geocoder.reverse(coords).await?.ok_or_else(|| {
        Error::Geocoding(format!("No address found at {}, {}", coords.lat, coords.lng))
    })?;

    Ok(resolver.merge_reverse(&ResolvedLocation::empty(), coords, &hit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{candidate, MockBackend};

    #[tokio::test]
    async fn test_lookup_resolves_hit() {
        let backend = MockBackend::new().with_reverse(candidate("Shibuya, Tokyo, Japan", 0.0, 0.0, &[("country", "Japan")]));
        let location = lookup(&backend, &SelectionResolver::default(), Coordinates::new(35.66, 139.7))
            .await
            .unwrap();

        assert_eq!(location.city, "Tokyo");
        assert_eq!(location.coordinates, Some(Coordinates::new(35.66, 139.7)));
    }

    #[tokio::test]
    async fn test_lookup_reports_geocoder_failure() {
        let err = lookup(&MockBackend::failing(), &SelectionResolver::default(), Coordinates::new(1.0, 1.0))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Geocoding error: mock failure");
    }

    #[tokio::test]
    async fn test_lookup_no_address() {
        let err = lookup(&MockBackend::new(), &SelectionResolver::default(), Coordinates::new(0.0, -30.0))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No address found"));
    }
}
