//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod reverse;
pub mod search;
pub mod serve;

use crate::location::ResolvedLocation;
use clap::{Parser, Subcommand};

/// Place search and picking from the terminal
#[derive(Parser)]
#[command(name = "placepick")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for places and optionally pick one
    Search(search::SearchArgs),

    /// Look up the address at a point
    Reverse(reverse::ReverseArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search::run(args).await,
        Commands::Reverse(args) => reverse::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
    }
}

/// Print a resolved location as JSON or as aligned text
fn print_location(location: &ResolvedLocation, json: bool) -> crate::error::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(location)?);
        return Ok(());
    }

    println!("Place:   {}", location.place_name);
    println!("City:    {}", location.city);
    println!("Country: {}", location.country);
    if let Some(coords) = location.coordinates {
        println!("Coords:  {:.6}, {:.6}", coords.lat, coords.lng);
    }
    Ok(())
}
