use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use server_api::{get_activity, list_activities, ApiContext};
use shared::error::ApiException;
use storage::Catalog;

#[derive(Parser, Debug)]
struct Cli {
    /// Catalog file to inspect; the built-in seed is used when omitted.
    #[arg(long)]
    catalog: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    List,
    Roster { activity: String },
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let catalog = match &cli.catalog {
        Some(path) => Catalog::load_file(path)?,
        None => Catalog::seeded(),
    };
    let ctx = ApiContext::new(catalog);

    match cli.command {
        Command::List => {
            let activities = list_activities(&ctx).await;
            println!("{}", serde_json::to_string_pretty(&activities)?);
        }
        Command::Roster { activity } => {
            let details = get_activity(&ctx, &activity)
                .await
                .map_err(ApiException::from)?;
            for email in details.participants {
                println!("{email}");
            }
        }
        Command::Validate => {
            let activities = list_activities(&ctx).await;
            if activities.is_empty() {
                bail!("catalog defines no activities");
            }
            let participants: usize = activities.iter().map(|a| a.participants.len()).sum();
            let over_capacity: Vec<&str> = activities
                .iter()
                .filter(|a| a.spots_left() < 0)
                .map(|a| a.name.as_str())
                .collect();
            println!(
                "ok: {} activities, {participants} participants",
                activities.len()
            );
            if !over_capacity.is_empty() {
                println!("over capacity: {}", over_capacity.join(", "));
            }
        }
    }

    Ok(())
}
