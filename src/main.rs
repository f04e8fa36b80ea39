use clap::{Parser, Subcommand};
use colored::Colorize;
use parking_api::Api;
use parkingcloud_rs::{config, demos};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parkingcloud")]
#[command(about = "Demonstration programs for the parking cloud API client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an uplink, registering the sensor on a 404 and resending
    UplinkRetry,
    /// Read-only checks: token info plus every list endpoint
    Smoke,
    /// Full create/get/update/uplink/delete pass over every resource
    Lifecycle,
    /// Vehicle-counting walkthrough: three lanes, paired uplinks, direction flips
    Counting,
    /// Run every demonstration program in order
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    // Surfaces the transport's request/response logs; RUST_LOG=debug shows them.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let config = config::from_env()?;
    let api_key = config.api_key.clone();
    let api = Api::new(config);

    let result = match cli.command {
        Commands::UplinkRetry => demos::uplink_retry(&api).await,
        Commands::Smoke => demos::smoke(&api, &api_key).await,
        Commands::Lifecycle => demos::lifecycle(&api).await,
        Commands::Counting => demos::counting(&api).await,
        Commands::All => {
            demos::uplink_retry(&api).await?;
            demos::smoke(&api, &api_key).await?;
            demos::lifecycle(&api).await?;
            demos::counting(&api).await
        }
    };

    if let Err(err) = result {
        eprintln!("{} {err:#}", "error:".red().bold());
        std::process::exit(1);
    }

    Ok(())
}
