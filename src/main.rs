use color_eyre::eyre::Result;
use dotenv::dotenv;
use cuefinder_api::config::ApiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    cuefinder_api::init_tracing(&config)?;

    // Connect the store for the configured mode
    let state = cuefinder_api::build_state(&config).await?;

    // Start API server
    cuefinder_api::start_server(config, state).await?;

    Ok(())
}
