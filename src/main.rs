use chrono::Utc;
use dotenvy::dotenv;
use subtrack::{
    config::{
        engine::load_config_or_default,
        environment::{Environment, session_from_env},
        logging::init_tracing,
    },
    core::{
        intake::parse_subscriptions,
        report::{build_dashboard, format_dashboard},
    },
    errors::Result,
};
use tracing::{error, info};

fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    init_tracing("info");

    // 2. Load .env file
    dotenv().ok(); // Make it non-fatal, env vars can be set externally
    info!("Attempted to load .env file.");

    // 3. Resolve paths and load the engine configuration
    let environment = Environment::from_env();
    let config = load_config_or_default(&environment.config_path)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Loaded configuration from {:?}", environment.config_path);

    // 4. Caller session, if any
    let session = session_from_env()?;

    // 5. Load and validate the subscriptions export
    let raw = std::fs::read_to_string(&environment.data_path)
        .inspect_err(|e| error!("Failed to read {:?}: {}", environment.data_path, e))?;
    let mut subscriptions = parse_subscriptions(&raw)?;
    if let Some(session) = &session {
        subscriptions = session.visible(subscriptions);
        info!("Showing subscriptions for user {}", session.user_id);
    }
    info!("Loaded {} subscriptions", subscriptions.len());

    // 6. Print the dashboard
    let dashboard = build_dashboard(&subscriptions, Utc::now(), &config);
    println!("{}", format_dashboard(&dashboard));

    Ok(())
}
