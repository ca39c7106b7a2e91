use reelvault_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load .env when present; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    reelvault_api::telemetry::init_telemetry()?;

    let config = Config::from_env()?;
    config.validate()?;

    let (_state, router) = reelvault_api::setup::initialize_app(config.clone()).await?;

    reelvault_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
