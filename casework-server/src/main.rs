use casework_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_logger_with_file(&config.log_level, config.log_dir.as_deref())?;

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        timezone = %config.timezone,
        "Casework server starting"
    );

    let state = ServerState::initialize(&config).await?;
    Server::with_state(config, state).run().await?;

    Ok(())
}
