use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use otp_api::bootstrap::build_state;
use otp_api::middleware::create_cors;
use otp_api::{create_app, telemetry};
use otp_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    telemetry::init_tracing(&config.logging).context("failed to install tracing subscriber")?;
    config.validate().context("invalid configuration")?;

    tracing::info!(
        environment = %config.environment,
        store = ?config.database.backend,
        "Starting OTP gateway"
    );

    let state = web::Data::new(build_state(&config).await.context("failed to build application state")?);
    let cors_config = config.cors.clone();
    let bind_address = config.server.bind_address();

    let mut server = HttpServer::new(move || {
        create_app(state.clone())
            .wrap(create_cors(&cors_config))
            .wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    tracing::info!(address = %bind_address, "Listening");
    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
