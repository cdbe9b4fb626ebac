use actix_web::{middleware::Logger, web, App, HttpServer};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod auth;
mod config;
mod db;
mod error;
mod models;
mod state;
mod user_handlers;

use auth::TokenService;
use config::Config;
use db::{CredentialLookup, InMemoryUsers};
use state::AppState;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "authgate=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting with config: {:?}", config);

    let users = match &config.users_file {
        Some(path) => InMemoryUsers::from_json_file(path)?,
        None => InMemoryUsers::seeded(),
    };
    if users.is_empty() {
        tracing::warn!("Credential store is empty, every login will be rejected");
    } else {
        tracing::info!("Loaded {} user record(s)", users.len());
    }

    let users: Arc<dyn CredentialLookup> = Arc::new(users);
    let state = web::Data::new(AppState::new(
        users,
        TokenService::new(&config.jwt_secret, config.token_ttl_secs),
    ));

    let addr = config.bind_addr();
    tracing::info!("Listening on: {}", addr);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(user_handlers::configure)
    })
    .bind(addr)?
    .run()
    .await?;

    Ok(())
}
