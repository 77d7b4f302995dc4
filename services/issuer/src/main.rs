use sea_orm::Database;
use tracing::info;

use otpgate_core::config::Config;
use otpgate_core::tracing::init_tracing;
use otpgate_issuer::config::IssuerConfig;
use otpgate_issuer::infra::mail::SmtpMailer;
use otpgate_issuer::router::build_router;
use otpgate_issuer::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = IssuerConfig::from_env().expect("failed to load config from environment");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        mailer: SmtpMailer::new(config.mail_timeout()),
        admin_token: config.admin_token.clone(),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.issuer_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("issuer service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
