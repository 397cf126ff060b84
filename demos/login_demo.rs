/******************************************************************************
    Author: Joaquín Béjar García
    Email: jb@taunais.com
    Date: 4/9/24
 ******************************************************************************/
use anyhow::Result;
use invest_client::application::services::user_service::{UserService, UserServiceImpl};
use invest_client::config::Config;
use invest_client::presentation::message::Message;
use invest_client::session::auth::AuthService;
use invest_client::session::persistence::FileSessionMirror;
use invest_client::session::store::SessionStore;
use invest_client::transport::http_client::ApiClient;
use invest_client::utils::logger::setup_logger;
use std::env;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logger();

    let config = Config::new();
    info!("Using configuration: {}", config);

    // Picks up a session left by a previous run, if any
    let mirror = Arc::new(FileSessionMirror::new(&config.storage.session_file));
    let session = Arc::new(SessionStore::restore(mirror));
    let client = Arc::new(ApiClient::new(&config, session.clone())?);

    if !session.is_authenticated() {
        let email = env::var("INVEST_EMAIL").unwrap_or_default();
        let password = env::var("INVEST_PASSWORD").unwrap_or_default();
        let auth = AuthService::new(client.clone(), session.clone());
        match auth.login(&email, &password).await {
            Ok(user) => info!("Logged in: {}", user),
            Err(e) => {
                error!("{}", Message::from_error(&e));
                return Ok(());
            }
        }
    }

    let users = UserServiceImpl::new(client, session.clone());
    match users.active_investments().await {
        Ok(investments) => {
            for investment in investments {
                println!(
                    "{}: invested {:.2}, received {:.2}",
                    investment.project_name, investment.total_invested, investment.total_received
                );
            }
        }
        Err(e) if e.is_session_expired() => {
            error!("Session expired, log in again");
        }
        Err(e) => error!("{}", Message::from_error(&e)),
    }

    Ok(())
}
