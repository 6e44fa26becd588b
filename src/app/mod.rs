use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use secrecy::SecretString;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::{config::AppConfig, database::DbManager, web::serve::build_cors_layer, Result};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
    pub cors: CorsLayer,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener, cors: CorsLayer) -> Self {
        App {
            app_state,
            listener,
            cors,
        }
    }

    /// Opens the database, prepares the shared state and binds the listener.
    /// Any failure here is fatal for the process.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let cors = build_cors_layer(config.cors_config.origins()?);
        let dm = DbManager::init(&config.db_config).await?;

        let app_state = AppState::new(
            dm,
            config.auth_config.api_key.clone(),
            config.subscription_config.validate_email_format,
        );

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener, cors);
        Ok(app)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub database_mgr: DbManager,
    pub api_key: SecretString,
    pub validate_email_format: bool,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(database_mgr: DbManager, api_key: SecretString, validate_email_format: bool) -> Self {
        AppState(Arc::new(InternalState {
            database_mgr,
            api_key,
            validate_email_format,
        }))
    }
}
