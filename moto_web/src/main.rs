mod error;
mod handlers;

use std::{error::Error, net::SocketAddr};

use axum::{
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use moto_rental::{infrastructure::catalog::InMemoryMotorcycleRepository, RentalConfig};
use tracing::{error, info, Level};

use crate::handlers::AppState;

#[tokio::main]
async fn main() {
    match RentalConfig::load() {
        Ok(config) => {
            tracing_subscriber::fmt()
                .with_max_level(Level::from(&config.logger.level))
                .init();
            if let Err(error) = serve(config).await {
                error!("アプリケーションエラー: {}", error);
            }
        }
        Err(error) => {
            tracing_subscriber::fmt::init();
            error!("設定の読み込みに失敗: {}", error)
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/slots", get(handlers::list_slots))
        .route("/motorcycles", get(handlers::list_motorcycles))
        .route("/quote", post(handlers::quote))
        .route("/bookings/validate", post(handlers::validate_booking))
        .with_state(state)
}

async fn serve(config: RentalConfig) -> Result<(), Box<dyn Error>> {
    let catalog = InMemoryMotorcycleRepository::from_config(&config.catalog)?;
    let state = AppState::new(catalog, config.pricing, config.currency);
    let app = router(state).into_make_service();
    let addr = config.server.addr.parse::<SocketAddr>()?;

    match &config.server.tls {
        Some(tls) => {
            let rustls = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;
            info!("listening on https://{}", addr);
            axum_server::bind_rustls(addr, rustls).serve(app).await?;
        }
        None => {
            info!("listening on http://{}", addr);
            axum_server::bind(addr).serve(app).await?;
        }
    }
    Ok(())
}
