use actix_web::{web, App, HttpServer};

use couplet_gateway::cors::CorsHeaders;
use couplet_gateway::server::config_routes;
use couplet_gateway::util::{env_bind_addr, init_tracing, AppState};
use couplet_gateway::GatewayConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = GatewayConfig::from_env()?;
    let state = web::Data::new(AppState::from_config(config)?);
    let bind_addr = env_bind_addr();

    tracing::info!("couplet-gateway listening on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(CorsHeaders)
            .configure(config_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
