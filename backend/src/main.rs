//! Backend entry-point: wires REST endpoints, stores, and OpenAPI docs.

use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::domain::TokenSigner;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::health::{live, ready, HealthState};
use backend::inbound::http::HttpState;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{diesel_state, fixture_state, mount_api, AppConfig};
use backend::Trace;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()?;
    let signer = TokenSigner::new(&config.signing_key);

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let pool = DbPool::new(PoolConfig::new(url))
                .await
                .map_err(|err| std::io::Error::other(err.to_string()))?;
            info!("using PostgreSQL-backed stores");
            diesel_state(pool, &signer)
        }
        None => {
            warn!("DATABASE_URL unset; using in-memory stores (data is not persisted)");
            fixture_state(&signer)
        }
    };

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the probes stay reachable from here.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), state.clone(), signer.clone())
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

fn build_app(
    health_state: web::Data<HealthState>,
    state: HttpState,
    signer: TokenSigner,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    #[cfg_attr(not(debug_assertions), expect(unused_mut))]
    let mut app = App::new()
        .app_data(health_state)
        .wrap(Trace)
        .configure(|cfg| mount_api(cfg, state, signer))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}
