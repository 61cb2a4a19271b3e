use account_api::routes;
use account_api::state::build_state;
use account_api::ApiConfig;
use actix_web::{web, App, HttpServer};
use tracing::info;
use web_infra::telemetry::init_tracing;
use web_infra::{cors_middleware, RequestTrace, StructuredLogger, TraceSpan};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing("account-api", "info,actix_web=info");

    // Environment variables must be set by the runtime environment
    let config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let app_state = match build_state(&config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, "starting account API");

    let data = web::Data::new(app_state);
    let origins = config.cors_allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
