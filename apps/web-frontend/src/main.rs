use std::time::Duration;

use actix_web::{web, App, HttpServer};
use tracing::{debug, info};
use web_frontend::middleware::SessionCookie;
use web_frontend::routes;
use web_frontend::state::build_state;
use web_frontend::FrontendConfig;
use web_infra::telemetry::init_tracing;
use web_infra::{RequestTrace, StructuredLogger, TraceSpan};

/// Sessions untouched for this long are dropped.
const SESSION_IDLE_LIMIT: Duration = Duration::from_secs(60 * 60);
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_tracing("web-frontend", "info,actix_web=info,reqwest=warn");

    let config = match FrontendConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let secure_cookies = config.secure_cookies();

    let app_state = match build_state(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    let sessions = app_state.sessions.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let dropped = sessions.purge_idle(SESSION_IDLE_LIMIT);
            if dropped > 0 {
                debug!(dropped, remaining = sessions.len(), "idle sessions purged");
            }
        }
    });

    info!(%host, port, "starting web front-end");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(SessionCookie::new(secure_cookies))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
