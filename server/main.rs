use actix_files::Files;
use actix_web::{get, middleware, web, App, HttpResponse, HttpServer, Responder};
use serde::Serialize;
use std::env;

const DEFAULT_UPSTREAM_URL: &str = "https://map-api.production.signalbox.io/api/locations";

struct RelayState {
    client: reqwest::Client,
    upstream_url: String,
}

/// Same shape as the public CORS relay, so the client decodes both alike
#[derive(Serialize)]
struct RelayEnvelope {
    contents: String,
}

async fn fetch_upstream(state: &RelayState) -> Result<String, String> {
    let response = state
        .client
        .get(&state.upstream_url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;

    let status = response.status();
    if !status.is_success() {
        return Err(format!("Upstream status: {}", status.as_u16()));
    }

    response
        .text()
        .await
        .map_err(|e| format!("Failed to read upstream body: {e}"))
}

#[get("/api/locations")]
async fn locations(state: web::Data<RelayState>) -> impl Responder {
    match fetch_upstream(&state).await {
        Ok(contents) => HttpResponse::Ok().json(RelayEnvelope { contents }),
        Err(e) => {
            log::warn!("Location relay failed: {e}");
            HttpResponse::BadGateway().body(e)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Get port from environment or default to 8080
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let upstream_url = env::var("UPSTREAM_LOCATIONS_URL").unwrap_or_else(|_| DEFAULT_UPSTREAM_URL.to_string());

    let state = web::Data::new(RelayState {
        client: reqwest::Client::new(),
        upstream_url,
    });

    log::info!("Starting server on 0.0.0.0:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(locations)
            .service(Files::new("/", "./dist").index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
