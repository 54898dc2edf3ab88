use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use std::io;

use tasktrack::config::Config;
use tasktrack::repository::PgStore;
use tasktrack::routes::{self, health};
use tasktrack::state::AppState;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let auth = config.auth_settings();

    let state = match config.database_url.as_deref() {
        Some(url) => {
            let store = PgStore::connect(url, config.database_max_connections)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            AppState::postgres(store, auth)
        }
        None => {
            log::warn!("DATABASE_URL is not set; using the in-memory store, data will not survive a restart");
            AppState::in_memory(auth)
        }
    };
    let state = web::Data::new(state);

    log::info!(
        "Starting server at {} ({} storage)",
        config.server_url(),
        state.storage
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
