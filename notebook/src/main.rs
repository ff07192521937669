//! Notebook web client.
//!
//! Serves the notebook page, gates it behind the identity service and
//! forwards note edits to the managed GraphQL API.
//!
//! Default: http://127.0.0.1:8080/

use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use std::sync::Arc;

use notebook::AppState;
use notebook::config::Config;
use notebook::controllers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            log::error!("Set the missing variables in the environment or a .env file");
            std::process::exit(1);
        }
    };

    log::info!("Notes API: {}", config.graphql_endpoint);
    log::info!("Identity service: {}", config.cognito_endpoint);

    let state = web::Data::new(AppState::new(
        Arc::new(config.identity_provider()),
        Arc::new(config.graphql()),
    ));

    let addr = config.bind_addr();
    log::info!("Notebook listening on http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(controllers::configure)
    })
    .bind(&addr)?
    .run()
    .await
}
