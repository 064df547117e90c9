use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use docforge::{auth::TokenService, db, generation::GenerationClient, routes, Config};
use std::io;

fn startup_error<E: std::fmt::Display>(context: &str, error: E) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, error))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| startup_error("invalid configuration", e))?;

    let pool = db::connect(&config)
        .await
        .map_err(|e| startup_error("failed to connect to database", e))?;
    db::init_schema(&pool)
        .await
        .map_err(|e| startup_error("failed to initialise schema", e))?;

    let pool = web::Data::new(pool);
    let tokens = web::Data::new(TokenService::from_config(&config));
    let generator = web::Data::new(
        GenerationClient::new(&config.generation)
            .map_err(|e| startup_error("failed to build generation client", e))?,
    );

    log::info!("Starting server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(tokens.clone())
            .app_data(generator.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
