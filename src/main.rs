use std::fs;

use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use retail_prices::config::ServerConfig;
use retail_prices::db::{establish_connection_pool, run_migrations};
use retail_prices::forms::prices::UploadPricesForm;
use retail_prices::repository::DieselRepository;
use retail_prices::routes::api;
use retail_prices::services::prices::seed_prices;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);

    if let Some(path) = config.seed_csv.as_deref() {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("Failed to read seed file {path}: {e}");
                std::process::exit(1);
            }
        };
        let form = UploadPricesForm::new(Some(path.to_string()), bytes);
        if let Err(e) = seed_prices(&repo, form) {
            log::error!("Failed to import seed file {path}: {e}");
            std::process::exit(1);
        }
    }

    let strategy = web::Data::from(config.selection_policy.strategy());
    log::info!(
        "Resolving prices with the {} policy, lookup deadline {:?}",
        config.selection_policy,
        config.lookup_timeout
    );

    let bind_address = (config.address.clone(), config.port);
    let server_config = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .configure(api::configure)
            .default_service(web::to(api::not_found))
            .app_data(web::Data::new(repo.clone()))
            .app_data(strategy.clone())
            .app_data(server_config.clone())
    })
    .bind(bind_address)?
    .run()
    .await
}
