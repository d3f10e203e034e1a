//! Loads price records from a CSV file into the configured database.
//!
//! Usage: `import-prices <prices.csv>`

use std::env;
use std::fs;
use std::process::ExitCode;

use dotenvy::dotenv;

use retail_prices::config::ServerConfig;
use retail_prices::db::{establish_connection_pool, run_migrations};
use retail_prices::forms::prices::UploadPricesForm;
use retail_prices::repository::DieselRepository;
use retail_prices::services::prices::import_prices;

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok();

    let Some(path) = env::args().nth(1) else {
        log::error!("usage: import-prices <prices.csv>");
        return ExitCode::from(2);
    };

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("Failed to read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match establish_connection_pool(&config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("Failed to run database migrations: {e}");
        return ExitCode::FAILURE;
    }

    let repo = DieselRepository::new(pool);
    match import_prices(&repo, UploadPricesForm::new(Some(path.clone()), bytes)) {
        Ok(count) => {
            log::info!("Imported {count} price(s) from {path} into {}", config.database_url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Import of {path} failed: {e}");
            ExitCode::FAILURE
        }
    }
}
