//! Helpers for integration tests.

use std::fs;

use diesel_migrations::MigrationHarness;

use retail_prices::db::{DbPool, MIGRATIONS, establish_connection_pool};
use retail_prices::forms::prices::UploadPricesForm;
use retail_prices::repository::DieselRepository;
use retail_prices::services::prices::import_prices;

/// Sample price list shipped with the service.
pub const SAMPLE_PRICES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/prices.csv");

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    /// Repository over this database, pre-loaded with the sample price list.
    pub fn seeded_repository(&self) -> DieselRepository {
        let repo = DieselRepository::new(self.pool());
        let bytes = fs::read(SAMPLE_PRICES).expect("sample prices readable");
        let imported = import_prices(&repo, UploadPricesForm::new(None, bytes))
            .expect("sample prices import");
        assert_eq!(imported, 4);
        repo
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}
