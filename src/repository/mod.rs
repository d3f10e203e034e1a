use crate::db::{DbConnection, DbPool};
use crate::domain::price::{NewPriceRecord, PriceListQuery, PriceQuery, PriceRecord};
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod price;

#[cfg(test)]
pub mod mock;

#[derive(Clone)]
/// Diesel-backed repository implementation that wraps an r2d2 pool.
pub struct DieselRepository {
    pool: DbPool, // r2d2::Pool is cheap to clone
}

impl DieselRepository {
    /// Create a new repository using the provided connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Read-only operations over stored price records.
pub trait PriceReader {
    /// Every record of the pair whose closed window contains `query.at`, in no
    /// particular order.
    fn find_candidates(&self, query: PriceQuery) -> RepositoryResult<Vec<PriceRecord>>;
    /// The single highest-precedence record, ordered by the store itself.
    ///
    /// Single-query variant of resolving with `HighestPriority`; it applies the
    /// same tie-break and needs no strategy object.
    fn find_applicable_price(&self, query: PriceQuery) -> RepositoryResult<Option<PriceRecord>>;
    fn list_prices(&self, query: PriceListQuery) -> RepositoryResult<Vec<PriceRecord>>;
    fn count_prices(&self) -> RepositoryResult<usize>;
}

/// Write operations over price records, used by the import path only.
pub trait PriceWriter {
    fn create_prices(&self, new_prices: &[NewPriceRecord]) -> RepositoryResult<usize>;
}
