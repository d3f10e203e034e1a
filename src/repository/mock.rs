use mockall::mock;

use super::errors::RepositoryResult;
use super::{PriceReader, PriceWriter};
use crate::domain::price::{NewPriceRecord, PriceListQuery, PriceQuery, PriceRecord};

mock! {
    pub PriceReader {}

    impl PriceReader for PriceReader {
        fn find_candidates(&self, query: PriceQuery) -> RepositoryResult<Vec<PriceRecord>>;
        fn find_applicable_price(&self, query: PriceQuery) -> RepositoryResult<Option<PriceRecord>>;
        fn list_prices(&self, query: PriceListQuery) -> RepositoryResult<Vec<PriceRecord>>;
        fn count_prices(&self) -> RepositoryResult<usize>;
    }
}

mock! {
    pub PriceWriter {}

    impl PriceWriter for PriceWriter {
        fn create_prices(&self, new_prices: &[NewPriceRecord]) -> RepositoryResult<usize>;
    }
}

mock! {
    pub PriceRepository {}

    impl PriceReader for PriceRepository {
        fn find_candidates(&self, query: PriceQuery) -> RepositoryResult<Vec<PriceRecord>>;
        fn find_applicable_price(&self, query: PriceQuery) -> RepositoryResult<Option<PriceRecord>>;
        fn list_prices(&self, query: PriceListQuery) -> RepositoryResult<Vec<PriceRecord>>;
        fn count_prices(&self) -> RepositoryResult<usize>;
    }

    impl PriceWriter for PriceRepository {
        fn create_prices(&self, new_prices: &[NewPriceRecord]) -> RepositoryResult<usize>;
    }
}
