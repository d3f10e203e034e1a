use diesel::prelude::*;

use crate::{
    domain::price::{
        NewPriceRecord as DomainNewPriceRecord, PriceListQuery, PriceQuery,
        PriceRecord as DomainPriceRecord,
    },
    models::price::{NewPrice as DbNewPrice, Price as DbPrice},
    repository::errors::{RepositoryError, RepositoryResult},
    repository::{DieselRepository, PriceReader, PriceWriter},
};

impl PriceReader for DieselRepository {
    fn find_candidates(&self, query: PriceQuery) -> RepositoryResult<Vec<DomainPriceRecord>> {
        use crate::schema::prices;

        let mut conn = self.conn()?;
        let rows = prices::table
            .filter(prices::brand_id.eq(query.brand_id))
            .filter(prices::product_id.eq(query.product_id))
            .filter(prices::start_date.le(query.at))
            .filter(prices::end_date.ge(query.at))
            .load::<DbPrice>(&mut conn)?;

        into_domain(rows)
    }

    fn find_applicable_price(
        &self,
        query: PriceQuery,
    ) -> RepositoryResult<Option<DomainPriceRecord>> {
        use crate::schema::prices;

        let mut conn = self.conn()?;
        let row = prices::table
            .filter(prices::brand_id.eq(query.brand_id))
            .filter(prices::product_id.eq(query.product_id))
            .filter(prices::start_date.le(query.at))
            .filter(prices::end_date.ge(query.at))
            .order((
                prices::priority.desc(),
                prices::price_list_id.asc(),
                prices::start_date.desc(),
                prices::id.asc(),
            ))
            .first::<DbPrice>(&mut conn)
            .optional()?;

        row.map(DomainPriceRecord::try_from).transpose()
    }

    fn list_prices(&self, query: PriceListQuery) -> RepositoryResult<Vec<DomainPriceRecord>> {
        use crate::schema::prices;

        let mut conn = self.conn()?;
        let rows = prices::table
            .filter(prices::brand_id.eq(query.brand_id))
            .filter(prices::product_id.eq(query.product_id))
            .order((
                prices::priority.desc(),
                prices::price_list_id.asc(),
                prices::start_date.asc(),
            ))
            .load::<DbPrice>(&mut conn)?;

        into_domain(rows)
    }

    fn count_prices(&self) -> RepositoryResult<usize> {
        use crate::schema::prices;

        let mut conn = self.conn()?;
        let total = prices::table.count().get_result::<i64>(&mut conn)?;

        Ok(total as usize)
    }
}

impl PriceWriter for DieselRepository {
    fn create_prices(&self, new_prices: &[DomainNewPriceRecord]) -> RepositoryResult<usize> {
        use crate::schema::prices;

        if new_prices.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        let rows: Vec<DbNewPrice> = new_prices.iter().map(DbNewPrice::from).collect();

        conn.transaction(|conn| {
            diesel::insert_into(prices::table)
                .values(&rows)
                .execute(conn)
        })
        .map_err(RepositoryError::from)
    }
}

fn into_domain(rows: Vec<DbPrice>) -> RepositoryResult<Vec<DomainPriceRecord>> {
    rows.into_iter().map(DomainPriceRecord::try_from).collect()
}
