use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::price::{
    NewPriceRecord as DomainNewPriceRecord, PriceRecord as DomainPriceRecord,
};
use crate::repository::errors::RepositoryError;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::prices)]
pub struct Price {
    pub id: i32,
    pub brand_id: i64,
    pub product_id: i64,
    pub price_list_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub priority: i32,
    pub amount: String,
    pub currency: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::prices)]
pub struct NewPrice<'a> {
    pub brand_id: i64,
    pub product_id: i64,
    pub price_list_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub priority: i32,
    pub amount: String,
    pub currency: &'a str,
}

impl TryFrom<Price> for DomainPriceRecord {
    type Error = RepositoryError;

    fn try_from(value: Price) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str_exact(value.amount.trim()).map_err(|err| {
            RepositoryError::Corrupted {
                id: value.id,
                reason: format!("amount `{}` is not an exact decimal: {err}", value.amount),
            }
        })?;

        Ok(Self {
            id: value.id,
            brand_id: value.brand_id,
            product_id: value.product_id,
            price_list_id: value.price_list_id,
            start_date: value.start_date,
            end_date: value.end_date,
            priority: value.priority,
            amount,
            currency: value.currency,
        })
    }
}

impl<'a> From<&'a DomainNewPriceRecord> for NewPrice<'a> {
    fn from(value: &'a DomainNewPriceRecord) -> Self {
        Self {
            brand_id: value.brand_id,
            product_id: value.product_id,
            price_list_id: value.price_list_id,
            start_date: value.start_date,
            end_date: value.end_date,
            priority: value.priority,
            amount: value.amount.to_string(),
            currency: value.currency.as_str(),
        }
    }
}
