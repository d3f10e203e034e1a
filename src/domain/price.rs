use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

/// Domain representation of a stored price rule for a brand/product pair.
///
/// Records are read-only snapshots; resolution never alters them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRecord {
    /// Storage identifier of the record.
    pub id: i32,
    /// Owning brand identifier.
    pub brand_id: i64,
    /// Priced product identifier.
    pub product_id: i64,
    /// Rate plan the record belongs to.
    pub price_list_id: i64,
    /// First instant of the validity window (inclusive).
    pub start_date: NaiveDateTime,
    /// Last instant of the validity window (inclusive).
    pub end_date: NaiveDateTime,
    /// Precedence among overlapping windows; larger wins.
    pub priority: i32,
    /// Exact monetary amount.
    pub amount: Decimal,
    /// ISO currency code.
    pub currency: String,
}

impl PriceRecord {
    /// Whether `at` falls inside the closed window `[start_date, end_date]`.
    pub fn is_valid_at(&self, at: NaiveDateTime) -> bool {
        self.start_date <= at && at <= self.end_date
    }
}

/// Payload required to insert a new price record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPriceRecord {
    pub brand_id: i64,
    pub product_id: i64,
    pub price_list_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub priority: i32,
    pub amount: Decimal,
    pub currency: String,
}

/// The (brand, product, instant) triple a resolution is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuery {
    pub brand_id: i64,
    pub product_id: i64,
    pub at: NaiveDateTime,
}

impl PriceQuery {
    pub fn new(brand_id: i64, product_id: i64, at: NaiveDateTime) -> Self {
        Self {
            brand_id,
            product_id,
            at,
        }
    }
}

/// Query definition used to list every stored record of a brand/product pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceListQuery {
    pub brand_id: i64,
    pub product_id: i64,
}

impl PriceListQuery {
    pub fn new(brand_id: i64, product_id: i64) -> Self {
        Self {
            brand_id,
            product_id,
        }
    }
}

/// Caller-facing view of a resolved price.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriceView {
    pub product_id: i64,
    pub brand_id: i64,
    #[serde(rename = "priceList")]
    pub price_list_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    #[serde(rename = "price")]
    pub amount: Decimal,
    pub currency: String,
}

impl From<PriceRecord> for PriceView {
    fn from(value: PriceRecord) -> Self {
        Self {
            product_id: value.product_id,
            brand_id: value.brand_id,
            price_list_id: value.price_list_id,
            start_date: value.start_date,
            end_date: value.end_date,
            amount: value.amount,
            currency: value.currency,
        }
    }
}
