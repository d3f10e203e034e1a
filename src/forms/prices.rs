use std::io::Cursor;

use chrono::{DateTime, NaiveDateTime};
use csv::{StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::price::{NewPriceRecord, PriceListQuery, PriceQuery};

/// ISO 4217 currency codes are three ASCII alphabetic characters.
const CURRENCY_CODE_LEN: usize = 3;
const CURRENCY_CODE_LEN_VALIDATOR: u64 = CURRENCY_CODE_LEN as u64;

/// Column names every price upload must carry.
const REQUIRED_HEADERS: [&str; 8] = [
    "brand_id",
    "start_date",
    "end_date",
    "price_list",
    "product_id",
    "priority",
    "price",
    "curr",
];

/// Result type returned by the price form helpers.
pub type PriceFormResult<T> = Result<T, PriceFormError>;

/// Errors that can occur while turning request input into price queries or records.
#[derive(Debug, Error)]
pub enum PriceFormError {
    #[error("Required parameter '{name}' is missing")]
    MissingParameter { name: &'static str },
    #[error("Parameter '{name}' should be a non-negative integer")]
    InvalidIdentifier { name: &'static str, value: String },
    #[error("Invalid date format. Please use ISO date-time format (yyyy-MM-dd'T'HH:mm:ss)")]
    InvalidDate { value: String },
    /// The uploaded CSV is missing required columns.
    #[error("upload is missing the required headers: {missing}")]
    MissingRequiredHeaders { missing: String },
    #[error("row {row} is invalid: {errors}")]
    UploadInvalidRow { row: usize, errors: ValidationErrors },
    #[error("row {row} has invalid {column} `{value}`")]
    UploadInvalidDate {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row} has invalid price `{value}`")]
    UploadInvalidAmount { row: usize, value: String },
    #[error("row {row} has invalid currency `{value}`")]
    UploadInvalidCurrency { row: usize, value: String },
    #[error("row {row} ends before it starts")]
    UploadInvertedWindow { row: usize },
    /// The uploaded CSV did not contain any rows.
    #[error("upload contains no prices")]
    EmptyUpload,
    /// CSV parsing failures.
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Raw query string of `GET /api/prices`.
///
/// Every field stays textual so that missing and malformed values can be
/// reported individually.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQueryParams {
    pub date: Option<String>,
    pub product_id: Option<String>,
    pub brand_id: Option<String>,
}

impl PriceQueryParams {
    /// Validate and parse the parameters into a domain [`PriceQuery`].
    pub fn into_price_query(self) -> PriceFormResult<PriceQuery> {
        let date = required("date", self.date)?;
        let at = parse_query_datetime(&date)?;
        let product_id = parse_identifier("productId", required("productId", self.product_id)?)?;
        let brand_id = parse_identifier("brandId", required("brandId", self.brand_id)?)?;

        Ok(PriceQuery::new(brand_id, product_id, at))
    }
}

/// Raw query string of `GET /api/prices/all`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListParams {
    pub product_id: Option<String>,
    pub brand_id: Option<String>,
}

impl PriceListParams {
    pub fn into_price_list_query(self) -> PriceFormResult<PriceListQuery> {
        let product_id = parse_identifier("productId", required("productId", self.product_id)?)?;
        let brand_id = parse_identifier("brandId", required("brandId", self.brand_id)?)?;

        Ok(PriceListQuery::new(brand_id, product_id))
    }
}

fn required(name: &'static str, value: Option<String>) -> PriceFormResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(PriceFormError::MissingParameter { name }),
    }
}

fn parse_identifier(name: &'static str, raw: String) -> PriceFormResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(PriceFormError::InvalidIdentifier { name, value: raw }),
    }
}

fn parse_query_datetime(raw: &str) -> PriceFormResult<NaiveDateTime> {
    let trimmed = raw.trim();
    trimmed
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M"))
        // An offset suffix is accepted, the local wall-clock time is kept.
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|at| at.naive_local()))
        .map_err(|_| PriceFormError::InvalidDate {
            value: raw.to_string(),
        })
}

/// Uploaded CSV payload for bulk price creation.
#[derive(Debug)]
pub struct UploadPricesForm {
    /// Optional filename provided by the client.
    pub file_name: Option<String>,
    /// Raw CSV bytes.
    pub bytes: Vec<u8>,
}

#[derive(Debug, Deserialize, Validate)]
struct PriceCsvRow {
    #[validate(range(min = 0))]
    brand_id: i64,
    start_date: String,
    end_date: String,
    #[validate(range(min = 0))]
    price_list: i64,
    #[validate(range(min = 0))]
    product_id: i64,
    priority: i32,
    price: String,
    #[validate(length(equal = CURRENCY_CODE_LEN_VALIDATOR))]
    curr: String,
}

impl UploadPricesForm {
    pub fn new(file_name: Option<String>, bytes: Vec<u8>) -> Self {
        Self { file_name, bytes }
    }

    /// Parse the CSV into domain [`NewPriceRecord`] values.
    ///
    /// Header names are matched case-insensitively. The first bad row aborts the
    /// whole upload.
    pub fn into_new_prices(self) -> PriceFormResult<Vec<NewPriceRecord>> {
        let UploadPricesForm { bytes, .. } = self;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(Cursor::new(bytes));

        let headers = normalize_headers(reader.headers()?);
        let missing: Vec<&str> = REQUIRED_HEADERS
            .iter()
            .copied()
            .filter(|expected| !headers.iter().any(|header| header == *expected))
            .collect();
        if !missing.is_empty() {
            return Err(PriceFormError::MissingRequiredHeaders {
                missing: missing.join(", "),
            });
        }
        reader.set_headers(headers);

        let mut prices = Vec::new();

        for (index, row) in reader.deserialize::<PriceCsvRow>().enumerate() {
            let row_number = index + 2; // account for header row
            let record = row?;
            prices.push(into_new_price(record, row_number)?);
        }

        if prices.is_empty() {
            return Err(PriceFormError::EmptyUpload);
        }

        Ok(prices)
    }
}

fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|header| header.trim().to_ascii_lowercase())
        .collect()
}

fn into_new_price(record: PriceCsvRow, row: usize) -> PriceFormResult<NewPriceRecord> {
    record
        .validate()
        .map_err(|errors| PriceFormError::UploadInvalidRow { row, errors })?;

    let start_date = parse_record_datetime(&record.start_date).ok_or_else(|| {
        PriceFormError::UploadInvalidDate {
            row,
            column: "start_date",
            value: record.start_date.clone(),
        }
    })?;
    let end_date = parse_record_datetime(&record.end_date).ok_or_else(|| {
        PriceFormError::UploadInvalidDate {
            row,
            column: "end_date",
            value: record.end_date.clone(),
        }
    })?;
    if end_date < start_date {
        return Err(PriceFormError::UploadInvertedWindow { row });
    }

    let amount = Decimal::from_str_exact(&record.price).map_err(|_| {
        PriceFormError::UploadInvalidAmount {
            row,
            value: record.price.clone(),
        }
    })?;

    if !record.curr.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(PriceFormError::UploadInvalidCurrency {
            row,
            value: record.curr,
        });
    }

    Ok(NewPriceRecord {
        brand_id: record.brand_id,
        product_id: record.product_id,
        price_list_id: record.price_list,
        start_date,
        end_date,
        priority: record.priority,
        amount,
        currency: record.curr.to_ascii_uppercase(),
    })
}

/// Accepts the `2020-06-14-00.00.00` layout of the sample data as well as ISO
/// and SQL-style timestamps.
fn parse_record_datetime(raw: &str) -> Option<NaiveDateTime> {
    const LAYOUTS: [&str; 3] = ["%Y-%m-%d-%H.%M.%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

    LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(raw, layout).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn params(
        date: Option<&str>,
        product_id: Option<&str>,
        brand_id: Option<&str>,
    ) -> PriceQueryParams {
        PriceQueryParams {
            date: date.map(str::to_string),
            product_id: product_id.map(str::to_string),
            brand_id: brand_id.map(str::to_string),
        }
    }

    #[test]
    fn query_params_parse_into_price_query() {
        let query = params(Some("2020-06-14T16:00:00"), Some("35455"), Some("1"))
            .into_price_query()
            .expect("expected success");

        let expected_at = NaiveDate::from_ymd_opt(2020, 6, 14)
            .and_then(|date| date.and_hms_opt(16, 0, 0))
            .expect("valid datetime");
        assert_eq!(query, PriceQuery::new(1, 35455, expected_at));
    }

    #[test]
    fn query_params_report_missing_parameter() {
        let result = params(Some("2020-06-14T16:00:00"), None, Some("1")).into_price_query();

        match result {
            Err(err @ PriceFormError::MissingParameter { name: "productId" }) => {
                assert_eq!(err.to_string(), "Required parameter 'productId' is missing");
            }
            other => panic!("expected missing productId, got {other:?}"),
        }
    }

    #[test]
    fn query_params_reject_negative_or_textual_ids() {
        let negative =
            params(Some("2020-06-14T16:00:00"), Some("35455"), Some("-1")).into_price_query();
        assert!(matches!(
            negative,
            Err(PriceFormError::InvalidIdentifier { name: "brandId", .. })
        ));

        let textual =
            params(Some("2020-06-14T16:00:00"), Some("abc"), Some("1")).into_price_query();
        assert!(matches!(
            textual,
            Err(PriceFormError::InvalidIdentifier { name: "productId", .. })
        ));
    }

    #[test]
    fn query_params_reject_malformed_date() {
        let result =
            params(Some("14/06/2020 10:00"), Some("35455"), Some("1")).into_price_query();

        assert!(matches!(result, Err(PriceFormError::InvalidDate { .. })));
    }

    #[test]
    fn query_params_ignore_offset_suffix() {
        let expected_at = NaiveDate::from_ymd_opt(2020, 6, 14)
            .and_then(|date| date.and_hms_opt(10, 0, 0))
            .expect("valid datetime");

        for date in ["2020-06-14T10:00:00Z", "2020-06-14T10:00:00+02:00"] {
            let query = params(Some(date), Some("35455"), Some("1"))
                .into_price_query()
                .expect("expected success");
            assert_eq!(query.at, expected_at, "date {date}");
        }
    }

    #[test]
    fn list_params_require_both_ids() {
        let result = PriceListParams {
            product_id: Some("35455".into()),
            brand_id: None,
        }
        .into_price_list_query();

        assert!(matches!(
            result,
            Err(PriceFormError::MissingParameter { name: "brandId" })
        ));
    }

    #[test]
    fn upload_prices_form_converts_rows() {
        let csv = b"BRAND_ID,START_DATE,END_DATE,PRICE_LIST,PRODUCT_ID,PRIORITY,PRICE,CURR\n\
1,2020-06-14-00.00.00,2020-12-31-23.59.59,1,35455,0,35.50,eur\n\
1,2020-06-14T15:00:00,2020-06-14T18:30:00,2,35455,1,25.45,EUR\n"
            .to_vec();

        let prices = UploadPricesForm::new(Some("prices.csv".into()), csv)
            .into_new_prices()
            .expect("expected upload to succeed");

        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].price_list_id, 1);
        assert_eq!(prices[0].amount, dec!(35.50));
        assert_eq!(prices[0].amount.to_string(), "35.50");
        assert_eq!(prices[0].currency, "EUR");
        assert_eq!(prices[1].priority, 1);
        assert_eq!(
            prices[1].end_date,
            NaiveDate::from_ymd_opt(2020, 6, 14)
                .and_then(|date| date.and_hms_opt(18, 30, 0))
                .expect("valid datetime")
        );
    }

    #[test]
    fn upload_prices_form_rejects_missing_headers() {
        let csv = b"brand_id,product_id,price\n1,35455,35.50\n".to_vec();

        let result = UploadPricesForm::new(None, csv).into_new_prices();

        match result {
            Err(PriceFormError::MissingRequiredHeaders { missing }) => {
                assert!(missing.contains("start_date"));
                assert!(missing.contains("curr"));
            }
            other => panic!("expected missing headers, got {other:?}"),
        }
    }

    #[test]
    fn upload_prices_form_reports_row_number() {
        let csv = b"brand_id,start_date,end_date,price_list,product_id,priority,price,curr\n\
1,2020-06-14-00.00.00,2020-12-31-23.59.59,1,35455,0,35.50,EUR\n\
1,2020-06-14-00.00.00,2020-12-31-23.59.59,1,35455,0,abc,EUR\n"
            .to_vec();

        let result = UploadPricesForm::new(None, csv).into_new_prices();

        assert!(matches!(
            result,
            Err(PriceFormError::UploadInvalidAmount { row: 3, .. })
        ));
    }

    #[test]
    fn upload_prices_form_rejects_invalid_rows() {
        let header = "brand_id,start_date,end_date,price_list,product_id,priority,price,curr\n";

        let negative =
            format!("{header}-1,2020-06-14-00.00.00,2020-06-15-00.00.00,1,35455,0,1.00,EUR\n");
        assert!(matches!(
            UploadPricesForm::new(None, negative.into_bytes()).into_new_prices(),
            Err(PriceFormError::UploadInvalidRow { row: 2, .. })
        ));

        let inverted =
            format!("{header}1,2020-06-15-00.00.00,2020-06-14-00.00.00,1,35455,0,1.00,EUR\n");
        assert!(matches!(
            UploadPricesForm::new(None, inverted.into_bytes()).into_new_prices(),
            Err(PriceFormError::UploadInvertedWindow { row: 2 })
        ));

        let bad_date =
            format!("{header}1,yesterday,2020-06-14-00.00.00,1,35455,0,1.00,EUR\n");
        assert!(matches!(
            UploadPricesForm::new(None, bad_date.into_bytes()).into_new_prices(),
            Err(PriceFormError::UploadInvalidDate {
                row: 2,
                column: "start_date",
                ..
            })
        ));

        let bad_currency =
            format!("{header}1,2020-06-14-00.00.00,2020-06-15-00.00.00,1,35455,0,1.00,E1R\n");
        assert!(matches!(
            UploadPricesForm::new(None, bad_currency.into_bytes()).into_new_prices(),
            Err(PriceFormError::UploadInvalidCurrency { row: 2, .. })
        ));
    }

    #[test]
    fn upload_prices_form_rejects_amount_that_would_be_rounded() {
        let csv = "brand_id,start_date,end_date,price_list,product_id,priority,price,curr\n\
                   1,2020-06-14-00.00.00,2020-06-15-00.00.00,1,35455,0,\
                   0.123456789012345678901234567891,EUR\n";

        let result = UploadPricesForm::new(None, csv.as_bytes().to_vec()).into_new_prices();

        match result {
            Err(PriceFormError::UploadInvalidAmount { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "0.123456789012345678901234567891");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn upload_prices_form_rejects_empty_upload() {
        let csv =
            b"brand_id,start_date,end_date,price_list,product_id,priority,price,curr\n".to_vec();

        let result = UploadPricesForm::new(None, csv).into_new_prices();

        assert!(matches!(result, Err(PriceFormError::EmptyUpload)));
    }
}
