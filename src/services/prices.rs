use crate::domain::price::{PriceQuery, PriceView};
use crate::domain::selection::PriceSelectionStrategy;
use crate::forms::prices::{PriceListParams, PriceQueryParams, UploadPricesForm};
use crate::repository::{PriceReader, PriceWriter};
use crate::services::{ServiceError, ServiceResult};

/// Resolves the single price that applies to `query`.
///
/// Looks up every record whose window contains the instant and lets `strategy`
/// pick one. `Ok(None)` means no record matched; storage failures are errors.
pub fn resolve_price<R>(
    repo: &R,
    strategy: &dyn PriceSelectionStrategy,
    query: PriceQuery,
) -> ServiceResult<Option<PriceView>>
where
    R: PriceReader + ?Sized,
{
    let candidates = repo.find_candidates(query).map_err(ServiceError::from)?;

    log::debug!(
        "{} candidate price(s) for brand {} product {} at {}",
        candidates.len(),
        query.brand_id,
        query.product_id,
        query.at
    );

    Ok(strategy
        .select(&candidates)
        .cloned()
        .map(PriceView::from))
}

/// Parses the request parameters and resolves the applicable price.
pub fn find_price<R>(
    repo: &R,
    strategy: &dyn PriceSelectionStrategy,
    params: PriceQueryParams,
) -> ServiceResult<Option<PriceView>>
where
    R: PriceReader + ?Sized,
{
    let query = params
        .into_price_query()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    resolve_price(repo, strategy, query)
}

/// Lists every stored price of a brand/product pair, highest priority first.
pub fn list_prices<R>(repo: &R, params: PriceListParams) -> ServiceResult<Vec<PriceView>>
where
    R: PriceReader + ?Sized,
{
    let query = params
        .into_price_list_query()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let prices = repo.list_prices(query).map_err(ServiceError::from)?;

    Ok(prices.into_iter().map(PriceView::from).collect())
}

/// Imports price records from a CSV upload. Nothing is stored when any row is
/// rejected.
pub fn import_prices<R>(repo: &R, form: UploadPricesForm) -> ServiceResult<usize>
where
    R: PriceWriter + ?Sized,
{
    let prices = form
        .into_new_prices()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let count = repo.create_prices(&prices).map_err(ServiceError::from)?;
    log::info!("Imported {count} price record(s)");

    Ok(count)
}

/// Imports `form` only into an empty store, so restarting with the same seed
/// file does not duplicate records. Returns the number of rows written.
pub fn seed_prices<R>(repo: &R, form: UploadPricesForm) -> ServiceResult<usize>
where
    R: PriceReader + PriceWriter + ?Sized,
{
    let existing = repo.count_prices().map_err(ServiceError::from)?;
    if existing > 0 {
        log::info!("Skipping seed import, {existing} price record(s) already stored");
        return Ok(0);
    }

    import_prices(repo, form)
}
