use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::rt::time::timeout;
use actix_web::{HttpRequest, HttpResponse, Responder, error, get, web};
use serde::Serialize;

use crate::config::ServerConfig;
use crate::domain::selection::PriceSelectionStrategy;
use crate::forms::prices::{PriceListParams, PriceQueryParams};
use crate::repository::DieselRepository;
use crate::services::{ServiceError, ServiceResult, prices};

/// JSON body returned for every non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub message: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        status: status.as_u16(),
        error: status.canonical_reason().unwrap_or("Error").to_string(),
        message: message.into(),
    })
}

fn service_error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Form(message) => error_response(StatusCode::BAD_REQUEST, message),
        ServiceError::Timeout => {
            log::warn!("Timed out while trying to {action}");
            error_response(StatusCode::GATEWAY_TIMEOUT, "The price lookup timed out")
        }
        err => {
            log::error!("Failed to {action}: {err}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
            )
        }
    }
}

/// Runs a blocking lookup on the blocking thread pool under `deadline`.
///
/// Expiry becomes [`ServiceError::Timeout`]; it is never reported as a missing price.
async fn run_lookup<T, F>(deadline: Duration, lookup: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    match timeout(deadline, web::block(lookup)).await {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => Err(ServiceError::Internal(err.to_string())),
        Err(_) => Err(ServiceError::Timeout),
    }
}

#[get("/api/prices")]
/// Return the price that applies to a product of a brand at the given date.
///
/// Responds with `404 Not Found` when no stored price covers the date.
pub async fn get_applicable_price(
    params: web::Query<PriceQueryParams>,
    repo: web::Data<DieselRepository>,
    strategy: web::Data<dyn PriceSelectionStrategy>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let lookup =
        move || prices::find_price(repo.get_ref(), strategy.get_ref(), params.into_inner());

    match run_lookup(config.lookup_timeout, lookup).await {
        Ok(Some(price)) => HttpResponse::Ok().json(price),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "No applicable price found"),
        Err(err) => service_error_response(err, "resolve price"),
    }
}

#[get("/api/prices/all")]
/// Return every stored price of a product of a brand, highest priority first.
pub async fn list_all_prices(
    params: web::Query<PriceListParams>,
    repo: web::Data<DieselRepository>,
    config: web::Data<ServerConfig>,
) -> impl Responder {
    let lookup = move || prices::list_prices(repo.get_ref(), params.into_inner());

    match run_lookup(config.lookup_timeout, lookup).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => service_error_response(err, "list prices"),
    }
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest) -> impl Responder {
    log::warn!("Resource not found: {}", req.path());
    error_response(
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}

/// Registers the price API on an application.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        error::InternalError::from_response(err, error_response(StatusCode::BAD_REQUEST, message))
            .into()
    });

    cfg.app_data(query_config)
        .service(list_all_prices)
        .service(get_applicable_price);
}
