pub mod errors;
pub mod prices;

pub use errors::{ServiceError, ServiceResult};
