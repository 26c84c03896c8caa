//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Types are immutable once validated; invariants and serialisation
//! contracts are documented on each type.
//!
//! Public surface:
//! - Error (alias to `error::Error`) — API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`) — stable error identifier.
//! - User (alias to `user::User`) — identity, display name and dish
//!   back-references.
//! - Dish (alias to `dish::Dish`) — a reviewed dish and its value types.
//! - TransactionContext — explicit unit of work for dish/owner writes.
//! - DishService — consistency manager behind the dish ports.

pub mod auth;
pub mod dish;
pub mod dish_service;
pub mod dish_transaction;
pub mod error;
pub mod login_service;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::dish::{
    Address, Coordinates, DESCRIPTION_MIN_CHARS, Dish, DishDescription, DishDraft, DishId,
    DishName, DishParts, DishPatch, DishTitle, DishValidationError, ImagePath, STARS_MAX,
    STARS_MIN, Stars,
};
pub use self::dish_service::DishService;
pub use self::dish_transaction::{DishWrite, TransactionContext};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::login_service::{AccountLoginService, DevAccount};
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DISPLAY_NAME_MIN, DisplayName, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use dishshare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
