//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`DishCommand`, `DishQuery`, `LoginService`) are called by
//! inbound adapters. Driven ports (`DishRepository`, `Geocoder`,
//! `ImageStore`, `UserRepository`) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod dish_command;
mod dish_query;
mod dish_repository;
mod geocoder;
mod image_store;
mod login_service;
mod user_repository;

#[cfg(test)]
pub use dish_command::MockDishCommand;
pub use dish_command::{
    CreateDishRequest, CreateDishResponse, DeleteDishRequest, DeleteDishResponse, DishCommand,
    UpdateDishRequest, UpdateDishResponse,
};
#[cfg(test)]
pub use dish_query::MockDishQuery;
pub use dish_query::{
    DishQuery, GetDishRequest, GetDishResponse, ImageUsageRequest, ImageUsageResponse,
    ListUserDishesRequest, ListUserDishesResponse,
};
#[cfg(test)]
pub use dish_repository::MockDishRepository;
pub use dish_repository::{DishRepository, DishRepositoryError};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{FixtureGeocoder, GeocodeError, Geocoder};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError, RetainingImageStore};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
