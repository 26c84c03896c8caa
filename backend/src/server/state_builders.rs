//! Wires storage, geocoder and image adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use dishshare::domain::ports::{DishRepository, UserRepository};
use dishshare::domain::{AccountLoginService, DishService};
use dishshare::inbound::http::state::HttpState;
use dishshare::outbound::persistence::{DieselDishRepository, DieselUserRepository};

use super::ServerConfig;
use super::config::Storage;

fn repositories(storage: &Storage) -> (Arc<dyn DishRepository>, Arc<dyn UserRepository>) {
    match storage {
        Storage::Postgres(pool) => (
            Arc::new(DieselDishRepository::new(pool.clone())),
            Arc::new(DieselUserRepository::new(pool.clone())),
        ),
        Storage::Memory(store) => {
            let dishes: Arc<dyn DishRepository> = store.clone();
            let users: Arc<dyn UserRepository> = store.clone();
            (dishes, users)
        }
    }
}

/// Build the shared handler state from configured adapters.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let (dishes, users) = repositories(&config.storage);
    let service = Arc::new(DishService::new(
        dishes,
        config.geocoder.clone(),
        config.images.clone(),
    ));
    let accounts = Arc::new(AccountLoginService::new(users, config.accounts.clone()));
    web::Data::new(HttpState::new(
        accounts,
        service.clone(),
        service,
        config.images.clone(),
    ))
}
