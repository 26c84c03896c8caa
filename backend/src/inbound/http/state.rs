//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DishCommand, DishQuery, ImageStore, LoginService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub dishes: Arc<dyn DishCommand>,
    pub dish_queries: Arc<dyn DishQuery>,
    /// Used to discard an upload when dish creation fails.
    pub uploads: Arc<dyn ImageStore>,
}

impl HttpState {
    /// Bundle the ports used by the HTTP adapter.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use dishshare::domain::ports::{FixtureGeocoder, RetainingImageStore};
    /// use dishshare::domain::{AccountLoginService, Coordinates, DevAccount, DishService};
    /// use dishshare::inbound::http::state::HttpState;
    /// use dishshare::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let geocoder = Arc::new(FixtureGeocoder::new(Coordinates::new(0.0, 0.0).unwrap()));
    /// let images = Arc::new(RetainingImageStore);
    /// let service = Arc::new(DishService::new(store.clone(), geocoder, images.clone()));
    /// let login = Arc::new(AccountLoginService::new(store, vec![DevAccount::admin().unwrap()]));
    /// let state = HttpState::new(login, service.clone(), service, images);
    /// let _dishes = state.dishes.clone();
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        dishes: Arc<dyn DishCommand>,
        dish_queries: Arc<dyn DishQuery>,
        uploads: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            login,
            dishes,
            dish_queries,
            uploads,
        }
    }
}
