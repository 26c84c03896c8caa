//! Driving port for dish reads.

use async_trait::async_trait;

use crate::domain::{Dish, DishId, Error, ImagePath, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetDishRequest {
    pub dish_id: DishId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetDishResponse {
    pub dish: Dish,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUserDishesRequest {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListUserDishesResponse {
    /// Dishes in the order the user created them; may be empty.
    pub dishes: Vec<Dish>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUsageRequest {
    pub image_path: ImagePath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageUsageResponse {
    /// True when at least one stored dish points at the image.
    pub in_use: bool,
}

/// Domain use-case port for reading dishes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishQuery: Send + Sync {
    /// Fetch one dish, failing with `not_found` when absent.
    async fn get_dish(&self, request: GetDishRequest) -> Result<GetDishResponse, Error>;

    /// List a user's dishes, failing with `not_found` for unknown users.
    async fn list_user_dishes(
        &self,
        request: ListUserDishesRequest,
    ) -> Result<ListUserDishesResponse, Error>;

    /// Report whether any stored dish references an uploaded image.
    async fn image_usage(&self, request: ImageUsageRequest) -> Result<ImageUsageResponse, Error>;
}
