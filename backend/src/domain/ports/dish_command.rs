//! Driving port for dish mutations.
//!
//! Requests are plain immutable values; the service decides which writes to
//! perform and returns the resulting dish.

use async_trait::async_trait;

use crate::domain::{Dish, DishDraft, DishId, DishPatch, Error, ImagePath, UserId};

/// Create a dish owned by `owner_id` using an already uploaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDishRequest {
    pub owner_id: UserId,
    pub draft: DishDraft,
    pub image_path: ImagePath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreateDishResponse {
    pub dish: Dish,
}

/// Replace title and description of a dish the caller owns.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDishRequest {
    pub dish_id: DishId,
    pub caller_id: UserId,
    pub patch: DishPatch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateDishResponse {
    pub dish: Dish,
}

/// Delete a dish the caller owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDishRequest {
    pub dish_id: DishId,
    pub caller_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDishResponse {
    pub dish_id: DishId,
    /// Whether the stored image was removed after the delete committed.
    pub image_removed: bool,
}

/// Domain use-case port for creating, editing and deleting dishes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishCommand: Send + Sync {
    /// Geocode, then insert the dish and link it from its owner atomically.
    async fn create_dish(&self, request: CreateDishRequest) -> Result<CreateDishResponse, Error>;

    /// Apply a title/description patch when the caller is the creator.
    async fn update_dish(&self, request: UpdateDishRequest) -> Result<UpdateDishResponse, Error>;

    /// Delete the dish and unlink it from its owner atomically, then drop
    /// the image on a best-effort basis.
    async fn delete_dish(&self, request: DeleteDishRequest) -> Result<DeleteDishResponse, Error>;
}
