//! Dish consistency service.
//!
//! Implements the dish driving ports on top of the repository, geocoder and
//! image store. Creation and deletion touch two records (the dish and its
//! owner's back-reference list); both are expressed as one
//! [`TransactionContext`] so the repository commits them together.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    CreateDishRequest, CreateDishResponse, DeleteDishRequest, DeleteDishResponse, DishCommand,
    DishQuery, DishRepository, DishRepositoryError, GeocodeError, Geocoder, GetDishRequest,
    GetDishResponse, ImageStore, ImageUsageRequest, ImageUsageResponse, ListUserDishesRequest,
    ListUserDishesResponse, UpdateDishRequest, UpdateDishResponse,
};
use crate::domain::{Dish, DishId, Error, TransactionContext, UserId};

fn map_repository_error(error: DishRepositoryError) -> Error {
    match error {
        DishRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("dish repository unavailable: {message}"))
        }
        DishRepositoryError::Query { message } => {
            Error::internal(format!("dish repository error: {message}"))
        }
        DishRepositoryError::MissingTarget { message } => Error::not_found(message),
    }
}

fn map_commit_error(error: DishRepositoryError, client_message: &'static str) -> Error {
    error!(error = %error, "dish transaction rolled back");
    Error::transaction_failed(client_message)
}

fn map_geocode_error(error: GeocodeError) -> Error {
    let reason = error.reason();
    match &error {
        GeocodeError::NoResults { .. } => {
            info!(error = %error, "address could not be geocoded");
        }
        _ => warn!(error = %error, reason, "geocoder failed"),
    }
    Error::geocode_failed("Could not find location for the specified address.")
        .with_details(json!({ "field": "address", "reason": reason }))
}

fn dish_not_found(id: DishId) -> Error {
    Error::not_found(format!("Could not find dish for the provided id {id}."))
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("Could not find user for the provided id {id}."))
}

/// Dish service implementing the command and query driving ports.
#[derive(Clone)]
pub struct DishService<R: ?Sized, G: ?Sized, I: ?Sized> {
    dishes: Arc<R>,
    geocoder: Arc<G>,
    images: Arc<I>,
}

impl<R: ?Sized, G: ?Sized, I: ?Sized> DishService<R, G, I> {
    /// Create a service over the given adapters.
    pub fn new(dishes: Arc<R>, geocoder: Arc<G>, images: Arc<I>) -> Self {
        Self {
            dishes,
            geocoder,
            images,
        }
    }
}

impl<R, G, I> DishService<R, G, I>
where
    R: DishRepository + ?Sized,
    G: ?Sized,
    I: ?Sized,
{
    async fn load_dish(&self, id: DishId) -> Result<Dish, Error> {
        self.dishes
            .find_dish(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| dish_not_found(id))
    }
}

#[async_trait]
impl<R, G, I> DishCommand for DishService<R, G, I>
where
    R: DishRepository + ?Sized,
    G: Geocoder + ?Sized,
    I: ImageStore + ?Sized,
{
    async fn create_dish(&self, request: CreateDishRequest) -> Result<CreateDishResponse, Error> {
        let CreateDishRequest {
            owner_id,
            draft,
            image_path,
        } = request;

        let coordinates = self
            .geocoder
            .geocode(&draft.address)
            .await
            .map_err(map_geocode_error)?;

        let owner = self
            .dishes
            .find_owner(&owner_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(&owner_id))?;

        let dish = Dish::create(draft, coordinates, image_path, owner.id().clone());
        self.dishes
            .commit(TransactionContext::for_created_dish(dish.clone()))
            .await
            .map_err(|err| map_commit_error(err, "Creating dish failed, please try again."))?;

        info!(dish_id = %dish.id(), owner_id = %owner_id, "dish created");
        Ok(CreateDishResponse { dish })
    }

    async fn update_dish(&self, request: UpdateDishRequest) -> Result<UpdateDishResponse, Error> {
        let UpdateDishRequest {
            dish_id,
            caller_id,
            patch,
        } = request;

        let dish = self.load_dish(dish_id).await?;
        if !dish.is_owned_by(&caller_id) {
            return Err(Error::forbidden("You are not allowed to edit this dish."));
        }

        let dish = self
            .dishes
            .update_dish_content(&dish_id, &patch)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| dish_not_found(dish_id))?;

        Ok(UpdateDishResponse { dish })
    }

    async fn delete_dish(&self, request: DeleteDishRequest) -> Result<DeleteDishResponse, Error> {
        let DeleteDishRequest { dish_id, caller_id } = request;

        let dish = self.load_dish(dish_id).await?;
        if !dish.is_owned_by(&caller_id) {
            return Err(Error::forbidden("You are not allowed to delete this dish."));
        }

        let image_path = dish.image_path().clone();
        self.dishes
            .commit(TransactionContext::for_deleted_dish(&dish))
            .await
            .map_err(|err| map_commit_error(err, "Something went wrong, could not delete dish."))?;
        info!(dish_id = %dish_id, owner_id = %caller_id, "dish deleted");

        // The delete has committed; image cleanup can only be reported.
        let image_removed = match self.images.remove(&image_path).await {
            Ok(()) => true,
            Err(error) => {
                warn!(error = %error, path = %image_path, "failed to remove dish image");
                false
            }
        };

        Ok(DeleteDishResponse {
            dish_id,
            image_removed,
        })
    }
}

#[async_trait]
impl<R, G, I> DishQuery for DishService<R, G, I>
where
    R: DishRepository + ?Sized,
    G: Send + Sync + ?Sized,
    I: Send + Sync + ?Sized,
{
    async fn get_dish(&self, request: GetDishRequest) -> Result<GetDishResponse, Error> {
        let dish = self.load_dish(request.dish_id).await?;
        Ok(GetDishResponse { dish })
    }

    async fn list_user_dishes(
        &self,
        request: ListUserDishesRequest,
    ) -> Result<ListUserDishesResponse, Error> {
        let dishes = self
            .dishes
            .find_dishes_by_owner(&request.user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(&request.user_id))?;

        Ok(ListUserDishesResponse { dishes })
    }

    async fn image_usage(&self, request: ImageUsageRequest) -> Result<ImageUsageResponse, Error> {
        let in_use = self
            .dishes
            .image_in_use(&request.image_path)
            .await
            .map_err(map_repository_error)?;
        Ok(ImageUsageResponse { in_use })
    }
}

#[cfg(test)]
#[path = "dish_service_tests.rs"]
mod tests;
