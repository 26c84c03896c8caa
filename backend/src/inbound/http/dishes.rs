//! Dish HTTP handlers.
//!
//! ```text
//! GET    /api/v1/dishes/{dish_id}
//! GET    /api/v1/dishes/user/{user_id}
//! POST   /api/v1/dishes
//! PATCH  /api/v1/dishes/{dish_id}
//! DELETE /api/v1/dishes/{dish_id}
//! ```
//!
//! Reads are public; writes require a session.

use std::path::Component;

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;

use crate::domain::ports::{
    CreateDishRequest, DeleteDishRequest, GetDishRequest, ImageUsageRequest, ImageUsageResponse,
    ListUserDishesRequest, UpdateDishRequest,
};
use crate::domain::{
    Address, Dish, DishDescription, DishDraft, DishName, DishPatch, DishTitle,
    DishValidationError, Error, ErrorCode, ImagePath, Stars, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, dish_validation_error, parse_dish_id, parse_user_id,
};

const DISH_ID_FIELD: FieldName = FieldName::new("dishId");
const USER_ID_FIELD: FieldName = FieldName::new("userId");

/// Request body for `POST /api/v1/dishes`.
///
/// `image` is the path the upload layer stored the photo under.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishRequestBody {
    #[schema(example = "Luigi's")]
    pub title: String,
    pub description: String,
    #[schema(example = "221B Baker St")]
    pub address: String,
    #[schema(minimum = 1, maximum = 5)]
    pub stars: i64,
    #[schema(example = "Margherita")]
    pub name: String,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6/pizza.jpg")]
    pub image: String,
}

impl TryFrom<CreateDishRequestBody> for DishDraft {
    type Error = DishValidationError;

    fn try_from(value: CreateDishRequestBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: DishTitle::new(value.title)?,
            description: DishDescription::new(value.description)?,
            address: Address::new(value.address)?,
            stars: Stars::new(value.stars)?,
            name: DishName::new(value.name)?,
        })
    }
}

/// Request body for `PATCH /api/v1/dishes/{dish_id}`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDishRequestBody {
    pub title: String,
    pub description: String,
}

impl TryFrom<UpdateDishRequestBody> for DishPatch {
    type Error = DishValidationError;

    fn try_from(value: UpdateDishRequestBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: DishTitle::new(value.title)?,
            description: DishDescription::new(value.description)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct LocationBody {
    pub lat: f64,
    pub lng: f64,
}

/// Wire form of a dish.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishBody {
    pub id: String,
    pub title: String,
    pub description: String,
    pub address: String,
    pub location: LocationBody,
    pub stars: u8,
    pub name: String,
    pub image: String,
    pub creator_id: String,
}

impl From<&Dish> for DishBody {
    fn from(dish: &Dish) -> Self {
        let coordinates = dish.coordinates();
        Self {
            id: dish.id().to_string(),
            title: dish.title().to_string(),
            description: dish.description().as_ref().to_owned(),
            address: dish.address().to_string(),
            location: LocationBody {
                lat: coordinates.lat(),
                lng: coordinates.lng(),
            },
            stars: dish.stars().get(),
            name: dish.name().to_string(),
            image: dish.image_path().to_string(),
            creator_id: dish.creator_id().to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DishEnvelope {
    pub dish: DishBody,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DishListEnvelope {
    pub dishes: Vec<DishBody>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MessageBody {
    pub message: String,
}

fn envelope(dish: &Dish) -> DishEnvelope {
    DishEnvelope {
        dish: DishBody::from(dish),
    }
}

/// Fetch one dish.
#[utoipa::path(
    get,
    path = "/api/v1/dishes/{dish_id}",
    params(("dish_id" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Dish", body = DishEnvelope),
        (status = 404, description = "Not found", body = Error),
        (status = 422, description = "Invalid identifier", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["dishes"],
    operation_id = "getDish",
    security([])
)]
#[get("/dishes/{dish_id}")]
pub async fn get_dish(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DishEnvelope>> {
    let dish_id = parse_dish_id(&path, DISH_ID_FIELD)?;
    let response = state
        .dish_queries
        .get_dish(GetDishRequest { dish_id })
        .await?;
    Ok(web::Json(envelope(&response.dish)))
}

/// List a user's dishes in the order they were linked.
#[utoipa::path(
    get,
    path = "/api/v1/dishes/user/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Dishes", body = DishListEnvelope),
        (status = 404, description = "Unknown user", body = Error),
        (status = 422, description = "Invalid identifier", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["dishes"],
    operation_id = "listUserDishes",
    security([])
)]
#[get("/dishes/user/{user_id}")]
pub async fn list_user_dishes(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DishListEnvelope>> {
    let user_id = parse_user_id(&path, USER_ID_FIELD)?;
    let response = state
        .dish_queries
        .list_user_dishes(ListUserDishesRequest { user_id })
        .await?;
    Ok(web::Json(DishListEnvelope {
        dishes: response.dishes.iter().map(DishBody::from).collect(),
    }))
}

/// Create a dish for the session user.
///
/// When creation is rejected after the image path validated, the upload is
/// discarded if it lives under the caller's own upload directory and no
/// stored dish references it.
#[utoipa::path(
    post,
    path = "/api/v1/dishes",
    request_body = CreateDishRequestBody,
    responses(
        (status = 201, description = "Created", body = DishEnvelope),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Owner not found", body = Error),
        (status = 422, description = "Invalid request or address", body = Error),
        (status = 500, description = "Transaction failed", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["dishes"],
    operation_id = "createDish",
    security(("SessionCookie" = []))
)]
#[post("/dishes")]
pub async fn create_dish(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDishRequestBody>,
) -> ApiResult<HttpResponse> {
    let owner_id = session.require_user_id()?;
    let body = payload.into_inner();
    let image_path = ImagePath::new(body.image.as_str()).map_err(dish_validation_error)?;

    let result = match DishDraft::try_from(body) {
        Ok(draft) => {
            state
                .dishes
                .create_dish(CreateDishRequest {
                    owner_id: owner_id.clone(),
                    draft,
                    image_path: image_path.clone(),
                })
                .await
        }
        Err(error) => Err(dish_validation_error(error)),
    };

    match result {
        Ok(response) => Ok(HttpResponse::Created().json(envelope(&response.dish))),
        Err(error) => {
            if leaves_upload_unclaimed(&error) {
                discard_upload(&state, &owner_id, &image_path).await;
            }
            Err(error)
        }
    }
}

/// Uploads are stored as `<user id>/<file>`; anything else is not the
/// caller's to delete.
fn is_callers_upload(owner_id: &UserId, path: &ImagePath) -> bool {
    let mut components = path.as_path().components();
    let owner: &str = owner_id.as_ref();
    matches!(components.next(), Some(Component::Normal(first)) if first == owner)
        && components.next().is_some()
}

/// Storage outages and aborted commits leave the outcome of earlier
/// attempts unknown, so the upload is kept.
fn leaves_upload_unclaimed(error: &Error) -> bool {
    !matches!(
        error.code(),
        ErrorCode::ServiceUnavailable | ErrorCode::TransactionFailed | ErrorCode::InternalError
    )
}

async fn discard_upload(state: &HttpState, owner_id: &UserId, path: &ImagePath) {
    if !is_callers_upload(owner_id, path) {
        debug!(path = %path, "upload kept; not under the caller's directory");
        return;
    }
    let usage = state
        .dish_queries
        .image_usage(ImageUsageRequest {
            image_path: path.clone(),
        })
        .await;
    match usage {
        Ok(ImageUsageResponse { in_use: false }) => {}
        Ok(ImageUsageResponse { in_use: true }) => {
            debug!(path = %path, "upload kept; a stored dish references it");
            return;
        }
        Err(error) => {
            warn!(path = %path, %error, "upload kept; reference check failed");
            return;
        }
    }
    if let Err(error) = state.uploads.remove(path).await {
        warn!(path = %path, %error, "failed to discard upload after create failure");
    }
}

/// Replace title and description of a dish the session user created.
#[utoipa::path(
    patch,
    path = "/api/v1/dishes/{dish_id}",
    params(("dish_id" = String, Path, description = "Dish identifier")),
    request_body = UpdateDishRequestBody,
    responses(
        (status = 200, description = "Updated", body = DishEnvelope),
        (status = 401, description = "Unauthorised or not the creator", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 422, description = "Invalid request", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["dishes"],
    operation_id = "updateDish",
    security(("SessionCookie" = []))
)]
#[patch("/dishes/{dish_id}")]
pub async fn update_dish(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateDishRequestBody>,
) -> ApiResult<web::Json<DishEnvelope>> {
    let caller_id = session.require_user_id()?;
    let dish_id = parse_dish_id(&path, DISH_ID_FIELD)?;
    let patch = DishPatch::try_from(payload.into_inner()).map_err(dish_validation_error)?;
    let response = state
        .dishes
        .update_dish(UpdateDishRequest {
            dish_id,
            caller_id,
            patch,
        })
        .await?;
    Ok(web::Json(envelope(&response.dish)))
}

/// Delete a dish the session user created.
#[utoipa::path(
    delete,
    path = "/api/v1/dishes/{dish_id}",
    params(("dish_id" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Deleted", body = MessageBody),
        (status = 401, description = "Unauthorised or not the creator", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 422, description = "Invalid identifier", body = Error),
        (status = 500, description = "Transaction failed", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["dishes"],
    operation_id = "deleteDish",
    security(("SessionCookie" = []))
)]
#[delete("/dishes/{dish_id}")]
pub async fn delete_dish(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MessageBody>> {
    let caller_id = session.require_user_id()?;
    let dish_id = parse_dish_id(&path, DISH_ID_FIELD)?;
    state
        .dishes
        .delete_dish(DeleteDishRequest { dish_id, caller_id })
        .await?;
    Ok(web::Json(MessageBody {
        message: "Deleted dish.".to_owned(),
    }))
}
