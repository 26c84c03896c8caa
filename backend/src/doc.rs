//! OpenAPI document for the REST API.
//!
//! Served through Swagger UI in debug builds and exported by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::dishes::{
    CreateDishRequestBody, DishBody, DishEnvelope, DishListEnvelope, LocationBody, MessageBody,
    UpdateDishRequestBody,
};
use crate::inbound::http::users::LoginRequest;

/// Registers the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Dishshare API",
        description = "Dish reviews with geocoded addresses and uploaded photos."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::dishes::get_dish,
        crate::inbound::http::dishes::list_user_dishes,
        crate::inbound::http::dishes::create_dish,
        crate::inbound::http::dishes::update_dish,
        crate::inbound::http::dishes::delete_dish,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        CreateDishRequestBody,
        UpdateDishRequestBody,
        LocationBody,
        DishBody,
        DishEnvelope,
        DishListEnvelope,
        MessageBody,
    )),
    tags(
        (name = "dishes", description = "Dish reviews"),
        (name = "users", description = "Login"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
