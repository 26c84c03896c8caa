//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Address, Coordinates, Dish, DishDescription, DishId, DishName, DishParts, DishTitle,
    DishValidationError, DisplayName, ImagePath, Stars, User, UserId, UserValidationError,
};

use super::schema::{dishes, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub dish_ids: Vec<Uuid>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserValidationError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let display_name = DisplayName::new(row.display_name)?;
        let dish_ids = row.dish_ids.into_iter().map(DishId::from_uuid).collect();
        Ok(User::with_dish_ids(
            UserId::from_uuid(row.id),
            display_name,
            dish_ids,
        ))
    }
}

/// Insertable struct for new user records; `dish_ids` takes its default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
}

/// Row struct for reading from the dishes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dishes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DishRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub stars: i16,
    pub name: String,
    pub image_path: String,
    pub creator_id: Uuid,
}

impl TryFrom<DishRow> for Dish {
    type Error = DishValidationError;

    fn try_from(row: DishRow) -> Result<Self, Self::Error> {
        Ok(Dish::from_parts(DishParts {
            id: DishId::from_uuid(row.id),
            title: DishTitle::new(row.title)?,
            description: DishDescription::new(row.description)?,
            address: Address::new(row.address)?,
            coordinates: Coordinates::new(row.latitude, row.longitude)?,
            stars: Stars::new(i64::from(row.stars))?,
            name: DishName::new(row.name)?,
            image_path: ImagePath::new(row.image_path)?,
            creator_id: UserId::from_uuid(row.creator_id),
        }))
    }
}

/// Insertable struct for new dish records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dishes)]
pub(crate) struct NewDishRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub address: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub stars: i16,
    pub name: &'a str,
    pub image_path: &'a str,
    pub creator_id: Uuid,
}

impl<'a> From<&'a Dish> for NewDishRow<'a> {
    fn from(dish: &'a Dish) -> Self {
        let coordinates = dish.coordinates();
        Self {
            id: *dish.id().as_uuid(),
            title: dish.title().as_ref(),
            description: dish.description().as_ref(),
            address: dish.address().as_ref(),
            latitude: coordinates.lat(),
            longitude: coordinates.lng(),
            stars: i16::from(dish.stars().get()),
            name: dish.name().as_ref(),
            image_path: dish.image_path().as_ref(),
            creator_id: *dish.creator_id().as_uuid(),
        }
    }
}

/// Changeset for the mutable part of a dish.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = dishes)]
pub(crate) struct DishContentUpdate<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub updated_at: DateTime<Utc>,
}
