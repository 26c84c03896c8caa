//! Dish aggregate and the validated values it is built from.
//!
//! A dish records one reviewed plate at a restaurant: the restaurant name
//! (`title`), the dish name, a short description, a 1-5 star rating, the
//! restaurant address with its resolved coordinates, the uploaded photo and
//! the creating user.

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Minimum description length in characters.
pub const DESCRIPTION_MIN_CHARS: usize = 5;
/// Lowest accepted star rating.
pub const STARS_MIN: u8 = 1;
/// Highest accepted star rating.
pub const STARS_MAX: u8 = 5;

/// Validation failures raised while building dish values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DishValidationError {
    /// A required text field was blank.
    EmptyField { field: &'static str },
    /// The description is shorter than [`DESCRIPTION_MIN_CHARS`].
    DescriptionTooShort { min: usize },
    /// The rating lies outside `STARS_MIN..=STARS_MAX`.
    StarsOutOfRange { value: i64 },
    /// A coordinate was NaN or infinite.
    NonFiniteCoordinate,
    /// Latitude outside `[-90, 90]`.
    LatitudeOutOfRange,
    /// Longitude outside `[-180, 180]`.
    LongitudeOutOfRange,
    /// The image path is absolute or escapes the uploads directory.
    InvalidImagePath,
}

impl DishValidationError {
    /// Name of the request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field } => field,
            Self::DescriptionTooShort { .. } => "description",
            Self::StarsOutOfRange { .. } => "stars",
            Self::NonFiniteCoordinate | Self::LatitudeOutOfRange | Self::LongitudeOutOfRange => {
                "location"
            }
            Self::InvalidImagePath => "image",
        }
    }
}

impl fmt::Display for DishValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField { field } => write!(f, "{field} must not be empty"),
            Self::DescriptionTooShort { min } => {
                write!(f, "description must be at least {min} characters")
            }
            Self::StarsOutOfRange { value } => {
                write!(f, "stars must be between {STARS_MIN} and {STARS_MAX}, got {value}")
            }
            Self::NonFiniteCoordinate => write!(f, "coordinates must be finite"),
            Self::LatitudeOutOfRange => write!(f, "latitude must be within [-90, 90]"),
            Self::LongitudeOutOfRange => write!(f, "longitude must be within [-180, 180]"),
            Self::InvalidImagePath => {
                write!(f, "image path must be relative and stay inside the uploads directory")
            }
        }
    }
}

impl std::error::Error for DishValidationError {}

/// Dish identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DishId(Uuid);

impl DishId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID read from storage or a request path.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DishId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// WGS84 position produced by the geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Validate and construct coordinates.
    ///
    /// # Examples
    /// ```
    /// use dishshare::domain::Coordinates;
    ///
    /// let baker_street = Coordinates::new(51.5, -0.15).expect("valid position");
    /// assert_eq!(baker_street.lat(), 51.5);
    /// assert!(Coordinates::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Result<Self, DishValidationError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(DishValidationError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(DishValidationError::LatitudeOutOfRange);
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(DishValidationError::LongitudeOutOfRange);
        }
        Ok(Self { lat, lng })
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }
}

/// Star rating between [`STARS_MIN`] and [`STARS_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stars(u8);

impl Stars {
    /// Validate a raw rating.
    pub fn new(value: i64) -> Result<Self, DishValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|stars| (STARS_MIN..=STARS_MAX).contains(stars))
            .map(Self)
            .ok_or(DishValidationError::StarsOutOfRange { value })
    }

    /// Rating as an integer.
    pub fn get(self) -> u8 {
        self.0
    }
}

fn required_text(value: String, field: &'static str) -> Result<String, DishValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DishValidationError::EmptyField { field });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

macro_rules! text_value {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Validate and construct a `", stringify!($name), "`.")]
            pub fn new(value: impl Into<String>) -> Result<Self, DishValidationError> {
                required_text(value.into(), $field).map(Self)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_ref())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

text_value!(
    /// Restaurant name the dish was eaten at.
    DishTitle,
    "title"
);
text_value!(
    /// Name of the dish itself.
    DishName,
    "name"
);
text_value!(
    /// Free-text street address, resolved by the geocoder.
    Address,
    "address"
);

/// Review text of at least [`DESCRIPTION_MIN_CHARS`] characters.
///
/// The text is kept as submitted; surrounding whitespace counts towards the
/// minimum length, but all-blank text is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishDescription(String);

impl DishDescription {
    /// Validate and construct a description.
    pub fn new(value: impl Into<String>) -> Result<Self, DishValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DishValidationError::EmptyField {
                field: "description",
            });
        }
        if value.chars().count() < DESCRIPTION_MIN_CHARS {
            return Err(DishValidationError::DescriptionTooShort {
                min: DESCRIPTION_MIN_CHARS,
            });
        }
        Ok(Self(value))
    }
}

impl AsRef<str> for DishDescription {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DishDescription> for String {
    fn from(value: DishDescription) -> Self {
        value.0
    }
}

/// Location of the uploaded photo relative to the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePath(String);

impl ImagePath {
    /// Validate an upload path.
    ///
    /// Only plain relative components are accepted, so the stored path can
    /// never point outside the uploads directory.
    pub fn new(value: impl Into<String>) -> Result<Self, DishValidationError> {
        let value = required_text(value.into(), "image")?;
        let mut components = Path::new(&value).components().peekable();
        if components.peek().is_none()
            || !components.all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(DishValidationError::InvalidImagePath);
        }
        Ok(Self(value))
    }

    /// Path view for filesystem adapters.
    pub fn as_path(&self) -> &Path {
        Path::new(self.0.as_str())
    }
}

impl AsRef<str> for ImagePath {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Caller-supplied fields for a new dish, before geocoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DishDraft {
    pub title: DishTitle,
    pub description: DishDescription,
    pub address: Address,
    pub stars: Stars,
    pub name: DishName,
}

/// Replacement text for the mutable part of a dish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishPatch {
    pub title: DishTitle,
    pub description: DishDescription,
}

/// Every stored attribute of a dish; used to rehydrate from persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct DishParts {
    pub id: DishId,
    pub title: DishTitle,
    pub description: DishDescription,
    pub address: Address,
    pub coordinates: Coordinates,
    pub stars: Stars,
    pub name: DishName,
    pub image_path: ImagePath,
    pub creator_id: UserId,
}

/// A reviewed dish.
///
/// ## Invariants
/// - `creator_id` names the user whose `dish_ids` contains `id`.
/// - Only `title` and `description` change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Dish {
    id: DishId,
    title: DishTitle,
    description: DishDescription,
    address: Address,
    coordinates: Coordinates,
    stars: Stars,
    name: DishName,
    image_path: ImagePath,
    creator_id: UserId,
}

impl Dish {
    /// Create a new dish with a fresh identifier from a geocoded draft.
    pub fn create(
        draft: DishDraft,
        coordinates: Coordinates,
        image_path: ImagePath,
        creator_id: UserId,
    ) -> Self {
        let DishDraft {
            title,
            description,
            address,
            stars,
            name,
        } = draft;
        Self::from_parts(DishParts {
            id: DishId::random(),
            title,
            description,
            address,
            coordinates,
            stars,
            name,
            image_path,
            creator_id,
        })
    }

    /// Rebuild a dish from stored attributes.
    pub fn from_parts(parts: DishParts) -> Self {
        let DishParts {
            id,
            title,
            description,
            address,
            coordinates,
            stars,
            name,
            image_path,
            creator_id,
        } = parts;
        Self {
            id,
            title,
            description,
            address,
            coordinates,
            stars,
            name,
            image_path,
            creator_id,
        }
    }

    /// Return a copy carrying the patched title and description.
    #[must_use]
    pub fn with_patch(&self, patch: DishPatch) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            ..self.clone()
        }
    }

    /// Dish identifier.
    pub fn id(&self) -> DishId {
        self.id
    }

    /// Restaurant or venue title.
    pub fn title(&self) -> &DishTitle {
        &self.title
    }

    /// Free-text review.
    pub fn description(&self) -> &DishDescription {
        &self.description
    }

    /// Street address as submitted.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Location resolved from the address at creation time.
    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    /// Rating between one and five.
    pub fn stars(&self) -> Stars {
        self.stars
    }

    /// Name of the dish itself.
    pub fn name(&self) -> &DishName {
        &self.name
    }

    /// Uploaded image, relative to the uploads directory.
    pub fn image_path(&self) -> &ImagePath {
        &self.image_path
    }

    /// User who created the dish.
    pub fn creator_id(&self) -> &UserId {
        &self.creator_id
    }

    /// Whether `user_id` created this dish.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.creator_id == user_id
    }
}

#[cfg(test)]
mod tests;
