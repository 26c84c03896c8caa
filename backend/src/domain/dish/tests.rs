//! Tests for dish values and the aggregate.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn draft() -> DishDraft {
    DishDraft {
        title: DishTitle::new("Speedy's Cafe").expect("title"),
        description: DishDescription::new("Excellent bacon sandwich").expect("description"),
        address: Address::new("221B Baker St").expect("address"),
        stars: Stars::new(4).expect("stars"),
        name: DishName::new("Bacon sandwich").expect("name"),
    }
}

#[rstest]
#[case(0)]
#[case(6)]
#[case(-1)]
#[case(300)]
fn stars_outside_range_are_rejected(#[case] value: i64) {
    assert_eq!(
        Stars::new(value).expect_err("out of range"),
        DishValidationError::StarsOutOfRange { value }
    );
}

#[rstest]
#[case(1)]
#[case(5)]
fn stars_at_bounds_are_accepted(#[case] value: i64) {
    let stars = Stars::new(value).expect("in range");
    assert_eq!(i64::from(stars.get()), value);
}

#[rstest]
#[case(f64::NAN, 0.0, DishValidationError::NonFiniteCoordinate)]
#[case(0.0, f64::INFINITY, DishValidationError::NonFiniteCoordinate)]
#[case(90.5, 0.0, DishValidationError::LatitudeOutOfRange)]
#[case(0.0, -180.5, DishValidationError::LongitudeOutOfRange)]
fn coordinates_are_validated(
    #[case] lat: f64,
    #[case] lng: f64,
    #[case] expected: DishValidationError,
) {
    assert_eq!(Coordinates::new(lat, lng).expect_err("invalid"), expected);
}

#[rstest]
fn text_values_are_trimmed() {
    let title = DishTitle::new("  Speedy's Cafe \n").expect("title");
    assert_eq!(title.as_ref(), "Speedy's Cafe");
}

#[rstest]
#[case("   ", DishValidationError::EmptyField { field: "description" })]
#[case("good", DishValidationError::DescriptionTooShort { min: DESCRIPTION_MIN_CHARS })]
#[case(" ok ", DishValidationError::DescriptionTooShort { min: DESCRIPTION_MIN_CHARS })]
fn short_descriptions_are_rejected(#[case] raw: &str, #[case] expected: DishValidationError) {
    assert_eq!(DishDescription::new(raw).expect_err("invalid"), expected);
}

#[rstest]
#[case(" abcd ")]
#[case("abcde")]
#[case("Crisp base, sweet tomatoes.")]
fn descriptions_count_every_submitted_character(#[case] raw: &str) {
    let description = DishDescription::new(raw).expect("long enough");
    assert_eq!(description.as_ref(), raw);
}

#[rstest]
#[case("uploads/images/photo.png", true)]
#[case("photo.jpeg", true)]
#[case("/etc/passwd", false)]
#[case("../secrets.png", false)]
#[case("images/../../escape.png", false)]
#[case("./photo.png", false)]
#[case("", false)]
fn image_paths_stay_relative(#[case] raw: &str, #[case] accepted: bool) {
    assert_eq!(ImagePath::new(raw).is_ok(), accepted, "path {raw:?}");
}

#[rstest]
fn validation_errors_name_their_field() {
    assert_eq!(DishValidationError::EmptyField { field: "address" }.field(), "address");
    assert_eq!(DishValidationError::StarsOutOfRange { value: 9 }.field(), "stars");
    assert_eq!(DishValidationError::InvalidImagePath.field(), "image");
}

#[rstest]
fn created_dish_belongs_to_creator(draft: DishDraft) {
    let owner = UserId::random();
    let dish = Dish::create(
        draft,
        Coordinates::new(51.5, -0.15).expect("coordinates"),
        ImagePath::new("uploads/images/sandwich.png").expect("image"),
        owner.clone(),
    );

    assert!(dish.is_owned_by(&owner));
    assert!(!dish.is_owned_by(&UserId::random()));
    assert_eq!(dish.coordinates().lat(), 51.5);
    assert_eq!(dish.address().as_ref(), "221B Baker St");
}

#[rstest]
fn patch_replaces_only_title_and_description(draft: DishDraft) {
    let dish = Dish::create(
        draft,
        Coordinates::new(51.5, -0.15).expect("coordinates"),
        ImagePath::new("uploads/images/sandwich.png").expect("image"),
        UserId::random(),
    );
    let patched = dish.with_patch(DishPatch {
        title: DishTitle::new("Speedy's").expect("title"),
        description: DishDescription::new("Still excellent").expect("description"),
    });

    assert_eq!(patched.id(), dish.id());
    assert_eq!(patched.title().as_ref(), "Speedy's");
    assert_eq!(patched.description().as_ref(), "Still excellent");
    assert_eq!(patched.name(), dish.name());
    assert_eq!(patched.stars(), dish.stars());
    assert_eq!(patched.image_path(), dish.image_path());
}
