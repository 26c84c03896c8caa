//! Tests for the in-memory store.

use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    Address, Coordinates, DishDescription, DishDraft, DishName, DishTitle, DisplayName, ImagePath,
    Stars,
};

#[fixture]
fn owner() -> User {
    User::new(UserId::random(), DisplayName::new("Ada Lovelace").expect("name"))
}

fn dish_for(owner: &User) -> Dish {
    Dish::create(
        DishDraft {
            title: DishTitle::new("Speedy's Cafe").expect("title"),
            description: DishDescription::new("Excellent bacon sandwich").expect("description"),
            address: Address::new("221B Baker St").expect("address"),
            stars: Stars::new(5).expect("stars"),
            name: DishName::new("Bacon sandwich").expect("name"),
        },
        Coordinates::new(51.5, -0.15).expect("coordinates"),
        ImagePath::new("uploads/images/sandwich.png").expect("image"),
        owner.id().clone(),
    )
}

async fn store_with(owner: &User) -> MemoryStore {
    let store = MemoryStore::new();
    store.upsert(owner).await.expect("seed user");
    store
}

#[rstest]
#[tokio::test]
async fn created_dish_is_linked_from_owner(owner: User) {
    let store = store_with(&owner).await;
    let dish = dish_for(&owner);

    store
        .commit(TransactionContext::for_created_dish(dish.clone()))
        .await
        .expect("commit");

    let stored_owner = store.find_owner(owner.id()).await.expect("read").expect("owner");
    assert_eq!(stored_owner.dish_ids(), &[dish.id()]);
    assert_eq!(store.find_dish(&dish.id()).await.expect("read"), Some(dish));
}

#[rstest]
#[tokio::test]
async fn failed_commit_leaves_state_untouched(owner: User) {
    let store = store_with(&owner).await;
    let dish = dish_for(&owner);
    store.fail_next_commit_after(1).await;

    let error = store
        .commit(TransactionContext::for_created_dish(dish.clone()))
        .await
        .expect_err("injected failure");

    assert!(matches!(error, DishRepositoryError::Query { .. }));
    assert_eq!(store.dish_count().await, 0);
    let stored_owner = store.find_owner(owner.id()).await.expect("read").expect("owner");
    assert!(stored_owner.dish_ids().is_empty());
}

#[rstest]
#[tokio::test]
async fn missing_reference_rolls_back_delete(owner: User) {
    let store = store_with(&owner).await;
    let dish = dish_for(&owner);
    // Insert without linking so the reference removal has nothing to match.
    store
        .commit(TransactionContext::begin().insert_dish(dish.clone()))
        .await
        .expect("insert");

    let error = store
        .commit(TransactionContext::for_deleted_dish(&dish))
        .await
        .expect_err("missing reference");

    assert!(matches!(error, DishRepositoryError::MissingTarget { .. }));
    assert!(store.find_dish(&dish.id()).await.expect("read").is_some());
}

#[rstest]
#[tokio::test]
async fn dish_for_unknown_owner_is_rejected(owner: User) {
    let store = MemoryStore::new();
    let error = store
        .commit(TransactionContext::for_created_dish(dish_for(&owner)))
        .await
        .expect_err("no owner row");

    assert!(matches!(error, DishRepositoryError::Query { .. }));
}

#[rstest]
#[tokio::test]
async fn upsert_keeps_existing_references(owner: User) {
    let store = store_with(&owner).await;
    let dish = dish_for(&owner);
    store
        .commit(TransactionContext::for_created_dish(dish.clone()))
        .await
        .expect("commit");

    let renamed = User::new(owner.id().clone(), DisplayName::new("Ada King").expect("name"));
    store.upsert(&renamed).await.expect("upsert");

    let stored = store.find_by_id(owner.id()).await.expect("read").expect("user");
    assert_eq!(stored.display_name().to_string(), "Ada King");
    assert_eq!(stored.dish_ids(), &[dish.id()]);
}

#[rstest]
#[tokio::test]
async fn listing_follows_creation_order(owner: User) {
    let store = store_with(&owner).await;
    let first = dish_for(&owner);
    let second = dish_for(&owner);
    for dish in [&first, &second] {
        store
            .commit(TransactionContext::for_created_dish(dish.clone()))
            .await
            .expect("commit");
    }

    let listed = store
        .find_dishes_by_owner(owner.id())
        .await
        .expect("read")
        .expect("owner exists");
    let ids: Vec<_> = listed.iter().map(Dish::id).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
    assert!(store.find_dishes_by_owner(&UserId::random()).await.expect("read").is_none());
}

#[rstest]
#[tokio::test]
async fn image_usage_tracks_stored_dishes(owner: User) {
    let store = store_with(&owner).await;
    let dish = dish_for(&owner);
    let path = dish.image_path().clone();
    assert!(!store.image_in_use(&path).await.expect("read"));

    store
        .commit(TransactionContext::for_created_dish(dish.clone()))
        .await
        .expect("commit");
    assert!(store.image_in_use(&path).await.expect("read"));

    store
        .commit(TransactionContext::for_deleted_dish(&dish))
        .await
        .expect("commit");
    assert!(!store.image_in_use(&path).await.expect("read"));
}
