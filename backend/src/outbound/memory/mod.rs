//! In-process storage adapter for local runs and tests.
//!
//! [`MemoryStore`] implements both the dish and user repository ports over
//! one lock. Commits apply their writes to a copy of the current state and
//! publish it only when every write succeeded, so a failing transaction
//! leaves nothing behind.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::ports::{
    DishRepository, DishRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Dish, DishId, DishPatch, DishWrite, ImagePath, TransactionContext, User, UserId,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    dishes: HashMap<DishId, Dish>,
}

impl Tables {
    fn apply(&mut self, write: DishWrite) -> Result<(), DishRepositoryError> {
        match write {
            DishWrite::InsertDish(dish) => {
                if !self.users.contains_key(dish.creator_id()) {
                    return Err(DishRepositoryError::query("referenced record missing"));
                }
                if self.dishes.contains_key(&dish.id()) {
                    return Err(DishRepositoryError::query("duplicate dish id"));
                }
                self.dishes.insert(dish.id(), dish);
                Ok(())
            }
            DishWrite::AppendOwnerReference { owner_id, dish_id } => {
                let user = self
                    .users
                    .get_mut(&owner_id)
                    .ok_or_else(|| DishRepositoryError::missing_target(format!("user {owner_id}")))?;
                user.push_dish(dish_id);
                Ok(())
            }
            DishWrite::DeleteDish { dish_id } => self
                .dishes
                .remove(&dish_id)
                .map(|_| ())
                .ok_or_else(|| DishRepositoryError::missing_target(format!("dish {dish_id}"))),
            DishWrite::RemoveOwnerReference { owner_id, dish_id } => {
                let removed = self
                    .users
                    .get_mut(&owner_id)
                    .is_some_and(|user| user.pull_dish(&dish_id));
                if removed {
                    Ok(())
                } else {
                    Err(DishRepositoryError::missing_target(format!(
                        "reference to dish {dish_id} on user {owner_id}"
                    )))
                }
            }
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    tables: Tables,
    fail_after: Option<usize>,
}

/// Shared in-memory users and dishes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store with no users or dishes.
    ///
    /// ```
    /// use dishshare::outbound::memory::MemoryStore;
    ///
    /// let store = MemoryStore::new();
    /// let count = tokio::runtime::Runtime::new()
    ///     .expect("runtime")
    ///     .block_on(store.dish_count());
    /// assert_eq!(count, 0);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next commit fail once `applied` of its writes have run.
    ///
    /// The partially applied writes are discarded with the failed commit.
    pub async fn fail_next_commit_after(&self, applied: usize) {
        self.inner.lock().await.fail_after = Some(applied);
    }

    /// Number of stored dishes.
    pub async fn dish_count(&self) -> usize {
        self.inner.lock().await.tables.dishes.len()
    }
}

#[async_trait]
impl DishRepository for MemoryStore {
    async fn find_dish(&self, id: &DishId) -> Result<Option<Dish>, DishRepositoryError> {
        Ok(self.inner.lock().await.tables.dishes.get(id).cloned())
    }

    async fn find_owner(&self, id: &UserId) -> Result<Option<User>, DishRepositoryError> {
        Ok(self.inner.lock().await.tables.users.get(id).cloned())
    }

    async fn find_dishes_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Vec<Dish>>, DishRepositoryError> {
        let guard = self.inner.lock().await;
        let tables = &guard.tables;
        Ok(tables.users.get(owner_id).map(|user| {
            user.dish_ids()
                .iter()
                .filter_map(|id| tables.dishes.get(id).cloned())
                .collect()
        }))
    }

    async fn image_in_use(&self, path: &ImagePath) -> Result<bool, DishRepositoryError> {
        let guard = self.inner.lock().await;
        Ok(guard
            .tables
            .dishes
            .values()
            .any(|dish| dish.image_path() == path))
    }

    async fn update_dish_content(
        &self,
        id: &DishId,
        patch: &DishPatch,
    ) -> Result<Option<Dish>, DishRepositoryError> {
        let mut guard = self.inner.lock().await;
        Ok(guard.tables.dishes.get_mut(id).map(|dish| {
            *dish = dish.with_patch(patch.clone());
            dish.clone()
        }))
    }

    async fn commit(&self, tx: TransactionContext) -> Result<(), DishRepositoryError> {
        let mut guard = self.inner.lock().await;
        let fail_after = guard.fail_after.take();
        let mut staged = guard.tables.clone();

        for (index, write) in tx.into_writes().into_iter().enumerate() {
            if fail_after == Some(index) {
                debug!(applied = index, "injected commit failure");
                return Err(DishRepositoryError::query("injected commit failure"));
            }
            staged.apply(write)?;
        }

        guard.tables = staged;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn upsert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut guard = self.inner.lock().await;
        let users = &mut guard.tables.users;
        let dish_ids = users
            .get(user.id())
            .map(|existing| existing.dish_ids().to_vec())
            .unwrap_or_default();
        users.insert(
            user.id().clone(),
            User::with_dish_ids(user.id().clone(), user.display_name().clone(), dish_ids),
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.inner.lock().await.tables.users.get(id).cloned())
    }
}

#[cfg(test)]
mod tests;
