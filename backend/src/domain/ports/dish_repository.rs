//! Driven port for dish storage.
//!
//! Reads are single-statement lookups. Every write that touches both a dish
//! and its owner's back-references goes through [`DishRepository::commit`],
//! which must apply the whole [`TransactionContext`] atomically.

use async_trait::async_trait;

use crate::domain::{Dish, DishId, DishPatch, ImagePath, TransactionContext, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by dish repository adapters.
    pub enum DishRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "dish repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "dish repository query failed: {message}",
        /// A transactional write matched no row; the transaction was rolled back.
        MissingTarget { message: String } => "dish transaction target missing: {message}",
    }
}

/// Port for reading dishes and committing dish/owner transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishRepository: Send + Sync {
    /// Fetch a dish by identifier.
    async fn find_dish(&self, id: &DishId) -> Result<Option<Dish>, DishRepositoryError>;

    /// Fetch a dish owner together with its back-references.
    async fn find_owner(&self, id: &UserId) -> Result<Option<User>, DishRepositoryError>;

    /// List the dishes referenced by a user, in back-reference order.
    ///
    /// Returns `None` when the user does not exist.
    async fn find_dishes_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Vec<Dish>>, DishRepositoryError>;

    /// Whether any stored dish points at `path`.
    async fn image_in_use(&self, path: &ImagePath) -> Result<bool, DishRepositoryError>;

    /// Overwrite the title and description of one dish.
    ///
    /// Returns `None` when the dish no longer exists.
    async fn update_dish_content(
        &self,
        id: &DishId,
        patch: &DishPatch,
    ) -> Result<Option<Dish>, DishRepositoryError>;

    /// Apply every write in `tx` atomically, in order.
    ///
    /// # Errors
    ///
    /// Any failure leaves storage exactly as it was before the call. A write
    /// that matches no row fails with [`DishRepositoryError::MissingTarget`].
    async fn commit(&self, tx: TransactionContext) -> Result<(), DishRepositoryError>;
}
