//! Explicit unit of work for writes that span dishes and their owners.
//!
//! Services describe the writes a use-case needs as a [`TransactionContext`]
//! and hand it to [`DishRepository::commit`]. Adapters apply the writes in
//! order inside one storage transaction: either every write becomes visible
//! or none does. A context that is dropped without being committed has no
//! effect on storage.
//!
//! [`DishRepository::commit`]: crate::domain::ports::DishRepository::commit

use super::{Dish, DishId, UserId};

/// One storage mutation inside a [`TransactionContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum DishWrite {
    /// Insert a new dish row.
    InsertDish(Dish),
    /// Append `dish_id` to the owner's back-reference list.
    AppendOwnerReference { owner_id: UserId, dish_id: DishId },
    /// Delete an existing dish row.
    DeleteDish { dish_id: DishId },
    /// Remove `dish_id` from the owner's back-reference list.
    RemoveOwnerReference { owner_id: UserId, dish_id: DishId },
}

/// Ordered set of writes committed atomically.
///
/// # Examples
/// ```
/// use dishshare::domain::{DishId, DishWrite, TransactionContext, UserId};
///
/// let owner = UserId::random();
/// let dish_id = DishId::random();
/// let tx = TransactionContext::begin()
///     .delete_dish(dish_id)
///     .remove_owner_reference(owner.clone(), dish_id);
/// assert_eq!(tx.writes().len(), 2);
/// assert!(matches!(tx.writes()[0], DishWrite::DeleteDish { .. }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "a transaction context writes nothing until it is committed"]
pub struct TransactionContext {
    writes: Vec<DishWrite>,
}

impl TransactionContext {
    /// Start an empty unit of work.
    pub fn begin() -> Self {
        Self::default()
    }

    /// Writes for creating `dish`: insert it, then link it from its creator.
    pub fn for_created_dish(dish: Dish) -> Self {
        let owner_id = dish.creator_id().clone();
        let dish_id = dish.id();
        Self::begin()
            .insert_dish(dish)
            .append_owner_reference(owner_id, dish_id)
    }

    /// Writes for deleting `dish`: remove it, then unlink it from its creator.
    pub fn for_deleted_dish(dish: &Dish) -> Self {
        Self::begin()
            .delete_dish(dish.id())
            .remove_owner_reference(dish.creator_id().clone(), dish.id())
    }

    /// Queue an insert of `dish`.
    pub fn insert_dish(self, dish: Dish) -> Self {
        self.push(DishWrite::InsertDish(dish))
    }

    /// Queue appending `dish_id` to the owner's reference list; the commit
    /// fails if the owner does not exist.
    pub fn append_owner_reference(self, owner_id: UserId, dish_id: DishId) -> Self {
        self.push(DishWrite::AppendOwnerReference { owner_id, dish_id })
    }

    /// Queue deleting the dish row; the commit fails if it is already gone.
    pub fn delete_dish(self, dish_id: DishId) -> Self {
        self.push(DishWrite::DeleteDish { dish_id })
    }

    /// Queue dropping `dish_id` from the owner's reference list; the commit
    /// fails unless the owner currently holds that reference.
    pub fn remove_owner_reference(self, owner_id: UserId, dish_id: DishId) -> Self {
        self.push(DishWrite::RemoveOwnerReference { owner_id, dish_id })
    }

    fn push(mut self, write: DishWrite) -> Self {
        self.writes.push(write);
        self
    }

    /// Pending writes in application order.
    pub fn writes(&self) -> &[DishWrite] {
        &self.writes
    }

    /// Whether the context holds no writes.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consume the context, yielding its writes for an adapter to apply.
    pub fn into_writes(self) -> Vec<DishWrite> {
        self.writes
    }
}
