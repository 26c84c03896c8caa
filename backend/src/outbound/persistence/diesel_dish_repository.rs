//! PostgreSQL-backed `DishRepository` implementation using Diesel ORM.
//!
//! Transactions are applied write by write inside one database transaction.
//! Owner back-references are edited with `array_append`/`array_remove` so the
//! `users` row is never read and rewritten, which keeps concurrent dish
//! creations for the same user from losing updates.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DishRepository, DishRepositoryError};
use crate::domain::{
    Dish, DishId, DishPatch, DishWrite, ImagePath, TransactionContext, User, UserId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DishContentUpdate, DishRow, NewDishRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{dishes, users};

const APPEND_REFERENCE_SQL: &str = r#"
UPDATE users
SET dish_ids = CASE WHEN $1 = ANY(dish_ids) THEN dish_ids ELSE array_append(dish_ids, $1) END,
    updated_at = now()
WHERE id = $2
"#;

const REMOVE_REFERENCE_SQL: &str = r#"
UPDATE users
SET dish_ids = array_remove(dish_ids, $1),
    updated_at = now()
WHERE id = $2 AND $1 = ANY(dish_ids)
"#;

/// Diesel-backed implementation of the `DishRepository` port.
#[derive(Clone)]
pub struct DieselDishRepository {
    pool: DbPool,
}

impl DieselDishRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> DishRepositoryError {
    map_pool_error(error, DishRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> DishRepositoryError {
    map_diesel_error(
        error,
        DishRepositoryError::query,
        DishRepositoryError::connection,
    )
}

fn row_to_dish(row: DishRow) -> Result<Dish, DishRepositoryError> {
    let id = row.id;
    Dish::try_from(row)
        .map_err(|err| DishRepositoryError::query(format!("stored dish {id} is invalid: {err}")))
}

fn row_to_user(row: UserRow) -> Result<User, DishRepositoryError> {
    let id = row.id;
    User::try_from(row)
        .map_err(|err| DishRepositoryError::query(format!("stored user {id} is invalid: {err}")))
}

/// Failure inside a dish transaction; either aborts and rolls back.
#[derive(Debug)]
enum CommitError {
    Diesel(diesel::result::Error),
    MissingTarget(String),
}

impl From<diesel::result::Error> for CommitError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<CommitError> for DishRepositoryError {
    fn from(error: CommitError) -> Self {
        match error {
            CommitError::Diesel(err) => diesel_error(err),
            CommitError::MissingTarget(message) => DishRepositoryError::missing_target(message),
        }
    }
}

fn expect_one_row(affected: usize, target: impl FnOnce() -> String) -> Result<(), CommitError> {
    if affected == 1 {
        Ok(())
    } else {
        Err(CommitError::MissingTarget(target()))
    }
}

async fn apply_write(conn: &mut AsyncPgConnection, write: &DishWrite) -> Result<(), CommitError> {
    match write {
        DishWrite::InsertDish(dish) => {
            diesel::insert_into(dishes::table)
                .values(NewDishRow::from(dish))
                .execute(conn)
                .await?;
            Ok(())
        }
        DishWrite::AppendOwnerReference { owner_id, dish_id } => {
            let affected = sql_query(APPEND_REFERENCE_SQL)
                .bind::<SqlUuid, _>(dish_id.as_uuid())
                .bind::<SqlUuid, _>(owner_id.as_uuid())
                .execute(conn)
                .await?;
            expect_one_row(affected, || format!("user {owner_id}"))
        }
        DishWrite::DeleteDish { dish_id } => {
            let affected = diesel::delete(dishes::table.find(dish_id.as_uuid()))
                .execute(conn)
                .await?;
            expect_one_row(affected, || format!("dish {dish_id}"))
        }
        DishWrite::RemoveOwnerReference { owner_id, dish_id } => {
            let affected = sql_query(REMOVE_REFERENCE_SQL)
                .bind::<SqlUuid, _>(dish_id.as_uuid())
                .bind::<SqlUuid, _>(owner_id.as_uuid())
                .execute(conn)
                .await?;
            expect_one_row(affected, || format!("reference to dish {dish_id} on user {owner_id}"))
        }
    }
}

/// Order `rows` by the position of their id in `ids`, dropping strays.
fn order_by_reference(ids: &[Uuid], rows: Vec<DishRow>) -> Vec<DishRow> {
    let mut slots: Vec<Option<DishRow>> = vec![None; ids.len()];
    for row in rows {
        if let Some(index) = ids.iter().position(|id| *id == row.id) {
            slots[index] = Some(row);
        }
    }
    slots.into_iter().flatten().collect()
}

#[async_trait]
impl DishRepository for DieselDishRepository {
    async fn find_dish(&self, id: &DishId) -> Result<Option<Dish>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = dishes::table
            .find(id.as_uuid())
            .select(DishRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_dish).transpose()
    }

    async fn find_owner(&self, id: &UserId) -> Result<Option<User>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_dishes_by_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Option<Vec<Dish>>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let Some(ids) = users::table
            .find(owner_id.as_uuid())
            .select(users::dish_ids)
            .first::<Vec<Uuid>>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
        else {
            return Ok(None);
        };

        if ids.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let rows = dishes::table
            .filter(dishes::id.eq_any(ids.clone()))
            .select(DishRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        order_by_reference(&ids, rows)
            .into_iter()
            .map(row_to_dish)
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    async fn image_in_use(&self, path: &ImagePath) -> Result<bool, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::select(diesel::dsl::exists(
            dishes::table.filter(dishes::image_path.eq(path.as_ref())),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(diesel_error)
    }

    async fn update_dish_content(
        &self,
        id: &DishId,
        patch: &DishPatch,
    ) -> Result<Option<Dish>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let changes = DishContentUpdate {
            title: patch.title.as_ref(),
            description: patch.description.as_ref(),
            updated_at: Utc::now(),
        };
        let row = diesel::update(dishes::table.find(id.as_uuid()))
            .set(&changes)
            .returning(DishRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        row.map(row_to_dish).transpose()
    }

    async fn commit(&self, tx: TransactionContext) -> Result<(), DishRepositoryError> {
        let writes = tx.into_writes();
        if writes.is_empty() {
            return Ok(());
        }

        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let result: Result<(), CommitError> = conn
            .transaction(|conn| {
                async move {
                    for write in &writes {
                        apply_write(conn, write).await?;
                    }
                    Ok(())
                }
                .scope_boxed()
            })
            .await;
        result.map_err(DishRepositoryError::from)
    }
}
