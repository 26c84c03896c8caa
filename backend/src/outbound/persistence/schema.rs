//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly.

diesel::table! {
    /// Users who own dishes.
    ///
    /// `dish_ids` lists the user's dishes in creation order and is only
    /// changed inside dish transactions.
    users (id) {
        id -> Uuid,
        /// Display name (max 32 characters).
        display_name -> Varchar,
        dish_ids -> Array<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviewed dishes.
    dishes (id) {
        id -> Uuid,
        /// Restaurant name.
        title -> Text,
        description -> Text,
        address -> Text,
        latitude -> Float8,
        longitude -> Float8,
        /// Rating between 1 and 5 inclusive (CHECK constraint).
        stars -> Int2,
        name -> Text,
        /// Upload path relative to the uploads directory.
        image_path -> Text,
        creator_id -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(dishes -> users (creator_id));
diesel::allow_tables_to_appear_in_same_query!(dishes, users);
