//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep these in lockstep with the SQL; `diesel print-schema` against a
//! migrated database regenerates them.

diesel::table! {
    /// Accounts mirrored from the identity provider. `id` is the provider's
    /// opaque subject.
    users (id) {
        id -> Varchar,
        email -> Nullable<Varchar>,
        first_name -> Nullable<Varchar>,
        last_name -> Nullable<Varchar>,
        profile_image_url -> Nullable<Varchar>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue entries. `part_number` is unique.
    products (id) {
        id -> Uuid,
        name -> Text,
        part_number -> Varchar,
        description -> Text,
        category -> Varchar,
        price -> Numeric,
        stock -> Int4,
        image_url -> Nullable<Text>,
        compatible_models -> Array<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cart lines; unique per `(user_id, product_id)`.
    cart_items (id) {
        id -> Uuid,
        user_id -> Varchar,
        product_id -> Uuid,
        quantity -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(cart_items -> users (user_id));
diesel::joinable!(cart_items -> products (product_id));

diesel::allow_tables_to_appear_in_same_query!(cart_items, products, users);
