//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name supplied at registration.
        name -> Varchar,
        /// Lowercased login email; unique index.
        email -> Varchar,
        /// Argon2id PHC hash string.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Expense records, one owner per row.
    expenses (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user's id.
        user_id -> Uuid,
        /// Spent amount.
        amount -> Float8,
        /// Category label, stored verbatim.
        category -> Varchar,
        /// Free-form description.
        description -> Varchar,
        /// Expense date as a zero-padded ISO `YYYY-MM-DD` string, so range
        /// filters can compare lexicographically.
        date -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Monthly category budgets; unique per (user_id, category, month, year).
    budgets (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user's id.
        user_id -> Uuid,
        /// Budgeted category label.
        category -> Varchar,
        /// Spending ceiling for the month.
        monthly_limit -> Float8,
        /// Calendar month, 1 through 12.
        month -> Int4,
        /// Calendar year.
        year -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, expenses, budgets);
