//! Diesel schema for catalog persistence.

diesel::table! {
    /// Task categories.
    categories (id) {
        /// Category identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Icon path or CSS class.
        #[max_length = 255]
        icon -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Cities, unique by slug.
    cities (id) {
        /// City identifier.
        id -> Uuid,
        /// City name.
        #[max_length = 255]
        name -> Varchar,
        /// URL slug derived from the name.
        #[max_length = 255]
        slug -> Varchar,
        /// Region from the region catalog.
        #[max_length = 255]
        region -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
