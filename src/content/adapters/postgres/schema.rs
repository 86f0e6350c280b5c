//! Diesel schema for content persistence.

diesel::table! {
    /// Blog categories, unique by slug.
    article_categories (id) {
        /// Category identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// URL slug derived from the name.
        #[max_length = 255]
        slug -> Varchar,
        /// Optional blurb.
        #[max_length = 500]
        description -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blog articles, unique by slug.
    articles (id) {
        /// Article identifier.
        id -> Uuid,
        /// Headline.
        #[max_length = 200]
        title -> Varchar,
        /// URL slug.
        #[max_length = 255]
        slug -> Varchar,
        /// HTML body.
        content -> Text,
        /// Teaser.
        #[max_length = 500]
        excerpt -> Varchar,
        /// Cover image path.
        #[max_length = 255]
        image -> Nullable<Varchar>,
        /// Blog category.
        category_id -> Uuid,
        /// Publication status.
        #[max_length = 20]
        status -> Varchar,
        /// Resolved `<title>`.
        #[max_length = 60]
        meta_title -> Varchar,
        /// Meta description.
        #[max_length = 160]
        meta_description -> Nullable<Varchar>,
        /// Meta keywords.
        #[max_length = 255]
        meta_keywords -> Nullable<Varchar>,
        /// Read counter.
        views_count -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// First publication timestamp.
        published_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Static pages, unique by slug.
    pages (id) {
        /// Page identifier.
        id -> Uuid,
        /// Heading.
        #[max_length = 200]
        title -> Varchar,
        /// URL slug.
        #[max_length = 255]
        slug -> Varchar,
        /// HTML body.
        content -> Text,
        /// Resolved `<title>`.
        #[max_length = 60]
        meta_title -> Varchar,
        /// Meta description.
        #[max_length = 160]
        meta_description -> Nullable<Varchar>,
        /// Meta keywords.
        #[max_length = 255]
        meta_keywords -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
