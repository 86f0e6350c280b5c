//! Diesel schema for account persistence.

diesel::table! {
    /// Registered accounts with denormalized ban and rating columns.
    users (id) {
        /// Account identifier.
        id -> Uuid,
        /// Lowercase public handle.
        #[max_length = 30]
        username -> Varchar,
        /// Lowercase login email.
        #[max_length = 255]
        email -> Varchar,
        /// Encoded password hash.
        password_hash -> Text,
        /// Account role.
        #[max_length = 20]
        role -> Varchar,
        /// Optional first name.
        #[max_length = 50]
        first_name -> Nullable<Varchar>,
        /// Optional last name.
        #[max_length = 50]
        last_name -> Nullable<Varchar>,
        /// Optional biography.
        bio -> Nullable<Text>,
        /// Optional phone number.
        #[max_length = 50]
        phone -> Nullable<Varchar>,
        /// Optional avatar path.
        #[max_length = 255]
        avatar -> Nullable<Varchar>,
        /// Optional date of birth.
        date_of_birth -> Nullable<Date>,
        /// Optional gender.
        #[max_length = 10]
        gender -> Nullable<Varchar>,
        /// Average score in tenths.
        rating_average -> Nullable<Int2>,
        /// Number of ratings received.
        rating_total -> Int4,
        /// Stored ban classification.
        #[max_length = 20]
        ban_status -> Varchar,
        /// Expiry of a temporary ban.
        ban_until -> Nullable<Timestamptz>,
        /// Ban reason.
        ban_reason -> Nullable<Text>,
        /// Administrator who issued the ban.
        banned_by -> Nullable<Uuid>,
        /// When the ban was issued.
        banned_at -> Nullable<Timestamptz>,
        /// Registration timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Last successful login.
        last_login_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Moderation warnings, one row per warning.
    user_warnings (id) {
        /// Warning identifier.
        id -> Uuid,
        /// Warned account.
        user_id -> Uuid,
        /// Reason text.
        reason -> Text,
        /// Issuing administrator.
        issued_by -> Uuid,
        /// Issue timestamp.
        issued_at -> Timestamptz,
    }
}

diesel::joinable!(user_warnings -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(users, user_warnings);
