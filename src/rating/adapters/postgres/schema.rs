//! Diesel schema for rating persistence.

diesel::table! {
    /// Ratings, unique per task and rater.
    ratings (id) {
        /// Rating identifier.
        id -> Uuid,
        /// Rated task.
        task_id -> Uuid,
        /// User who left the rating.
        rater_id -> Uuid,
        /// User who received it.
        rated_id -> Uuid,
        /// Score from 1 to 5.
        score -> Int2,
        /// Optional remark.
        comment -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
