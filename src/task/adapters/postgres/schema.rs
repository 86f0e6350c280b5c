//! Diesel schema for task and response persistence.

diesel::table! {
    /// Posted tasks with their latest moderation decision.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Headline.
        #[max_length = 200]
        title -> Varchar,
        /// Body.
        description -> Text,
        /// Author account.
        author_id -> Uuid,
        /// Task category.
        category_id -> Uuid,
        /// `city` or `remote`.
        #[max_length = 10]
        location_type -> Varchar,
        /// City for on-site work.
        city_id -> Nullable<Uuid>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Moderation status.
        #[max_length = 20]
        moderation_status -> Varchar,
        /// Moderator's note.
        moderation_comment -> Nullable<Text>,
        /// Administrator behind the last decision.
        moderated_by -> Nullable<Uuid>,
        /// Time of the last decision.
        moderated_at -> Nullable<Timestamptz>,
        /// Accepted response.
        accepted_response_id -> Nullable<Uuid>,
        /// Responder of the accepted response.
        executor_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Responses, unique per task and responder.
    task_responses (id) {
        /// Response identifier.
        id -> Uuid,
        /// Task responded to.
        task_id -> Uuid,
        /// Responding account.
        responder_id -> Uuid,
        /// Pitch text.
        message -> Text,
        /// Response status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(task_responses -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_responses);
