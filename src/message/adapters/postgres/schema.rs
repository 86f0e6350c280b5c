//! Diesel schema for message persistence.

diesel::table! {
    /// Append-only conversation log. A null sender marks a system notice.
    task_messages (id) {
        /// Message identifier.
        id -> Uuid,
        /// Conversation's task.
        task_id -> Uuid,
        /// Sending participant.
        sender_id -> Nullable<Uuid>,
        /// Message text.
        body -> Text,
        /// Whether the recipient has seen it.
        is_read -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}
