//! Task aggregate root, location and moderation record.

use super::{
    ModerationComment, ModerationStatus, Response, ResponseId, TaskDescription, TaskDomainError,
    TaskId, TaskStatus, TaskTitle,
};
use crate::account::domain::UserId;
use crate::catalog::domain::{CategoryId, CityId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Where the work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskLocation {
    /// On site in a catalog city.
    City {
        /// City identifier.
        city_id: CityId,
    },
    /// Anywhere.
    Remote,
}

impl TaskLocation {
    /// Builds a location from its stored type and optional city.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CityRequired`] for a `city` location
    /// without a city and [`TaskDomainError::InvalidLocationType`] for an
    /// unknown type.
    pub fn from_parts(location_type: &str, city: Option<CityId>) -> Result<Self, TaskDomainError> {
        match location_type.trim().to_ascii_lowercase().as_str() {
            "city" => city
                .map(|city_id| Self::City { city_id })
                .ok_or(TaskDomainError::CityRequired),
            "remote" => Ok(Self::Remote),
            _ => Err(TaskDomainError::InvalidLocationType(
                location_type.to_owned(),
            )),
        }
    }

    /// Returns the stored location type.
    #[must_use]
    pub const fn location_type(self) -> &'static str {
        match self {
            Self::City { .. } => "city",
            Self::Remote => "remote",
        }
    }

    /// Returns the city for on-site work.
    #[must_use]
    pub const fn city_id(self) -> Option<CityId> {
        match self {
            Self::City { city_id } => Some(city_id),
            Self::Remote => None,
        }
    }
}

/// Latest moderation decision on a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Moderation {
    /// Current moderation status.
    pub status: ModerationStatus,
    /// Moderator's note, if any.
    pub comment: Option<ModerationComment>,
    /// Administrator who made the last decision.
    pub moderated_by: Option<UserId>,
    /// When the last decision was made.
    pub moderated_at: Option<DateTime<Utc>>,
}

/// Validated content of a task, used for creation and edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskContent {
    /// Headline.
    pub title: TaskTitle,
    /// Body.
    pub description: TaskDescription,
    /// Task category.
    pub category_id: CategoryId,
    /// Where the work happens.
    pub location: TaskLocation,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    author_id: UserId,
    category_id: CategoryId,
    location: TaskLocation,
    status: TaskStatus,
    moderation: Moderation,
    accepted_response: Option<ResponseId>,
    executor_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted content.
    pub content: TaskContent,
    /// Persisted author.
    pub author_id: UserId,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted moderation record.
    pub moderation: Moderation,
    /// Persisted accepted response, if any.
    pub accepted_response: Option<ResponseId>,
    /// Persisted executor, if any.
    pub executor_id: Option<UserId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open task awaiting moderation.
    #[must_use]
    pub fn new(content: TaskContent, author_id: UserId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: content.title,
            description: content.description,
            author_id,
            category_id: content.category_id,
            location: content.location,
            status: TaskStatus::Open,
            moderation: Moderation::default(),
            accepted_response: None,
            executor_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.content.title,
            description: data.content.description,
            author_id: data.author_id,
            category_id: data.content.category_id,
            location: data.content.location,
            status: data.status,
            moderation: data.moderation,
            accepted_response: data.accepted_response,
            executor_id: data.executor_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the headline.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the body.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the category.
    #[must_use]
    pub const fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Returns the location.
    #[must_use]
    pub const fn location(&self) -> TaskLocation {
        self.location
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the moderation record.
    #[must_use]
    pub const fn moderation(&self) -> &Moderation {
        &self.moderation
    }

    /// Returns the accepted response, once one is chosen.
    #[must_use]
    pub const fn accepted_response(&self) -> Option<ResponseId> {
        self.accepted_response
    }

    /// Returns the responder of the accepted response.
    #[must_use]
    pub const fn executor_id(&self) -> Option<UserId> {
        self.executor_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns `true` when `user` wrote the task.
    #[must_use]
    pub fn is_author(&self, user: UserId) -> bool {
        self.author_id == user
    }

    /// Returns `true` when `user` is the accepted executor.
    #[must_use]
    pub fn is_executor(&self, user: UserId) -> bool {
        self.executor_id == Some(user)
    }

    /// Returns `true` for the author and the executor.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.is_author(user) || self.is_executor(user)
    }

    /// Returns `true` once moderation approved the task.
    #[must_use]
    pub fn is_publicly_visible(&self) -> bool {
        self.moderation.status == ModerationStatus::Approved
    }

    /// Returns `true` when `viewer` may read the task detail.
    #[must_use]
    pub fn is_visible_to(&self, viewer: Option<UserId>) -> bool {
        self.is_publicly_visible() || viewer.is_some_and(|user| self.is_participant(user))
    }

    /// Returns the other participant of the task, if `user` is one.
    #[must_use]
    pub fn counterpart_of(&self, user: UserId) -> Option<UserId> {
        if self.is_author(user) {
            self.executor_id
        } else if self.is_executor(user) {
            Some(self.author_id)
        } else {
            None
        }
    }

    /// Replaces the content of an open task and sends it back to moderation.
    ///
    /// The previous moderation decision is discarded entirely.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskAuthor`] for other users and
    /// [`TaskDomainError::TaskNotOpen`] once work has started.
    pub fn edit(
        &mut self,
        editor: UserId,
        content: TaskContent,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_author(editor)?;
        self.ensure_open()?;
        self.title = content.title;
        self.description = content.description;
        self.category_id = content.category_id;
        self.location = content.location;
        self.moderation = Moderation::default();
        self.touch(clock);
        Ok(())
    }

    /// Checks that `responder` may respond to this task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::OwnTask`], [`TaskDomainError::TaskNotOpen`]
    /// or [`TaskDomainError::TaskNotApproved`].
    pub fn ensure_accepts_responses_from(&self, responder: UserId) -> Result<(), TaskDomainError> {
        if self.is_author(responder) {
            return Err(TaskDomainError::OwnTask(self.id));
        }
        self.ensure_open()?;
        if !self.is_publicly_visible() {
            return Err(TaskDomainError::TaskNotApproved(self.id));
        }
        Ok(())
    }

    /// Checks that responses to this task may still be edited or withdrawn.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskNotOpen`] once work has started.
    pub const fn ensure_open(&self) -> Result<(), TaskDomainError> {
        match self.status {
            TaskStatus::Open => Ok(()),
            TaskStatus::InProgress | TaskStatus::Closed => Err(TaskDomainError::TaskNotOpen(self.id)),
        }
    }

    /// Accepts `response` and starts work.
    ///
    /// The caller is responsible for rejecting the task's other responses.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskAuthor`],
    /// [`TaskDomainError::ResponseTaskMismatch`] or
    /// [`TaskDomainError::InvalidStatusTransition`].
    pub fn accept(
        &mut self,
        author: UserId,
        response: &Response,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_author(author)?;
        if response.task_id() != self.id {
            return Err(TaskDomainError::ResponseTaskMismatch {
                task_id: self.id,
                response_id: response.id(),
            });
        }
        self.transition_to(TaskStatus::InProgress)?;
        self.accepted_response = Some(response.id());
        self.executor_id = Some(response.responder_id());
        self.touch(clock);
        Ok(())
    }

    /// Closes an in-progress task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotTaskAuthor`] or
    /// [`TaskDomainError::InvalidStatusTransition`].
    pub fn close(&mut self, author: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_author(author)?;
        self.transition_to(TaskStatus::Closed)?;
        self.touch(clock);
        Ok(())
    }

    /// Approves the task. Blank comments are dropped.
    pub fn approve(&mut self, moderator: UserId, comment: Option<&str>, clock: &impl Clock) {
        self.record_moderation(
            ModerationStatus::Approved,
            ModerationComment::optional(comment),
            moderator,
            clock,
        );
    }

    /// Rejects the task with a mandatory comment.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyField`] for a blank comment.
    pub fn reject(
        &mut self,
        moderator: UserId,
        comment: &str,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let note = ModerationComment::new(comment)?;
        self.record_moderation(ModerationStatus::Rejected, Some(note), moderator, clock);
        Ok(())
    }

    /// Puts the task back into the moderation queue.
    pub fn return_to_pending(&mut self, moderator: UserId, clock: &impl Clock) {
        self.record_moderation(ModerationStatus::Pending, None, moderator, clock);
    }

    fn record_moderation(
        &mut self,
        status: ModerationStatus,
        comment: Option<ModerationComment>,
        moderator: UserId,
        clock: &impl Clock,
    ) {
        let now = clock.utc();
        self.moderation = Moderation {
            status,
            comment,
            moderated_by: Some(moderator),
            moderated_at: Some(now),
        };
        self.updated_at = now;
    }

    fn ensure_author(&self, user: UserId) -> Result<(), TaskDomainError> {
        if !self.is_author(user) {
            return Err(TaskDomainError::NotTaskAuthor(self.id));
        }
        Ok(())
    }

    const fn transition_to(&mut self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
