//! Domain model for marketplace accounts.
//!
//! Accounts carry login credentials, an editable profile, denormalized
//! rating totals, and the moderation record (warnings and bans) that the
//! admin surface maintains.

mod credentials;
mod error;
mod ids;
mod moderation;
mod profile;
mod rating_summary;
mod user;

pub use credentials::{EmailAddress, PasswordHash, Role, Username};
pub use error::{AccountDomainError, ParseBanStatusError, ParseGenderError, ParseRoleError};
pub use ids::{UserId, WarningId};
pub use moderation::{Ban, BanDays, BanKind, BanStatus, Warning};
pub use profile::{Gender, UserProfile};
pub use rating_summary::{RatingAverage, RatingSummary};
pub use user::{PersistedUserData, PublicProfile, User};
