//! Application services for accounts and user moderation.

mod account;
mod moderation;
mod roles;

pub use account::{
    AccountError, AccountResult, AccountService, RegisterUserRequest, UpdateProfileRequest,
};
pub use moderation::{UserModerationError, UserModerationResult, UserModerationService};
pub use roles::RoleService;
