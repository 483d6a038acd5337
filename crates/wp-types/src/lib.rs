//! Shared Identity and Role Types
//!
//! Role ranking and user identity consumed by the sign-off engine.
//! Authentication itself belongs to the surrounding application; this
//! crate only models who a user is and what their role permits.

pub mod role;
pub mod user;

pub use role::{Role, RoleParseError, SignOffLevel};
pub use user::{CurrentUser, UserId};
