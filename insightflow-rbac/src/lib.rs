//! Session identity and visibility rules for InsightFlow
//!
//! This crate provides:
//! - Login/logout with identity derived purely from the supplied claims;
//!   no credential check is performed
//! - The role- and tenant-scoped visibility filter over the form list

pub mod error;
pub mod session;
pub mod visibility;

pub use error::{RbacError, RbacResult};
pub use session::{SessionManager, DEFAULT_INSTITUTION_ID, SUPER_ADMIN_EMAIL};
pub use visibility::visible_forms;
