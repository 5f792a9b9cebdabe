//! The acting profile and its roles.
//!
//! Storage operations never run anonymously. The HTTP layer resolves the
//! signed-in profile into an [`ActorContext`] and passes it down; the backend
//! uses it for permission checks, group scoping and the activity log.

mod context;
mod role;

pub use context::ActorContext;
pub use role::Role;
