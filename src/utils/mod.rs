//! Small shared utilities.

mod closest;
mod plural;

pub use closest::ClosestPathMatcher;
pub use plural::{plural_count, plural_s};
