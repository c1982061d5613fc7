//! Shared helpers for dates, paths and wording.

pub mod date;
pub mod plural;
pub mod slug;
