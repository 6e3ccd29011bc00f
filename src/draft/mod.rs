//! The draft under edit and its local persistence.
//!
//! - [`DraftModel`] owns the in-memory draft and applies field updates.
//! - [`DraftStore`] upserts snapshots into [`LocalStorage`] by identity.

pub mod model;
pub mod storage;
pub mod store;

pub use model::{DraftModel, DraftUpdate};
pub use storage::LocalStorage;
pub use store::{DRAFTS_KEY, DraftRecord, DraftStore};
