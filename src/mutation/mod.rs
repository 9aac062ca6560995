//! Optimistic mutations over cached collections

pub mod coordinator;
pub mod draft;

pub use coordinator::{MutationCoordinator, MutationState, DEFAULT_TEMP_ID_PREFIX};
pub use draft::{MutationDraft, Record};
