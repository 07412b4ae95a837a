//! User profile — the data collected by the wizard and fed to the crew.

pub mod model;
pub mod store;

pub use model::{FieldValue, ProfileField, UserProfile};
pub use store::ProfileStore;
