// Shared data model, well-known paths, and settings persistence

pub mod error;
pub mod model;
pub mod paths;
pub mod settings;

pub use error::{Error, Result};
pub use model::{Browser, BrowserProfile, Inventory};
pub use settings::SettingsStore;
