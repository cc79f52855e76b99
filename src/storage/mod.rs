pub mod json_backend;

use crate::{domain::Document, errors::CoreError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Abstraction over persistence backends holding the whole application
/// document.
///
/// `load` on a backend that has never been written returns the empty default
/// document; any other read or decode failure is a hard error. `save` either
/// persists the full document or fails without partial effects.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> Result<Document>;
    fn save(&self, document: &Document) -> Result<()>;
}

pub use json_backend::JsonStorage;
