mod error;
mod graph;
mod store;

pub use error::{ModelError, StoreError};
pub use graph::{Link, Node, Position, ProjectModel, Status};
pub use store::{JsonFileStore, ModelStore};
