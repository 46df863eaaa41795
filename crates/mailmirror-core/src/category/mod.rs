//! Categories (labels) and their folder-scoped links to messages.

mod model;
mod repository;

pub use model::Category;
pub use repository::CategoryRepository;
