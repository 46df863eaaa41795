//! Remote mailbox folders.

mod model;
mod repository;

pub use model::Folder;
pub use repository::FolderRepository;
