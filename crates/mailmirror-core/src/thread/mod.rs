//! Conversation threads.
//!
//! A thread's lifetime is derived from its messages: it is deleted
//! exactly when its last message is hard-deleted, never otherwise.

mod model;
mod repository;

pub use model::Thread;
pub use repository::ThreadRepository;
