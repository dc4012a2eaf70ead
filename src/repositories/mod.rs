pub mod item;
#[cfg(test)]
pub mod memory;
pub mod user;

pub use item::{ItemContent, ItemFilter, ItemRepository, ItemRepositoryTrait};
pub use user::{DuplicateEmail, UserRepository, UserRepositoryTrait};
