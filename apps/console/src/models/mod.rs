pub mod folder;
pub mod user;
