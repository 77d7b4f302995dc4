pub mod render;
pub mod repository;
pub mod types;
