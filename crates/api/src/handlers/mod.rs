pub mod summary;
pub mod weather;
