pub mod files;
pub mod repos;
pub mod search;
