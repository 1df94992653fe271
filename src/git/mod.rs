pub mod clone;

pub use clone::clone_repo;
