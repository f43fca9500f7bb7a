pub mod error;
pub mod profile;
pub mod repo;
pub mod service;
