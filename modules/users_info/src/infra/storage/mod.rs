pub mod memory_repo;
pub mod sample_data;

pub use memory_repo::InMemoryUsersRepository;
