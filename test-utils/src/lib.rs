pub mod mocks;
pub mod workspace;
