//! AuthService behavior tests with in-memory collaborators.

mod mocks;
