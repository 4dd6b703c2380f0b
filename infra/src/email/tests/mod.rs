//! Email module tests

mod create_service_tests;
