//! OtpService behavior tests against the mock repository.

mod service_tests;
