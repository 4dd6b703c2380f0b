//! SMS module tests
