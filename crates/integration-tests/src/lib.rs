//! End-to-end tests for the RocketShoes cart.
//!
//! The tests in `tests/` wire a real `CartManager` to a mock catalog
//! (`wiremock`) and a file store in a temporary directory, going through
//! the same configuration path the CLI uses.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
