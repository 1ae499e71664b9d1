//! Testing utilities for telegauth
//!
//! Compiled for unit tests and, with the `testing` feature, for the
//! integration tests under `tests/`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use telegauth::testing::TestFixtures;
//!
//! let config = TestFixtures::telegram_config();
//! let identity = config.authenticate(TestFixtures::signed_params()).unwrap();
//! assert_eq!(identity.uid, telegauth::testing::constants::TEST_USER_ID);
//! ```

pub mod fixtures;

pub use fixtures::TestFixtures;

/// Common test constants
pub mod constants {
    /// Bot name configured in test settings
    pub const TEST_BOT_NAME: &str = "telegauth_test_bot";

    /// Bot secret used to sign test callbacks
    pub const TEST_BOT_SECRET: &str = "123456789:AAH-test-bot-secret";

    /// Base URL the test server is reachable on
    pub const TEST_REDIRECT_BASE_URL: &str = "http://localhost:8080";

    /// Default test user
    pub const TEST_USER_ID: &str = "987654321";
    pub const TEST_FIRST_NAME: &str = "Joe";
    pub const TEST_LAST_NAME: &str = "Smith";
    pub const TEST_USERNAME: &str = "joesmith";
}
