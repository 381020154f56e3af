//! Mock providers for testing.
//!
//! In-memory, scripted implementations of the session providers so
//! reducer flows and guards can be exercised without a network.

mod gateway;

pub use gateway::MockAuthGateway;

use ladrillo_client::types::{Role, User};
use uuid::Uuid;

/// A minimal investor user for tests.
#[must_use]
pub fn investor_user(email: &str) -> User {
    user_with_role(email, Role::Investor)
}

/// A minimal user with the given role for tests.
#[must_use]
pub fn user_with_role(email: &str, role: Role) -> User {
    User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        first_name: String::new(),
        last_name: String::new(),
        phone: String::new(),
        role,
        is_kyc_verified: false,
        created_at: chrono::Utc::now(),
    }
}
