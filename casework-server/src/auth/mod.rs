//! Authentication
//!
//! JWT tokens identify the user; every request reloads the user row so
//! role, location and status changes apply immediately.

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod session;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService, generate_printable_secret};
pub use middleware::{require_auth, require_capability};
pub use password::{hash_password, verify_password};
pub use session::{CurrentUser, authenticate};
