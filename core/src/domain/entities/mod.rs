//! Domain entities representing core business objects.

pub mod principal;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use principal::{Principal, UserPrincipal};
pub use token::Claims;
pub use user::User;
