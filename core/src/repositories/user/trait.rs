//! User repository trait defining the interface to the user directory.
//!
//! The directory is an external collaborator; the core only needs lookups
//! by e-mail (login) and id, plus creation for seeding and tests.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use af_core::repositories::UserRepository;
/// use af_core::domain::entities::User;
/// use af_core::errors::DomainError;
///
/// struct SqlUserRepository {
///     // connection pool
/// }
///
/// #[async_trait]
/// impl UserRepository for SqlUserRepository {
///     async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError> {
///         Ok(None)
///     }
///
///     async fn create(&self, user: User) -> Result<User, DomainError> {
///         Ok(user)
///     }
///
///     async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
///         Ok(false)
///     }
/// }
/// ```
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by e-mail address (the username)
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that e-mail
    /// * `Err(DomainError)` - Directory lookup failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by directory identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;

    /// Store a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError)` - e-mail already registered, or storage failure
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Check whether an e-mail is already registered
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
}
