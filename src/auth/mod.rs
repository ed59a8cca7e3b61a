//! Authentication: credential store, password hashing, JWT.

mod credentials;
mod handlers;
mod jwt;
mod password;

pub use credentials::CredentialStore;
pub use handlers::{login, register, AuthResponse, UserInfo};
pub use jwt::{Claims, TokenError, TokenService, TOKEN_TTL_HOURS};
pub use password::PasswordService;
