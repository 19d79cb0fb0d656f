//! Authentication primitives shared by the identity service.
//!
//! Provides:
//! - Password hashing (Argon2id with per-hash random salt)
//! - JWT claims and encoding/decoding
//! - A two-secret token issuer (short-lived access + long-lived refresh)
//!
//! The issuer signs access and refresh tokens with *different* secrets so
//! a refresh token can never pass for an access token or vice versa.
//!
//! # Examples
//!
//! ## Password hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! ```
//!
//! ## Token pair issuance and refresh
//! ```
//! use auth::TokenIssuer;
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(
//!     b"access_secret_at_least_32_bytes_long!",
//!     b"refresh_secret_at_least_32_bytes_ok!!",
//!     Duration::minutes(15),
//!     Duration::days(7),
//! );
//!
//! let pair = issuer.issue_pair("user123").unwrap();
//! let new_access = issuer.refresh_access_token(&pair.refresh_token).unwrap();
//! let claims = issuer.validate_access_token(&new_access).unwrap();
//! assert_eq!(claims.sub, "user123");
//! ```

pub mod issuer;
pub mod jwt;
pub mod password;

pub use issuer::TokenIssuer;
pub use issuer::TokenPair;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
