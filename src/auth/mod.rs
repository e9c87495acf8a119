//! Authentication: credential file storage, sign-in/sign-out, and token
//! introspection.

pub mod credentials;
pub mod session;
pub mod token;

pub use credentials::{Credentials, CredentialsFile};
pub use session::{LoginRequest, LoginResponse, RegisterRequest};
