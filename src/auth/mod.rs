//! Authentication module
//!
//! Supports: no auth, static bearer token, environment variable, key/value file
//!
//! Credentials are an injected capability: the listing client asks a
//! [`CredentialProvider`] for a bearer token on every request instead of
//! looking one up globally. The [`Authenticator`] applies it to outgoing
//! requests.

mod authenticator;
mod types;

pub use authenticator::{
    credential_provider, Authenticator, CredentialProvider, EnvToken, FileToken, NoCredentials,
    StaticToken,
};
pub use types::{CredentialConfig, DEFAULT_TOKEN_ENV};
