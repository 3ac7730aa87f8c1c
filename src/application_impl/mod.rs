mod auth_service_impl;
mod credential_verifier;
mod hasher_argon2;
mod signer_jwt;
mod token_service_impl;

pub use auth_service_impl::*;
pub use credential_verifier::*;
pub use hasher_argon2::*;
pub use signer_jwt::*;
pub use token_service_impl::*;
