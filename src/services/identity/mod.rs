pub mod authority;
pub mod clerk;
pub mod factory;
#[cfg(test)]
pub mod stub;

pub use authority::{IdentityAuthority, IdentityError, with_deadline};
pub use clerk::ClerkClient;
pub use factory::build_identity_authority;
