/// Factory: build the process-wide `IdentityAuthority` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::identity::{ClerkClient, IdentityAuthority, IdentityError};

pub fn build_identity_authority(
    config: &Config,
) -> Result<Arc<dyn IdentityAuthority>, IdentityError> {
    let client = ClerkClient::new(
        config.clerk_api_url.clone(),
        &config.clerk_secret_key,
        config.identity_timeout,
    )?;

    tracing::info!(
        backend = client.backend_name(),
        api_url = %config.clerk_api_url,
        "identity authority configured"
    );

    Ok(Arc::new(client))
}
