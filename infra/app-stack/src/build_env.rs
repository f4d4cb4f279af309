//! Deploy-time build environment for the front-end bundle.
//!
//! The variable names are a bit-exact contract with the front-end build tool;
//! renaming any key is a breaking change. Federation-only keys exist exactly
//! when identity federation is configured, never as empty placeholders.

use std::collections::BTreeMap;

use deploy_params::IdentityFederation;
use serde_json::json;
use synth_graph::{Resource, Stack};
use tracing::debug;

use crate::error::{Result, StackError};
use crate::frontend::Frontend;

pub const ENV_API_ENDPOINT: &str = "VITE_APP_API_ENDPOINT";
pub const ENV_WS_ENDPOINT: &str = "VITE_APP_WS_ENDPOINT";
pub const ENV_USER_POOL_ID: &str = "VITE_APP_USER_POOL_ID";
pub const ENV_USER_POOL_CLIENT_ID: &str = "VITE_APP_USER_POOL_CLIENT_ID";
pub const ENV_REGION: &str = "VITE_APP_REGION";
pub const ENV_USE_STREAMING: &str = "VITE_APP_USE_STREAMING";

pub const ENV_REDIRECT_SIGNIN_URL: &str = "VITE_APP_REDIRECT_SIGNIN_URL";
pub const ENV_REDIRECT_SIGNOUT_URL: &str = "VITE_APP_REDIRECT_SIGNOUT_URL";
pub const ENV_COGNITO_DOMAIN: &str = "VITE_APP_COGNITO_DOMAIN";
pub const ENV_SOCIAL_PROVIDERS: &str = "VITE_APP_SOCIAL_PROVIDERS";
pub const ENV_CUSTOM_PROVIDER_ENABLED: &str = "VITE_APP_CUSTOM_PROVIDER_ENABLED";
pub const ENV_CUSTOM_PROVIDER_NAME: &str = "VITE_APP_CUSTOM_PROVIDER_NAME";

/// Hosted sign-in domain for the user pool, trailing slash included.
pub fn federation_domain(user_pool_domain_prefix: &str, region: &str) -> String {
    format!("{user_pool_domain_prefix}.auth.{region}.amazoncognito.com/")
}

#[derive(Debug, Clone)]
pub struct BuildEnvInputs<'a> {
    pub backend_api_endpoint: &'a str,
    pub ws_api_endpoint: &'a str,
    pub user_pool_id: &'a str,
    pub user_pool_client_id: &'a str,
    pub region: &'a str,
    pub user_pool_domain_prefix: &'a str,
    /// Public origin of the distribution; sign-in redirects land here.
    pub app_origin: &'a str,
    pub federation: &'a IdentityFederation,
}

/// Assemble the full variable map: the mandatory base merged with the
/// federation-only set when federation is enabled. The merge is a
/// collision-checked union.
pub fn assemble(inputs: &BuildEnvInputs<'_>) -> Result<BTreeMap<String, String>> {
    let mut env = BTreeMap::new();

    insert_unique(&mut env, ENV_API_ENDPOINT, inputs.backend_api_endpoint)?;
    insert_unique(&mut env, ENV_WS_ENDPOINT, inputs.ws_api_endpoint)?;
    insert_unique(&mut env, ENV_USER_POOL_ID, inputs.user_pool_id)?;
    insert_unique(&mut env, ENV_USER_POOL_CLIENT_ID, inputs.user_pool_client_id)?;
    insert_unique(&mut env, ENV_REGION, inputs.region)?;
    insert_unique(&mut env, ENV_USE_STREAMING, "true")?;

    if inputs.federation.is_enabled() {
        let domain = federation_domain(inputs.user_pool_domain_prefix, inputs.region);
        insert_unique(&mut env, ENV_REDIRECT_SIGNIN_URL, inputs.app_origin)?;
        insert_unique(&mut env, ENV_REDIRECT_SIGNOUT_URL, inputs.app_origin)?;
        insert_unique(&mut env, ENV_COGNITO_DOMAIN, &domain)?;
        insert_unique(
            &mut env,
            ENV_SOCIAL_PROVIDERS,
            &inputs.federation.social_providers_csv(),
        )?;
        insert_unique(
            &mut env,
            ENV_CUSTOM_PROVIDER_ENABLED,
            &inputs.federation.custom_provider_enabled().to_string(),
        )?;
        insert_unique(
            &mut env,
            ENV_CUSTOM_PROVIDER_NAME,
            &inputs.federation.custom_provider_name(),
        )?;
    }

    debug!(keys = env.len(), federation = inputs.federation.is_enabled(), "assembled build environment");
    Ok(env)
}

fn insert_unique(env: &mut BTreeMap<String, String>, key: &str, value: &str) -> Result<()> {
    if env.insert(key.to_string(), value.to_string()).is_some() {
        return Err(StackError::EnvKeyCollision(key.to_string()));
    }
    Ok(())
}

/// Declare the one-shot build-and-publish step: fetch assets, install,
/// compile with the assembled environment, upload to the distribution's
/// origin bucket and invalidate its cache. Gated on the distribution so the
/// invalidation target exists, and never concurrent with itself.
pub fn declare_build(
    stack: &mut Stack,
    frontend: &Frontend,
    env: &BTreeMap<String, String>,
    inputs: &BuildEnvInputs<'_>,
) -> Result<()> {
    let build = Resource::new(
        "ReactBuild",
        "Deploy::FrontendBuild",
        json!({
            "assets": [{
                "path": "frontend",
                "exclude": ["node_modules", "dist"],
                "commands": ["npm ci"],
            }],
            "buildCommands": ["npm run build"],
            "buildEnvironment": env,
            "destinationBucket": frontend.asset_bucket_id(),
            "distribution": frontend.distribution_id(),
            "outputSourceDirectory": "dist",
        }),
    )
    .depends_on(frontend.distribution_id());
    stack.add_resource(build)?;

    // Operator-facing diagnostics, only meaningful when federation is on.
    if inputs.federation.is_enabled() {
        stack.add_output(
            "CognitoDomain",
            federation_domain(inputs.user_pool_domain_prefix, inputs.region),
        )?;
        stack.add_output("SocialProviders", inputs.federation.social_providers_csv())?;
    }
    Ok(())
}
