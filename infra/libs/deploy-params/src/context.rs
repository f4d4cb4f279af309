/// Deployment context: every operator-supplied parameter, read once at the
/// start of provisioning and immutable afterwards.
use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::info;

use crate::address::AddressRangeSet;
use crate::error::{ParamsError, Result};
use crate::federation::{IdentityFederation, IdentityProvider};
use crate::schedule::MaintenanceWindow;

fn default_region() -> String {
    "us-east-1".to_string()
}

/// Context file shape before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawContext {
    pub domain_name: String,
    /// Region the application stack deploys into.
    #[serde(default = "default_region")]
    pub region: String,
    /// Region of the managed model API; defaults to the deployment region.
    #[serde(default)]
    pub model_region: Option<String>,
    pub backend_api_endpoint: String,
    pub ws_api_endpoint: String,
    #[serde(default)]
    pub allowed_ip_v4_address_ranges: Vec<String>,
    #[serde(default)]
    pub allowed_ip_v6_address_ranges: Vec<String>,
    #[serde(default)]
    pub published_api_allowed_ip_v4_address_ranges: Vec<String>,
    #[serde(default)]
    pub published_api_allowed_ip_v6_address_ranges: Vec<String>,
    #[serde(default)]
    pub allowed_sign_up_email_domains: Vec<String>,
    #[serde(default)]
    pub identity_providers: Vec<IdentityProvider>,
    pub user_pool_domain_prefix: String,
    #[serde(default)]
    pub rdb_schedules: MaintenanceWindow,
}

/// Validated deployment parameters.
#[derive(Debug, Clone)]
pub struct DeploymentContext {
    pub domain_name: String,
    pub region: String,
    pub model_region: String,
    pub backend_api_endpoint: String,
    pub ws_api_endpoint: String,
    pub app_allowed_v4: AddressRangeSet,
    pub app_allowed_v6: AddressRangeSet,
    pub published_api_allowed_v4: AddressRangeSet,
    pub published_api_allowed_v6: AddressRangeSet,
    pub allowed_sign_up_email_domains: Vec<String>,
    pub identity_providers: Vec<IdentityProvider>,
    pub federation: IdentityFederation,
    pub user_pool_domain_prefix: String,
    pub maintenance_window: MaintenanceWindow,
}

impl DeploymentContext {
    /// Load from a context file, with `DEPLOY_`-prefixed environment
    /// variables layered on top.
    pub fn load(path: &Path) -> Result<Self> {
        let raw: RawContext = Config::builder()
            .add_source(File::from(path))
            .add_source(Environment::with_prefix("DEPLOY"))
            .build()
            .map_err(|e| ParamsError::ContextLoad(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ParamsError::ContextLoad(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Parse an in-memory JSON context document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawContext = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()
            .map_err(|e| ParamsError::ContextLoad(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ParamsError::ContextLoad(e.to_string()))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawContext) -> Result<Self> {
        let federation = IdentityFederation::resolve(&raw.identity_providers)?;
        let context = Self {
            model_region: raw.model_region.unwrap_or_else(|| raw.region.clone()),
            app_allowed_v4: AddressRangeSet::v4(raw.allowed_ip_v4_address_ranges)?,
            app_allowed_v6: AddressRangeSet::v6(raw.allowed_ip_v6_address_ranges)?,
            published_api_allowed_v4: AddressRangeSet::v4(
                raw.published_api_allowed_ip_v4_address_ranges,
            )?,
            published_api_allowed_v6: AddressRangeSet::v6(
                raw.published_api_allowed_ip_v6_address_ranges,
            )?,
            federation,
            maintenance_window: raw.rdb_schedules.validated()?,
            domain_name: raw.domain_name,
            region: raw.region,
            backend_api_endpoint: raw.backend_api_endpoint,
            ws_api_endpoint: raw.ws_api_endpoint,
            allowed_sign_up_email_domains: raw.allowed_sign_up_email_domains,
            identity_providers: raw.identity_providers,
            user_pool_domain_prefix: raw.user_pool_domain_prefix,
        };

        info!(
            domain = %context.domain_name,
            region = %context.region,
            federation = context.federation.is_enabled(),
            "loaded deployment context"
        );
        Ok(context)
    }
}
