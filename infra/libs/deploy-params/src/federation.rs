/// Identity federation configuration: external sign-in providers layered on
/// top of the local user directory.
use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, Result};

/// Raw context entry for one identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProvider {
    /// Provider service: `google`, `facebook`, `amazon`, `apple` or `oidc`.
    pub service: String,
    /// Display name for a custom (`oidc`) provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    /// Secret holding the provider's client credentials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
}

const SOCIAL_SERVICES: [&str; 4] = ["google", "facebook", "amazon", "apple"];
const CUSTOM_SERVICE: &str = "oidc";

/// A custom (OIDC) provider next to the social ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomProvider {
    pub name: Option<String>,
}

/// Federation configuration resolved once from the raw provider list.
///
/// `Disabled` contributes nothing downstream: no build variables, no
/// diagnostic outputs, no placeholder values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityFederation {
    Disabled,
    Enabled {
        /// Social provider services, in configuration order.
        social_providers: Vec<String>,
        custom: Option<CustomProvider>,
    },
}

impl IdentityFederation {
    pub fn resolve(providers: &[IdentityProvider]) -> Result<Self> {
        if providers.is_empty() {
            return Ok(Self::Disabled);
        }

        let mut social_providers = Vec::new();
        let mut custom = None;
        for provider in providers {
            match provider.service.as_str() {
                CUSTOM_SERVICE => {
                    if custom.is_some() {
                        return Err(ParamsError::MultipleCustomProviders);
                    }
                    custom = Some(CustomProvider {
                        name: provider.service_name.clone(),
                    });
                }
                service if SOCIAL_SERVICES.contains(&service) => {
                    social_providers.push(service.to_string());
                }
                other => return Err(ParamsError::UnknownProviderService(other.to_string())),
            }
        }

        Ok(Self::Enabled {
            social_providers,
            custom,
        })
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// Social provider list serialized for the front-end build, e.g.
    /// `"google,facebook"`.
    pub fn social_providers_csv(&self) -> String {
        match self {
            Self::Disabled => String::new(),
            Self::Enabled {
                social_providers, ..
            } => social_providers.join(","),
        }
    }

    pub fn custom_provider_enabled(&self) -> bool {
        matches!(self, Self::Enabled { custom: Some(_), .. })
    }

    /// Custom provider display name; empty when no custom provider or no name
    /// was configured. The key set, not the value, is the build contract.
    pub fn custom_provider_name(&self) -> String {
        match self {
            Self::Enabled {
                custom: Some(custom),
                ..
            } => custom.name.clone().unwrap_or_default(),
            _ => String::new(),
        }
    }
}
