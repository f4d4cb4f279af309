use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParamsError>;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("Invalid {family} CIDR range '{range}': {reason}")]
    InvalidCidr {
        family: &'static str,
        range: String,
        reason: String,
    },

    #[error("Unknown identity provider service '{0}' (expected google, facebook, amazon, apple or oidc)")]
    UnknownProviderService(String),

    #[error("Multiple custom (oidc) identity providers configured; at most one is supported")]
    MultipleCustomProviders,

    #[error("Maintenance window requires both start and stop schedules; only {0} was given")]
    PartialMaintenanceWindow(&'static str),

    #[error("Failed to load deployment context: {0}")]
    ContextLoad(String),
}
