//! Content delivery wiring: private asset origin, origin-access identity and
//! the CDN distribution in front of them.
//!
//! The distribution remaps 404 and 403 to the root document with a 200 so the
//! single-page application's client-side router sees every path. Both remaps
//! cache for zero seconds; updated error handling must ship on the next
//! deploy, not whenever an edge cache expires.

use serde_json::json;
use synth_graph::{Attr, Resource, Stack};
use tracing::warn;

use crate::error::{Result, StackError};

/// Fixed prefix for distribution access logs in the log bucket.
pub const ACCESS_LOG_PREFIX: &str = "Frontend/";

pub const MINIMUM_PROTOCOL_VERSION: &str = "TLSv1.2_2021";
pub const SSL_SUPPORT_METHOD: &str = "sni-only";

/// Status remap entry for single-page-application fallback routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorFallback {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: &'static str,
    pub caching_min_ttl_secs: u64,
}

/// The full fallback table: exactly 404 and 403, both to `/` with 200 and a
/// zero TTL. Part of the external contract, not a tuning knob.
pub fn error_fallbacks() -> [ErrorFallback; 2] {
    [
        ErrorFallback {
            error_code: 404,
            response_code: 200,
            response_page_path: "/",
            caching_min_ttl_secs: 0,
        },
        ErrorFallback {
            error_code: 403,
            response_code: 200,
            response_page_path: "/",
            caching_min_ttl_secs: 0,
        },
    ]
}

/// A domain alias paired with the validated certificate that serves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerCertificate {
    pub domain_name: String,
    pub certificate_arn: String,
}

impl ViewerCertificate {
    /// Pair an optional alias with an optional certificate reference.
    ///
    /// An alias without a certificate fails the whole deployment: silently
    /// serving the default distribution domain would break every user-visible
    /// URL. A certificate without an alias has nothing to bind and is
    /// dropped with a warning.
    pub fn pair(
        domain_name: Option<String>,
        certificate_arn: Option<String>,
    ) -> Result<Option<Self>> {
        match (domain_name, certificate_arn) {
            (Some(domain_name), Some(certificate_arn)) => Ok(Some(Self {
                domain_name,
                certificate_arn,
            })),
            (Some(domain), None) => Err(StackError::MissingCertificate(domain)),
            (None, Some(_)) => {
                warn!("viewer certificate supplied without a domain alias; ignoring");
                Ok(None)
            }
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FrontendProps {
    /// Imported access policy ARN attached to the distribution.
    pub web_acl_arn: String,
    /// Bucket receiving distribution access logs.
    pub access_log_bucket: Attr,
    pub viewer_certificate: Option<ViewerCertificate>,
}

/// Declared frontend resources and their downstream handles.
#[derive(Debug, Clone)]
pub struct Frontend {
    asset_bucket_id: String,
    distribution_id: String,
    distribution_domain: Attr,
}

impl Frontend {
    pub fn declare(stack: &mut Stack, props: FrontendProps) -> Result<Self> {
        let asset_bucket = Resource::new(
            "AssetBucket",
            "AWS::S3::Bucket",
            json!({
                "encryption": "S3_MANAGED",
                "blockPublicAccess": "BLOCK_ALL",
                "enforceSsl": true,
                "removalPolicy": "DESTROY",
                "autoDeleteObjects": true,
            }),
        );
        let asset_bucket_id = asset_bucket.logical_id.clone();
        let bucket_ref = asset_bucket.attr("Name");
        stack.add_resource(asset_bucket)?;

        let oai = Resource::new(
            "OriginAccessIdentity",
            "AWS::CloudFront::CloudFrontOriginAccessIdentity",
            json!({}),
        );
        let oai_ref = oai.attr("Id");
        stack.add_resource(oai)?;

        let error_configurations: Vec<_> = error_fallbacks()
            .iter()
            .map(|fallback| {
                json!({
                    "errorCode": fallback.error_code,
                    "errorCachingMinTtl": fallback.caching_min_ttl_secs,
                    "responseCode": fallback.response_code,
                    "responsePagePath": fallback.response_page_path,
                })
            })
            .collect();

        let mut properties = json!({
            "originConfigs": [{
                "s3OriginSource": {
                    "bucket": bucket_ref.token(),
                    "originAccessIdentity": oai_ref.token(),
                },
                "behaviors": [{ "isDefaultBehavior": true }],
            }],
            "errorConfigurations": error_configurations,
            "loggingConfig": {
                "bucket": props.access_log_bucket.token(),
                "prefix": ACCESS_LOG_PREFIX,
            },
            "webAclId": props.web_acl_arn,
        });
        if let Some(viewer) = &props.viewer_certificate {
            properties["viewerCertificate"] = json!({
                "aliases": [viewer.domain_name],
                "acmCertificateArn": viewer.certificate_arn,
                "sslSupportMethod": SSL_SUPPORT_METHOD,
                "minimumProtocolVersion": MINIMUM_PROTOCOL_VERSION,
            });
        }

        let distribution = Resource::new("Distribution", "AWS::CloudFront::Distribution", properties);
        let distribution_id = distribution.logical_id.clone();
        let distribution_domain = distribution.attr("DomainName");
        stack.add_resource(distribution)?;

        Ok(Self {
            asset_bucket_id,
            distribution_id,
            distribution_domain,
        })
    }

    /// Public origin URL of the distribution (scheme + domain), consumed by
    /// the build-environment assembler for redirect targets.
    pub fn origin_url(&self) -> String {
        format!("https://{}", self.distribution_domain.token())
    }

    pub fn asset_bucket_id(&self) -> &str {
        &self.asset_bucket_id
    }

    pub fn distribution_id(&self) -> &str {
        &self.distribution_id
    }
}
