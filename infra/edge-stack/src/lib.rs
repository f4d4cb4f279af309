//! Edge access-control stack.
//!
//! The CDN provider evaluates web ACLs for distributions in one fixed region,
//! so this stack is pinned there regardless of where the application deploys.
//! It owns the frontend allow-list policy and the viewer certificate, and
//! exposes both as named outputs for the application stack to import.

pub mod acl;

pub use acl::{AclScope, AllowListAcl};

use deploy_params::AddressRangeSet;
use serde_json::json;
use synth_graph::{OutputRef, Resource, Result, Stack};
use tracing::info;

/// Region the CDN provider requires edge-scoped ACLs to live in.
pub const EDGE_REGION: &str = "us-east-1";

pub const STACK_NAME: &str = "FrontendWafStack";
pub const OUTPUT_WEB_ACL_ARN: &str = "WebAclArn";
pub const OUTPUT_CERTIFICATE_ARN: &str = "CertificateArn";

const ACL_NAME: &str = "FrontendWebAcl";

#[derive(Debug, Clone)]
pub struct EdgeAclParams {
    pub domain_name: String,
    pub allowed_v4: AddressRangeSet,
    pub allowed_v6: AddressRangeSet,
}

/// The provisioned edge stack and its cross-stack output references.
#[derive(Debug)]
pub struct EdgeAclStack {
    stack: Stack,
}

impl EdgeAclStack {
    pub fn declare(params: &EdgeAclParams) -> Result<Self> {
        let mut stack = Stack::new(STACK_NAME, EDGE_REGION);

        // DNS-validated certificate for the custom domain, looked up against
        // the public hosted zone of the same name.
        let certificate = Resource::new(
            "Certificate",
            "AWS::CertificateManager::Certificate",
            json!({
                "domainName": params.domain_name,
                "validationMethod": "DNS",
                "hostedZone": {
                    "domainName": params.domain_name,
                    "privateZone": false,
                },
            }),
        );
        let certificate_arn = certificate.attr("Arn");
        stack.add_resource(certificate)?;

        let policy = AllowListAcl::declare(
            &mut stack,
            ACL_NAME,
            AclScope::Cloudfront,
            &params.allowed_v4,
            &params.allowed_v6,
        )?;

        stack.add_output(OUTPUT_WEB_ACL_ARN, policy.arn().token())?;
        stack.add_output(OUTPUT_CERTIFICATE_ARN, certificate_arn.token())?;

        info!(
            domain = %params.domain_name,
            region = EDGE_REGION,
            "declared edge access-control stack"
        );
        Ok(Self { stack })
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }

    /// Import reference for the policy ARN output.
    pub fn web_acl_arn() -> OutputRef {
        OutputRef::new(STACK_NAME, OUTPUT_WEB_ACL_ARN)
    }

    /// Import reference for the certificate ARN output.
    pub fn certificate_arn() -> OutputRef {
        OutputRef::new(STACK_NAME, OUTPUT_CERTIFICATE_ARN)
    }
}
