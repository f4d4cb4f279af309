//! Main application stack: frontend delivery, user directory, deploy-time
//! build, and the regional allow-list for the separately published API.
//!
//! Consumes the edge stack's two outputs (access policy ARN and certificate
//! ARN) via explicit imports; it owns neither resource and only references
//! them read-only.

pub mod auth;
pub mod build_env;
pub mod database;
pub mod error;
pub mod frontend;

pub use error::{Result, StackError};

use deploy_params::DeploymentContext;
use edge_stack::{AclScope, AllowListAcl};
use serde_json::json;
use synth_graph::{OutputRef, Resource, Stack};
use tracing::info;

use auth::{Auth, AuthProps};
use build_env::BuildEnvInputs;
use frontend::{Frontend, FrontendProps, ViewerCertificate};

pub const STACK_NAME: &str = "ChatAppStack";

pub const OUTPUT_FRONTEND_URL: &str = "FrontendURL";
pub const OUTPUT_PUBLISHED_API_ACL_ARN: &str = "PublishedApiWebAclArn";

/// The declared application stack.
#[derive(Debug)]
pub struct ChatAppStack {
    stack: Stack,
}

impl ChatAppStack {
    /// Declare every application resource from the deployment context plus
    /// the edge stack's output references.
    pub fn declare(
        context: &DeploymentContext,
        web_acl_arn: OutputRef,
        certificate_arn: OutputRef,
    ) -> Result<Self> {
        let mut stack = Stack::new(STACK_NAME, &context.region);

        let web_acl_token = stack.import(web_acl_arn);
        let certificate_token = stack.import(certificate_arn);

        let access_log_bucket = Resource::new(
            "AccessLogBucket",
            "AWS::S3::Bucket",
            json!({
                "encryption": "S3_MANAGED",
                "blockPublicAccess": "BLOCK_ALL",
                "enforceSsl": true,
            }),
        );
        let access_log_ref = access_log_bucket.attr("Name");
        stack.add_resource(access_log_bucket)?;

        let viewer_certificate = ViewerCertificate::pair(
            Some(context.domain_name.clone()),
            Some(certificate_token),
        )?;
        let frontend = Frontend::declare(
            &mut stack,
            FrontendProps {
                web_acl_arn: web_acl_token,
                access_log_bucket: access_log_ref,
                viewer_certificate,
            },
        )?;

        // Regional allow-list for the published API; the API itself lives
        // outside this stack and attaches the policy by ARN.
        let published_api_acl = AllowListAcl::declare(
            &mut stack,
            "PublishedApiWebAcl",
            AclScope::Regional,
            &context.published_api_allowed_v4,
            &context.published_api_allowed_v6,
        )?;
        stack.add_output(OUTPUT_PUBLISHED_API_ACL_ARN, published_api_acl.arn().token())?;

        let auth = Auth::declare(
            &mut stack,
            AuthProps {
                user_pool_domain_prefix: &context.user_pool_domain_prefix,
                allowed_sign_up_email_domains: &context.allowed_sign_up_email_domains,
                identity_providers: &context.identity_providers,
            },
        )?;

        let origin = frontend.origin_url();
        let user_pool_id = auth.user_pool_id().token();
        let user_pool_client_id = auth.client_id().token();
        let inputs = BuildEnvInputs {
            backend_api_endpoint: &context.backend_api_endpoint,
            ws_api_endpoint: &context.ws_api_endpoint,
            user_pool_id: &user_pool_id,
            user_pool_client_id: &user_pool_client_id,
            region: &context.region,
            user_pool_domain_prefix: &context.user_pool_domain_prefix,
            app_origin: &origin,
            federation: &context.federation,
        };
        let env = build_env::assemble(&inputs)?;
        build_env::declare_build(&mut stack, &frontend, &env, &inputs)?;

        database::declare_maintenance(&mut stack, &context.maintenance_window)?;

        stack.add_output(OUTPUT_FRONTEND_URL, origin)?;

        info!(
            stack = STACK_NAME,
            region = %context.region,
            resources = stack.resources().len(),
            "declared application stack"
        );
        Ok(Self { stack })
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn into_stack(self) -> Stack {
        self.stack
    }
}
