//! Deployment entry point: reads the operator context, declares the edge
//! access-control stack and the application stack, records the ordering edge
//! between them, and synthesizes the final plan.

use std::path::Path;

use anyhow::Context as _;
use app_stack::ChatAppStack;
use deploy_params::DeploymentContext;
use edge_stack::{EdgeAclParams, EdgeAclStack};
use synth_graph::{App, DeploymentPlan};
use tracing::info;

/// Wire both stacks into an `App` ready to synthesize.
///
/// The edge stack is pinned to its provider-mandated region while the
/// application stack follows the context's region, so cross-region output
/// passing is enabled up front. The application stack's dependency on the
/// edge stack is recorded explicitly; nothing relies on declaration order.
pub fn build_app(context: &DeploymentContext) -> anyhow::Result<App> {
    let edge = EdgeAclStack::declare(&EdgeAclParams {
        domain_name: context.domain_name.clone(),
        allowed_v4: context.app_allowed_v4.clone(),
        allowed_v6: context.app_allowed_v6.clone(),
    })?;
    let chat = ChatAppStack::declare(
        context,
        EdgeAclStack::web_acl_arn(),
        EdgeAclStack::certificate_arn(),
    )?;

    let mut app = App::new();
    app.enable_cross_region_references();
    app.add_stack(edge.into_stack())?;
    app.add_stack(chat.into_stack())?;
    app.add_dependency(app_stack::STACK_NAME, edge_stack::STACK_NAME);
    Ok(app)
}

/// Full pipeline: context file to ordered deployment plan.
pub fn synthesize(context_path: &Path) -> anyhow::Result<DeploymentPlan> {
    let context = DeploymentContext::load(context_path)
        .with_context(|| format!("loading deployment context from {}", context_path.display()))?;
    let app = build_app(&context)?;
    let plan = app.synth().context("synthesizing deployment plan")?;
    info!(stacks = plan.stacks.len(), "deployment plan ready");
    Ok(plan)
}
