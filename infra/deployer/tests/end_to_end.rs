use app_stack::ChatAppStack;
use deploy_params::DeploymentContext;
use edge_stack::{EdgeAclParams, EdgeAclStack};
use synth_graph::{App, SynthError};

const CONTEXT: &str = r#"{
    "domain_name": "chat.example.com",
    "region": "eu-west-1",
    "backend_api_endpoint": "https://api.example.com",
    "ws_api_endpoint": "wss://ws.example.com",
    "allowed_ip_v4_address_ranges": ["203.0.113.0/24"],
    "allowed_ip_v6_address_ranges": ["2001:db8::/32"],
    "published_api_allowed_ip_v4_address_ranges": ["198.51.100.0/24"],
    "published_api_allowed_ip_v6_address_ranges": ["2001:db8:1::/48"],
    "allowed_sign_up_email_domains": ["example.com"],
    "identity_providers": [{ "service": "google", "secret_name": "google/client" }],
    "user_pool_domain_prefix": "myapp"
}"#;

fn context() -> DeploymentContext {
    DeploymentContext::from_json_str(CONTEXT).unwrap()
}

#[test]
fn edge_stack_is_provisioned_before_the_app_stack() {
    let plan = deployer::build_app(&context()).unwrap().synth().unwrap();
    assert!(
        plan.position(edge_stack::STACK_NAME).unwrap()
            < plan.position(app_stack::STACK_NAME).unwrap()
    );
}

#[test]
fn plan_carries_both_cross_stack_outputs() {
    let plan = deployer::build_app(&context()).unwrap().synth().unwrap();
    let edge = plan.stack(edge_stack::STACK_NAME).unwrap();
    assert!(edge.output(edge_stack::OUTPUT_WEB_ACL_ARN).is_some());
    assert!(edge.output(edge_stack::OUTPUT_CERTIFICATE_ARN).is_some());
}

#[test]
fn stacks_target_their_own_regions() {
    let plan = deployer::build_app(&context()).unwrap().synth().unwrap();
    assert_eq!(plan.stack(edge_stack::STACK_NAME).unwrap().region(), "us-east-1");
    assert_eq!(plan.stack(app_stack::STACK_NAME).unwrap().region(), "eu-west-1");
}

#[test]
fn synthesis_fails_without_the_explicit_ordering_edge() {
    let context = context();
    let edge = EdgeAclStack::declare(&EdgeAclParams {
        domain_name: context.domain_name.clone(),
        allowed_v4: context.app_allowed_v4.clone(),
        allowed_v6: context.app_allowed_v6.clone(),
    })
    .unwrap();
    let chat = ChatAppStack::declare(
        &context,
        EdgeAclStack::web_acl_arn(),
        EdgeAclStack::certificate_arn(),
    )
    .unwrap();

    let mut app = App::new();
    app.enable_cross_region_references();
    app.add_stack(edge.into_stack()).unwrap();
    app.add_stack(chat.into_stack()).unwrap();
    // No add_dependency: the imports must make synthesis fail.

    assert!(matches!(
        app.synth().unwrap_err(),
        SynthError::MissingDependencyEdge { .. }
    ));
}

#[test]
fn synthesis_fails_without_cross_region_references() {
    let context = context();
    let edge = EdgeAclStack::declare(&EdgeAclParams {
        domain_name: context.domain_name.clone(),
        allowed_v4: context.app_allowed_v4.clone(),
        allowed_v6: context.app_allowed_v6.clone(),
    })
    .unwrap();
    let chat = ChatAppStack::declare(
        &context,
        EdgeAclStack::web_acl_arn(),
        EdgeAclStack::certificate_arn(),
    )
    .unwrap();

    let mut app = App::new();
    app.add_stack(edge.into_stack()).unwrap();
    app.add_stack(chat.into_stack()).unwrap();
    app.add_dependency(app_stack::STACK_NAME, edge_stack::STACK_NAME);

    assert!(matches!(
        app.synth().unwrap_err(),
        SynthError::CrossRegionDisabled { .. }
    ));
}

#[test]
fn synthesis_is_deterministic_end_to_end() {
    let run = || {
        deployer::build_app(&context())
            .unwrap()
            .synth()
            .unwrap()
            .to_json()
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn synthesize_reads_a_context_file() {
    let path = std::env::temp_dir().join("chat-infra-end-to-end.json");
    std::fs::write(&path, CONTEXT).unwrap();

    let plan = deployer::synthesize(&path).unwrap();
    assert_eq!(plan.stacks.len(), 2);

    let rendered = plan.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
    assert_eq!(parsed["stacks"][0]["name"], "FrontendWafStack");
    assert_eq!(parsed["stacks"][1]["name"], "ChatAppStack");

    std::fs::remove_file(&path).ok();
}
