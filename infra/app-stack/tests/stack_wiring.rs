use app_stack::{ChatAppStack, OUTPUT_FRONTEND_URL, OUTPUT_PUBLISHED_API_ACL_ARN};
use deploy_params::DeploymentContext;
use synth_graph::OutputRef;

fn context(with_federation: bool) -> DeploymentContext {
    let providers = if with_federation {
        r#", "identity_providers": [{ "service": "google", "secret_name": "google/client" }]"#
    } else {
        ""
    };
    let json = format!(
        r#"{{
            "domain_name": "chat.example.com",
            "region": "eu-west-1",
            "backend_api_endpoint": "https://api.example.com",
            "ws_api_endpoint": "wss://ws.example.com",
            "allowed_ip_v4_address_ranges": ["203.0.113.0/24"],
            "allowed_ip_v6_address_ranges": ["2001:db8::/32"],
            "published_api_allowed_ip_v4_address_ranges": ["198.51.100.0/24"],
            "published_api_allowed_ip_v6_address_ranges": ["2001:db8:1::/48"],
            "allowed_sign_up_email_domains": ["example.com"],
            "user_pool_domain_prefix": "myapp"{providers}
        }}"#
    );
    DeploymentContext::from_json_str(&json).unwrap()
}

fn declare(with_federation: bool) -> ChatAppStack {
    ChatAppStack::declare(
        &context(with_federation),
        OutputRef::new("FrontendWafStack", "WebAclArn"),
        OutputRef::new("FrontendWafStack", "CertificateArn"),
    )
    .unwrap()
}

#[test]
fn records_both_edge_imports() {
    let app = declare(false);
    let imports = app.stack().imports();
    assert_eq!(imports.len(), 2);
    assert!(imports.contains(&OutputRef::new("FrontendWafStack", "WebAclArn")));
    assert!(imports.contains(&OutputRef::new("FrontendWafStack", "CertificateArn")));
}

#[test]
fn distribution_binds_imported_policy_and_certificate() {
    let app = declare(false);
    let distribution = app.stack().resource("Distribution").unwrap();
    assert_eq!(
        distribution.properties["webAclId"],
        "${FrontendWafStack.Outputs.WebAclArn}"
    );
    let viewer = &distribution.properties["viewerCertificate"];
    assert_eq!(viewer["aliases"], serde_json::json!(["chat.example.com"]));
    assert_eq!(
        viewer["acmCertificateArn"],
        "${FrontendWafStack.Outputs.CertificateArn}"
    );
}

#[test]
fn build_step_is_gated_on_the_distribution() {
    let app = declare(false);
    let build = app.stack().resource("ReactBuild").unwrap();
    assert!(build.depends_on.contains(&"Distribution".to_string()));
    assert_eq!(build.properties["outputSourceDirectory"], "dist");
}

#[test]
fn build_environment_has_no_federation_keys_without_federation() {
    let app = declare(false);
    let build = app.stack().resource("ReactBuild").unwrap();
    let env = build.properties["buildEnvironment"].as_object().unwrap();
    assert_eq!(env.len(), 6);
    assert!(env.contains_key("VITE_APP_API_ENDPOINT"));
    assert!(!env.contains_key("VITE_APP_COGNITO_DOMAIN"));
    assert!(app.stack().output("CognitoDomain").is_none());
}

#[test]
fn federation_adds_keys_and_diagnostic_outputs() {
    let app = declare(true);
    let build = app.stack().resource("ReactBuild").unwrap();
    let env = build.properties["buildEnvironment"].as_object().unwrap();
    assert_eq!(env.len(), 12);
    assert_eq!(
        env["VITE_APP_COGNITO_DOMAIN"],
        "myapp.auth.eu-west-1.amazoncognito.com/"
    );
    assert_eq!(env["VITE_APP_SOCIAL_PROVIDERS"], "google");

    assert_eq!(
        app.stack().output("CognitoDomain").unwrap().value,
        "myapp.auth.eu-west-1.amazoncognito.com/"
    );
    assert_eq!(app.stack().output("SocialProviders").unwrap().value, "google");
}

#[test]
fn published_api_policy_is_regional_and_exported() {
    let app = declare(false);
    let acl = app.stack().resource("PublishedApiWebAcl").unwrap();
    assert_eq!(acl.properties["scope"], "REGIONAL");
    assert_eq!(acl.properties["defaultAction"], serde_json::json!({ "block": {} }));
    assert!(app.stack().output(OUTPUT_PUBLISHED_API_ACL_ARN).is_some());
}

#[test]
fn frontend_url_output_is_the_distribution_origin() {
    let app = declare(false);
    assert_eq!(
        app.stack().output(OUTPUT_FRONTEND_URL).unwrap().value,
        "https://${Distribution.DomainName}"
    );
}

#[test]
fn redeclaration_is_structurally_identical() {
    let a = declare(true);
    let b = declare(true);
    assert_eq!(a.stack(), b.stack());
}
