//! User directory resources: pool, app client, hosted sign-in domain and the
//! federated identity providers layered on top.

use deploy_params::IdentityProvider;
use serde_json::json;
use synth_graph::{Attr, Resource, Stack};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct AuthProps<'a> {
    pub user_pool_domain_prefix: &'a str,
    pub allowed_sign_up_email_domains: &'a [String],
    pub identity_providers: &'a [IdentityProvider],
}

/// Declared authentication resources.
#[derive(Debug, Clone)]
pub struct Auth {
    user_pool_id: Attr,
    client_id: Attr,
}

impl Auth {
    pub fn declare(stack: &mut Stack, props: AuthProps<'_>) -> Result<Self> {
        let user_pool = Resource::new(
            "UserPool",
            "AWS::Cognito::UserPool",
            json!({
                "selfSignUpEnabled": true,
                "signInAliases": { "email": true },
                "allowedSignUpEmailDomains": props.allowed_sign_up_email_domains,
            }),
        );
        let user_pool_id = user_pool.attr("Id");
        stack.add_resource(user_pool)?;

        let mut client = Resource::new(
            "UserPoolClient",
            "AWS::Cognito::UserPoolClient",
            json!({
                "userPoolId": user_pool_id.token(),
                "oAuth": { "flows": ["authorization_code"] },
            }),
        );
        // Sign-in can only be delegated once the providers exist.
        for provider in props.identity_providers {
            client = client.depends_on(provider_logical_id(provider));
        }
        let client_id = client.attr("Id");
        stack.add_resource(client)?;

        stack.add_resource(Resource::new(
            "UserPoolDomain",
            "AWS::Cognito::UserPoolDomain",
            json!({
                "userPoolId": user_pool_id.token(),
                "domainPrefix": props.user_pool_domain_prefix,
            }),
        ))?;

        for provider in props.identity_providers {
            stack.add_resource(provider_resource(provider, &user_pool_id))?;
        }

        Ok(Self {
            user_pool_id,
            client_id,
        })
    }

    pub fn user_pool_id(&self) -> &Attr {
        &self.user_pool_id
    }

    pub fn client_id(&self) -> &Attr {
        &self.client_id
    }
}

fn provider_logical_id(provider: &IdentityProvider) -> String {
    match provider.service.as_str() {
        "oidc" => "CustomProvider".to_string(),
        service => {
            let mut id = service.to_string();
            if let Some(first) = id.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            format!("{id}Provider")
        }
    }
}

fn provider_type(service: &str) -> &'static str {
    match service {
        "google" => "Google",
        "facebook" => "Facebook",
        "amazon" => "LoginWithAmazon",
        "apple" => "SignInWithApple",
        // Context validation only admits the services above plus oidc.
        _ => "OIDC",
    }
}

fn provider_resource(provider: &IdentityProvider, user_pool_id: &Attr) -> Resource {
    let mut properties = json!({
        "userPoolId": user_pool_id.token(),
        "providerType": provider_type(&provider.service),
    });
    if let Some(name) = &provider.service_name {
        properties["providerName"] = json!(name);
    }
    if let Some(secret) = &provider.secret_name {
        properties["clientSecretName"] = json!(secret);
    }
    Resource::new(
        provider_logical_id(provider),
        "AWS::Cognito::UserPoolIdentityProvider",
        properties,
    )
}
