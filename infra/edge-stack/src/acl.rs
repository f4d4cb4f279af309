//! Default-deny access policy built from per-family IP allow-lists.
//!
//! The policy is two rule-set resources (one per address family) referenced
//! by exactly two allow rules under a blocking default action. Both rules
//! allow, so their relative order only affects metrics, never the decision.

use deploy_params::AddressRangeSet;
use serde_json::json;
use synth_graph::{Attr, Resource, Result, Stack};
use tracing::debug;

/// Where the policy is evaluated. The CDN layer requires its own scope and
/// pins the owning stack to the provider's edge region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclScope {
    Cloudfront,
    Regional,
}

impl AclScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cloudfront => "CLOUDFRONT",
            Self::Regional => "REGIONAL",
        }
    }
}

/// Handle to a declared allow-list policy.
#[derive(Debug, Clone)]
pub struct AllowListAcl {
    arn: Attr,
}

impl AllowListAcl {
    /// Declare one rule set per family and the default-deny policy binding
    /// them, using `name` for the policy, its metrics, and logical-id
    /// prefixes. Deterministic: identical inputs declare identical resources.
    ///
    /// Empty range sets are bound as-is; their rule then never matches.
    pub fn declare(
        stack: &mut Stack,
        name: &str,
        scope: AclScope,
        allowed_v4: &AddressRangeSet,
        allowed_v6: &AddressRangeSet,
    ) -> Result<Self> {
        let v4_set = ip_set(&format!("{name}IpV4Set"), scope, allowed_v4);
        let v6_set = ip_set(&format!("{name}IpV6Set"), scope, allowed_v6);
        let v4_arn = v4_set.attr("Arn");
        let v6_arn = v6_set.attr("Arn");
        stack.add_resource(v4_set)?;
        stack.add_resource(v6_set)?;

        debug!(
            policy = name,
            scope = scope.as_str(),
            v4_ranges = allowed_v4.len(),
            v6_ranges = allowed_v6.len(),
            "declaring allow-list policy"
        );

        let acl = Resource::new(
            name,
            "AWS::WAFv2::WebACL",
            json!({
                "name": name,
                "scope": scope.as_str(),
                "defaultAction": { "block": {} },
                "visibilityConfig": visibility_config(name),
                "rules": [
                    allow_rule(0, &format!("{name}IpV4RuleSet"), name, &v4_arn),
                    allow_rule(1, &format!("{name}IpV6RuleSet"), name, &v6_arn),
                ],
            }),
        );
        let arn = acl.attr("Arn");
        stack.add_resource(acl)?;

        Ok(Self { arn })
    }

    /// Attribute reference to the policy ARN, for attaching to distributions.
    pub fn arn(&self) -> &Attr {
        &self.arn
    }
}

fn ip_set(logical_id: &str, scope: AclScope, ranges: &AddressRangeSet) -> Resource {
    Resource::new(
        logical_id,
        "AWS::WAFv2::IPSet",
        json!({
            "ipAddressVersion": ranges.family().as_str(),
            "scope": scope.as_str(),
            "addresses": ranges.ranges(),
        }),
    )
}

fn allow_rule(priority: u32, rule_name: &str, metric_name: &str, ip_set_arn: &Attr) -> serde_json::Value {
    json!({
        "priority": priority,
        "name": rule_name,
        "action": { "allow": {} },
        "visibilityConfig": visibility_config(metric_name),
        "statement": {
            "ipSetReferenceStatement": { "arn": ip_set_arn.token() },
        },
    })
}

fn visibility_config(metric_name: &str) -> serde_json::Value {
    json!({
        "cloudWatchMetricsEnabled": true,
        "metricName": metric_name,
        "sampledRequestsEnabled": true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_params::AddressRangeSet;
    use synth_graph::Stack;

    fn declare(v4: Vec<String>, v6: Vec<String>) -> Stack {
        let mut stack = Stack::new("Test", "us-east-1");
        let v4 = AddressRangeSet::v4(v4).unwrap();
        let v6 = AddressRangeSet::v6(v6).unwrap();
        AllowListAcl::declare(&mut stack, "FrontendWebAcl", AclScope::Cloudfront, &v4, &v6)
            .unwrap();
        stack
    }

    #[test]
    fn policy_has_two_allow_rules_and_blocking_default() {
        let stack = declare(vec!["10.0.0.0/8".into()], vec!["2001:db8::/32".into()]);
        let acl = stack.resource("FrontendWebAcl").unwrap();

        assert_eq!(acl.properties["defaultAction"], serde_json::json!({ "block": {} }));
        let rules = acl.properties["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 2);
        for rule in rules {
            assert_eq!(rule["action"], serde_json::json!({ "allow": {} }));
        }
    }

    #[test]
    fn rule_priorities_are_unique_and_ascending() {
        let stack = declare(vec!["10.0.0.0/8".into()], vec!["2001:db8::/32".into()]);
        let acl = stack.resource("FrontendWebAcl").unwrap();
        let priorities: Vec<u64> = acl.properties["rules"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["priority"].as_u64().unwrap())
            .collect();
        assert_eq!(priorities, vec![0, 1]);
    }

    #[test]
    fn rule_sets_carry_family_and_scope() {
        let stack = declare(vec!["10.0.0.0/8".into()], vec![]);
        let v4 = stack.resource("FrontendWebAclIpV4Set").unwrap();
        let v6 = stack.resource("FrontendWebAclIpV6Set").unwrap();

        assert_eq!(v4.properties["ipAddressVersion"], "IPV4");
        assert_eq!(v6.properties["ipAddressVersion"], "IPV6");
        assert_eq!(v4.properties["scope"], "CLOUDFRONT");
        assert_eq!(v4.properties["addresses"], serde_json::json!(["10.0.0.0/8"]));
        // Empty family still binds a (never-matching) set.
        assert_eq!(v6.properties["addresses"], serde_json::json!([]));
    }

    #[test]
    fn declaration_is_deterministic() {
        let a = declare(vec!["10.0.0.0/8".into()], vec!["2001:db8::/32".into()]);
        let b = declare(vec!["10.0.0.0/8".into()], vec!["2001:db8::/32".into()]);
        assert_eq!(a, b);
    }
}
