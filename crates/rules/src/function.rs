//! Request/response wrapper around the hook evaluator.
//!
//! A [`RunRequest`] carries the policy as its `input`, the observed composite
//! and resources as unstructured JSON, and a free-form context map. Running
//! never fails: every error ends up as a condition on the [`RunResponse`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use status_hooks_core::{ConditionStatus, ObservedObject, OutputCondition, OutputEvent};
use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostics;
use crate::evaluator::{
    EvaluationInput, HookEvaluator, REASON_INPUT_FAILURE, REASON_OBSERVED_COMPOSITE_FAILURE,
    SUCCESS_CONDITION_TYPE,
};
use crate::extra::ContextExtraResources;
use crate::loader::PolicyLoader;
use crate::schema::StatusTransformation;

/// Default time-to-live of a response.
pub const DEFAULT_TTL_SECONDS: u64 = 60;

// ── Request ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub meta: RequestMeta,
    /// The policy document, usually a `StatusTransformation`.
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub observed: ObservedState,
    #[serde(default)]
    pub context: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestMeta {
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composite: Option<ObservedResource>,
    #[serde(default)]
    pub resources: BTreeMap<String, ObservedResource>,
}

/// An observed object as unstructured JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservedResource {
    #[serde(default)]
    pub resource: Value,
}

// ── Response ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    pub meta: ResponseMeta,
    pub conditions: Vec<OutputCondition>,
    #[serde(default)]
    pub events: Vec<OutputEvent>,
    #[serde(default, skip_serializing_if = "Diagnostics::is_empty")]
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub tag: String,
    pub ttl_seconds: u64,
}

impl RunResponse {
    fn new(tag: &str, ttl_seconds: u64) -> Self {
        Self {
            meta: ResponseMeta {
                tag: tag.to_string(),
                ttl_seconds,
            },
            conditions: Vec::new(),
            events: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// A response carrying a single fatal failure condition.
    fn fatal(mut self, reason: &str, message: String) -> Self {
        warn!(reason, error = %message, "run aborted");
        self.conditions.push(
            OutputCondition::new(SUCCESS_CONDITION_TYPE, ConditionStatus::False, reason).with_message(message),
        );
        self
    }

    /// Whether the run completed without recorded failures.
    pub fn succeeded(&self) -> bool {
        self.conditions
            .last()
            .is_some_and(|c| c.condition_type == SUCCESS_CONDITION_TYPE && c.status == ConditionStatus::True)
    }
}

// ── Runner ──────────────────────────────────────────────────────────

/// Runs requests through the hook evaluator.
#[derive(Debug, Clone)]
pub struct FunctionRunner {
    ttl_seconds: u64,
}

impl Default for FunctionRunner {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl FunctionRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Run a request, reading the policy from its `input`.
    pub fn run(&self, request: &RunRequest) -> RunResponse {
        debug!(tag = %request.meta.tag, "running function");
        let response = RunResponse::new(&request.meta.tag, self.ttl_seconds);

        match PolicyLoader::from_value(&request.input) {
            Ok(policy) => self.evaluate(request, &policy, response),
            Err(e) => response.fatal(REASON_INPUT_FAILURE, format!("cannot get Function input: {}", e)),
        }
    }

    /// Run a request against `policy`, ignoring its `input`.
    pub fn run_with_policy(&self, request: &RunRequest, policy: &StatusTransformation) -> RunResponse {
        debug!(tag = %request.meta.tag, policy = %policy.display_name(), "running function with supplied policy");
        let response = RunResponse::new(&request.meta.tag, self.ttl_seconds);
        self.evaluate(request, policy, response)
    }

    fn evaluate(&self, request: &RunRequest, policy: &StatusTransformation, mut response: RunResponse) -> RunResponse {
        let composite = match &request.observed.composite {
            None => ObservedObject::default(),
            Some(observed) => match ObservedObject::from_unstructured(&observed.resource) {
                Ok(object) => object,
                Err(e) => {
                    return response.fatal(
                        REASON_OBSERVED_COMPOSITE_FAILURE,
                        format!("cannot get observed composite resource: {}", e),
                    )
                }
            },
        };

        let mut observed = BTreeMap::new();
        let mut rejected = BTreeMap::new();
        for (key, resource) in &request.observed.resources {
            match ObservedObject::from_unstructured(&resource.resource) {
                Ok(object) => {
                    observed.insert(key.clone(), object);
                }
                Err(e) => {
                    debug!(observed_map_key = %key, error = %e, "observed resource is not convertible");
                    rejected.insert(key.clone(), e.to_string());
                }
            }
        }

        let extra = ContextExtraResources::new(&request.context);
        let input = EvaluationInput::new(&observed, &composite, &extra).with_rejected(&rejected);

        match HookEvaluator::evaluate(policy.hooks(), &input) {
            Ok(outcome) => {
                info!(
                    tag = %request.meta.tag,
                    composite = %composite.name,
                    resources = observed.len(),
                    succeeded = outcome.succeeded(),
                    "function run complete"
                );
                response.conditions = outcome.conditions;
                response.events = outcome.events;
                response.diagnostics = outcome.diagnostics;
                response
            }
            Err(e) => response.fatal(REASON_INPUT_FAILURE, format!("cannot load extra-resources: {}", e)),
        }
    }
}

/// Run a request with default settings.
pub fn run_function(request: &RunRequest) -> RunResponse {
    FunctionRunner::default().run(request)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::evaluator::{REASON_AVAILABLE, REASON_MATCH_FAILURE};

    fn policy_input() -> Value {
        json!({
            "apiVersion": "function-status-transformer.fn.crossplane.io/v1beta1",
            "kind": "StatusTransformation",
            "statusConditionHooks": [{
                "matchers": [{
                    "resources": [{"name": "example-mr"}],
                    "conditions": [{
                        "type": "Synced",
                        "status": "False",
                        "reason": "ReconcileError",
                        "message": "Something went wrong: (?P<Error>.+)"
                    }]
                }],
                "setConditions": [{
                    "target": "Composite",
                    "condition": {
                        "type": "CustomReady",
                        "status": "False",
                        "reason": "InternalError",
                        "message": "{{ .Error }}"
                    }
                }]
            }]
        })
    }

    fn example_mr() -> Value {
        json!({
            "apiVersion": "some.example.com/v1alpha1",
            "kind": "Object",
            "metadata": {"name": "example-name"},
            "status": {"conditions": [{
                "type": "Synced",
                "status": "False",
                "reason": "ReconcileError",
                "message": "Something went wrong: some lower level error"
            }]}
        })
    }

    fn request(input: Value, resources: Vec<(&str, Value)>) -> RunRequest {
        RunRequest {
            meta: RequestMeta { tag: "hello".to_string() },
            input,
            observed: ObservedState {
                composite: None,
                resources: resources
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), ObservedResource { resource: v }))
                    .collect(),
            },
            context: serde_json::Map::new(),
        }
    }

    #[test]
    fn successful_run() {
        let rsp = run_function(&request(policy_input(), vec![("example-mr", example_mr())]));

        assert_eq!(rsp.meta.tag, "hello");
        assert_eq!(rsp.meta.ttl_seconds, DEFAULT_TTL_SECONDS);
        assert_eq!(rsp.conditions.len(), 2);
        assert_eq!(rsp.conditions[0].message.as_deref(), Some("some lower level error"));
        assert_eq!(rsp.conditions[1].reason, REASON_AVAILABLE);
        assert!(rsp.succeeded());
    }

    #[test]
    fn bad_input_is_single_input_failure() {
        let rsp = run_function(&request(json!({"object": "not valid"}), vec![]));

        assert_eq!(rsp.conditions.len(), 1);
        let c = &rsp.conditions[0];
        assert_eq!(c.condition_type, SUCCESS_CONDITION_TYPE);
        assert_eq!(c.status, ConditionStatus::False);
        assert_eq!(c.reason, REASON_INPUT_FAILURE);
        assert!(c.message.as_deref().unwrap().starts_with("cannot get Function input: "));
        assert!(!rsp.succeeded());
    }

    #[test]
    fn selected_malformed_resource_fails_only_its_hook() {
        let rsp = run_function(&request(policy_input(), vec![("example-mr", json!("not an object"))]));

        let reasons: Vec<_> = rsp.conditions.iter().map(|c| c.reason.as_str()).collect();
        assert_eq!(reasons, vec![REASON_MATCH_FAILURE, REASON_MATCH_FAILURE]);
        assert_eq!(
            rsp.conditions[1].message.as_deref(),
            Some(
                "cannot match resources, statusConditionHookIndex: 0, matchConditionIndex: 0: \
                 cannot convert resource to object, resourcesIndex: 0, observedMapKey: example-mr: \
                 invalid object: expected an object, got string"
            )
        );
    }

    #[test]
    fn unselected_malformed_resource_is_ignored() {
        let unrelated = json!({
            "apiVersion": "some.example.com/v1alpha1",
            "kind": "Object",
            "status": {"conditions": {"type": "Ready"}}
        });
        let rsp = run_function(&request(
            policy_input(),
            vec![("example-mr", example_mr()), ("unrelated", unrelated)],
        ));

        assert!(rsp.succeeded(), "{:?}", rsp.conditions);
        assert_eq!(rsp.conditions[0].condition_type, "CustomReady");
    }

    #[test]
    fn lowercase_status_on_unrelated_resource_does_not_abort() {
        let unrelated = json!({
            "apiVersion": "some.example.com/v1alpha1",
            "kind": "Object",
            "status": {"conditions": [{"type": "Ready", "status": "true"}]}
        });
        let rsp = run_function(&request(
            policy_input(),
            vec![("example-mr", example_mr()), ("unrelated", unrelated)],
        ));

        assert!(rsp.succeeded(), "{:?}", rsp.conditions);
        assert_eq!(rsp.conditions[0].condition_type, "CustomReady");
        assert_eq!(rsp.conditions[0].message.as_deref(), Some("some lower level error"));
    }

    #[test]
    fn malformed_composite_is_observed_composite_failure() {
        let mut req = request(policy_input(), vec![]);
        req.observed.composite = Some(ObservedResource { resource: json!([1]) });
        let rsp = run_function(&req);
        assert_eq!(rsp.conditions.len(), 1);
        assert_eq!(rsp.conditions[0].reason, REASON_OBSERVED_COMPOSITE_FAILURE);
    }

    #[test]
    fn broken_extra_resources_are_input_failure() {
        let mut input = policy_input();
        input["statusConditionHooks"][0]["matchers"][0]["includeExtraResources"] = json!(true);
        let mut req = request(input, vec![("example-mr", example_mr())]);
        req.context.insert(
            crate::extra::EXTRA_RESOURCES_CONTEXT_KEY.to_string(),
            json!("not a map"),
        );
        let rsp = run_function(&req);
        assert_eq!(rsp.conditions.len(), 1);
        assert_eq!(rsp.conditions[0].reason, REASON_INPUT_FAILURE);
        assert!(rsp.conditions[0]
            .message
            .as_deref()
            .unwrap()
            .starts_with("cannot load extra-resources: "));
    }

    #[test]
    fn supplied_policy_overrides_input() {
        let policy = PolicyLoader::from_value(&policy_input()).unwrap();
        let req = request(Value::Null, vec![("example-mr", example_mr())]);
        let rsp = FunctionRunner::new().with_ttl(5).run_with_policy(&req, &policy);
        assert_eq!(rsp.meta.ttl_seconds, 5);
        assert_eq!(rsp.conditions[0].condition_type, "CustomReady");
    }

    #[test]
    fn request_deserializes_from_json() {
        let req: RunRequest = serde_json::from_value(json!({
            "meta": {"tag": "t"},
            "input": policy_input(),
            "observed": {"resources": {"example-mr": {"resource": example_mr()}}}
        }))
        .unwrap();
        assert_eq!(req.observed.resources.len(), 1);
        assert!(req.context.is_empty());

        let rsp = run_function(&req);
        let json = serde_json::to_value(&rsp).unwrap();
        assert_eq!(json["meta"]["ttlSeconds"], 60);
        assert_eq!(json["conditions"][0]["type"], "CustomReady");
        assert_eq!(json["conditions"][0]["target"], "Composite");
    }
}
