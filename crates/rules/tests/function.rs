//! End-to-end runs through the request/response wrapper.

use serde_json::{json, Value};

use status_hooks_core::{ConditionStatus, Severity};
use status_hooks_rules::extra::EXTRA_RESOURCES_CONTEXT_KEY;
use status_hooks_rules::loader::PolicyLoader;
use status_hooks_rules::{run_function, FunctionRunner, RunRequest};

fn data_dir() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest.join("../../data")
}

fn load_request(filename: &str) -> RunRequest {
    let path = data_dir().join("requests").join(filename);
    let raw = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&raw).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

fn unstructured(kind: &str, name: &str, conditions: Value) -> Value {
    json!({
        "apiVersion": "s3.example.com/v1",
        "kind": kind,
        "metadata": {"name": name},
        "status": {"conditions": conditions}
    })
}

#[test]
fn sample_request_runs() {
    let rsp = run_function(&load_request("example-mr-failing.json"));

    assert_eq!(rsp.meta.tag, "example");
    assert!(rsp.succeeded());
    assert_eq!(rsp.conditions[0].condition_type, "CustomReady");
    assert_eq!(rsp.conditions[0].message.as_deref(), Some("some lower level error"));
}

#[test]
fn composite_and_extra_resources() {
    let policy = PolicyLoader::load_file(&data_dir().join("policies/examples/composite-and-extra.yaml")).unwrap();

    let request: RunRequest = serde_json::from_value(json!({
        "meta": {"tag": "extra"},
        "observed": {
            "composite": {"resource": unstructured("XStorage", "storage", json!([
                {"type": "Ready", "status": "False", "reason": "Creating"}
            ]))},
            "resources": {}
        },
        "context": {
            EXTRA_RESOURCES_CONTEXT_KEY: {
                "buckets": [
                    unstructured("Bucket", "logs", json!([
                        {"type": "Ready", "status": "False", "reason": "Failed", "message": "Access Denied"}
                    ])),
                    unstructured("Bucket", "data", json!([
                        {"type": "Ready", "status": "True", "reason": "Available"}
                    ]))
                ]
            }
        }
    }))
    .unwrap();

    let rsp = FunctionRunner::new().run_with_policy(&request, &policy);

    assert!(rsp.succeeded(), "{:?}", rsp.conditions);
    let storage = &rsp.conditions[0];
    assert_eq!(storage.condition_type, "StorageReady");
    assert_eq!(storage.status, ConditionStatus::False);
    assert_eq!(storage.message.as_deref(), Some("bucket not ready: access denied"));

    assert_eq!(rsp.events.len(), 1);
    assert_eq!(rsp.events[0].severity, Severity::Normal);
    assert_eq!(rsp.events[0].message, "Access Denied");
}

#[test]
fn composite_not_creating_skips_hook() {
    let policy = PolicyLoader::load_file(&data_dir().join("policies/examples/composite-and-extra.yaml")).unwrap();
    let request: RunRequest = serde_json::from_value(json!({
        "observed": {
            "composite": {"resource": unstructured("XStorage", "storage", json!([
                {"type": "Ready", "status": "True", "reason": "Available"}
            ]))}
        }
    }))
    .unwrap();

    let rsp = FunctionRunner::new().run_with_policy(&request, &policy);
    assert_eq!(rsp.conditions.len(), 1);
    assert!(rsp.succeeded());
    assert!(rsp.events.is_empty());
}

#[test]
fn continues_on_failure() {
    let request: RunRequest = serde_json::from_value(json!({
        "meta": {"tag": "hello"},
        "input": {
            "apiVersion": "function-status-transformer.fn.crossplane.io/v1beta1",
            "kind": "StatusTransformation",
            "statusConditionHooks": [
                {
                    "matchers": [{
                        "resources": [{"name": "example-mr"}],
                        "conditions": [{
                            "type": "Synced",
                            "status": "False",
                            "reason": "ReconcileError",
                            "message": "a bad regex (?!)"
                        }]
                    }],
                    "setConditions": [{
                        "condition": {
                            "type": "CustomReady",
                            "status": "False",
                            "reason": "InternalError",
                            "message": "a matcher failed, this should not be set"
                        }
                    }]
                },
                {
                    "matchers": [{
                        "resources": [{"name": "example-mr"}],
                        "conditions": [{
                            "type": "Synced",
                            "status": "False",
                            "reason": "ReconcileError",
                            "message": "Something went wrong: (?P<Error>.+)"
                        }]
                    }],
                    "setConditions": [
                        {"condition": {
                            "type": "ShouldNotBeSet",
                            "status": "False",
                            "reason": "InternalError",
                            "message": "this condition will fail {{ .Error }"
                        }},
                        {"condition": {
                            "type": "CustomReady",
                            "status": "False",
                            "reason": "InternalError",
                            "message": "this condition should be set, error: {{ .Error }}"
                        }}
                    ]
                }
            ]
        },
        "observed": {
            "resources": {
                "example-mr": {"resource": {
                    "apiVersion": "some.example.com/v1alpha1",
                    "kind": "Object",
                    "metadata": {"name": "example-name"},
                    "status": {"conditions": [{
                        "type": "Synced",
                        "status": "False",
                        "reason": "ReconcileError",
                        "message": "Something went wrong: some lower level error"
                    }]}
                }}
            }
        }
    }))
    .unwrap();

    let rsp = run_function(&request);
    let reasons: Vec<_> = rsp.conditions.iter().map(|c| c.reason.as_str()).collect();
    assert_eq!(
        reasons,
        vec!["MatchFailure", "SetConditionFailure", "InternalError", "SetConditionFailure"]
    );
    assert!(rsp.conditions[0].message.as_deref().unwrap().starts_with(
        "cannot match resources, statusConditionHookIndex: 0, matchConditionIndex: 0: cannot compile message regex: "
    ));
    assert_eq!(
        rsp.conditions[2].message.as_deref(),
        Some("this condition should be set, error: some lower level error")
    );
    assert!(!rsp.succeeded());
}
