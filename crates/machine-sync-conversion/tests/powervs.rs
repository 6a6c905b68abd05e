//! Scenario tests for converting PowerVS-backed Cluster API resources
//!
//! Each test starts from manifests an operator would actually have in a
//! cluster (a Machine or MachineSet, its IBMPowerVS infrastructure object
//! and the IBMPowerVSCluster) and checks what the Machine API side sees.

use std::collections::BTreeMap;

use machine_sync_common::crd::capi;
use machine_sync_common::crd::mapi::{self, PowerVsResource, PowerVsResourceType};
use machine_sync_common::crd::powervs::{
    IbmPowerVsCluster, IbmPowerVsMachine, IbmPowerVsMachineTemplate,
};
use machine_sync_common::{Error, FieldErrorType, MAPI_CLUSTER_NAME_LABEL};
use machine_sync_conversion::capi2mapi::provider_spec::powervs_provider_config_from_raw_extension;
use machine_sync_conversion::capi2mapi::{
    ERR_MACHINE_POWERVS_MACHINE_POWERVS_CLUSTER_NIL,
    ERR_MACHINE_SET_POWERVS_TEMPLATE_POWERVS_CLUSTER_NIL,
};
use machine_sync_conversion::{
    MachineAndInfrastructureMachine, MachineSetAndMachineTemplate, PowerVsMachineConversion,
    PowerVsMachineSetConversion,
};

// =============================================================================
// Test Fixtures
// =============================================================================

fn machine() -> capi::Machine {
    serde_yaml::from_str(
        r#"
apiVersion: cluster.x-k8s.io/v1beta1
kind: Machine
metadata:
  name: worker-0
  namespace: openshift-cluster-api
  labels:
    tier: worker
spec:
  clusterName: prod
  bootstrap:
    dataSecretName: worker-user-data
  infrastructureRef:
    apiVersion: infrastructure.cluster.x-k8s.io/v1beta2
    kind: IBMPowerVSMachine
    name: worker-0
"#,
    )
    .expect("Machine fixture should parse")
}

fn powervs_machine() -> IbmPowerVsMachine {
    serde_yaml::from_str(
        r#"
apiVersion: infrastructure.cluster.x-k8s.io/v1beta2
kind: IBMPowerVSMachine
metadata:
  name: worker-0
  namespace: openshift-cluster-api
spec:
  serviceInstance:
    id: si-123
    name: my-instance
  sshKey: my-key
  image:
    name: rhcos-415
  systemType: s922
  processorType: Shared
  processors: "0.5"
  memoryGiB: 32
  network:
    regex: "^capi-net-.*$"
"#,
    )
    .expect("IBMPowerVSMachine fixture should parse")
}

fn powervs_cluster() -> IbmPowerVsCluster {
    serde_yaml::from_str(
        r#"
apiVersion: infrastructure.cluster.x-k8s.io/v1beta2
kind: IBMPowerVSCluster
metadata:
  name: prod
  namespace: openshift-cluster-api
spec:
  zone: dal10
  network:
    name: capi-net
"#,
    )
    .expect("IBMPowerVSCluster fixture should parse")
}

fn machine_set() -> capi::MachineSet {
    serde_yaml::from_str(
        r#"
apiVersion: cluster.x-k8s.io/v1beta1
kind: MachineSet
metadata:
  name: workers
  namespace: openshift-cluster-api
spec:
  clusterName: prod
  replicas: 3
  selector:
    matchLabels:
      tier: worker
  template:
    metadata:
      labels:
        tier: worker
    spec:
      clusterName: prod
      bootstrap:
        dataSecretName: worker-user-data
      infrastructureRef:
        apiVersion: infrastructure.cluster.x-k8s.io/v1beta2
        kind: IBMPowerVSMachineTemplate
        name: workers
"#,
    )
    .expect("MachineSet fixture should parse")
}

fn machine_template() -> IbmPowerVsMachineTemplate {
    let mut template = IbmPowerVsMachineTemplate::new("workers", Default::default());
    template.spec.template.spec = powervs_machine().spec;
    template
}

fn provider_config(machine: &mapi::Machine) -> mapi::PowerVsMachineProviderConfig {
    powervs_provider_config_from_raw_extension(machine.spec.provider_spec.value.as_ref())
        .expect("payload should decode")
        .expect("payload should be present")
}

fn field_paths(err: &Error) -> Vec<String> {
    err.field_errors().iter().map(|e| e.field.clone()).collect()
}

// =============================================================================
// Machine conversion
// =============================================================================

/// Story: a healthy worker converts to a Machine API Machine
#[test]
fn worker_machine_converts_to_mapi() {
    let (machine, powervs_machine, cluster) = (machine(), powervs_machine(), powervs_cluster());

    let (result, warnings) =
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster))
            .to_machine();

    let mapi_machine = result.expect("conversion should succeed");
    assert!(warnings.is_empty());
    assert_eq!(mapi_machine.metadata.name.as_deref(), Some("worker-0"));
    assert_eq!(
        mapi_machine.metadata.labels,
        Some(BTreeMap::from([("tier".to_string(), "worker".to_string())]))
    );

    let config = provider_config(&mapi_machine);
    assert_eq!(config.kind, "PowerVSMachineProviderConfig");
    assert_eq!(config.api_version, "machine.openshift.io/v1");
    // ID is checked before Name on the structured reference.
    assert_eq!(config.service_instance, Some(PowerVsResource::id("si-123")));
    assert_eq!(config.image, Some(PowerVsResource::name("rhcos-415")));
    assert_eq!(config.network, Some(PowerVsResource::regex("^capi-net-.*$")));
    assert_eq!(config.key_pair_name, "my-key");
    assert_eq!(config.memory_gib, 32);
    assert_eq!(
        config.user_data_secret.map(|s| s.name).as_deref(),
        Some("worker-user-data")
    );
}

/// Story: an older manifest still uses serviceInstanceID next to the new field
#[test]
fn legacy_service_instance_id_wins() {
    let (machine, cluster) = (machine(), powervs_cluster());
    let mut powervs_machine = powervs_machine();
    powervs_machine.spec.service_instance_id = "si-legacy".to_string();

    let (result, _) =
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster))
            .to_machine();

    let config = provider_config(&result.expect("conversion should succeed"));
    assert_eq!(config.service_instance, Some(PowerVsResource::id("si-legacy")));
}

/// Story: the image is only given by reference to an IBMPowerVSImage object
#[test]
fn image_ref_is_used_when_image_is_absent() {
    let (machine, cluster) = (machine(), powervs_cluster());
    let mut powervs_machine = powervs_machine();
    powervs_machine.spec.image = None;
    powervs_machine.spec.image_ref = Some(k8s_openapi::api::core::v1::LocalObjectReference {
        name: "rhel-image".to_string(),
    });

    let (result, _) =
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster))
            .to_machine();

    let config = provider_config(&result.expect("conversion should succeed"));
    assert_eq!(config.image, Some(PowerVsResource::name("rhel-image")));
}

/// Story: bootstrap data has not been generated yet
#[test]
fn empty_bootstrap_secret_is_not_referenced() {
    let (powervs_machine, cluster) = (powervs_machine(), powervs_cluster());
    let mut machine = machine();
    machine.spec.bootstrap.data_secret_name = Some(String::new());

    let (result, _) =
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster))
            .to_machine();

    let mapi_machine = result.expect("conversion should succeed");
    assert!(provider_config(&mapi_machine).user_data_secret.is_none());
    let payload: serde_json::Value = serde_json::from_slice(
        &mapi_machine
            .spec
            .provider_spec
            .value
            .as_ref()
            .expect("payload should be attached")
            .raw,
    )
    .expect("payload should be JSON");
    assert!(payload.get("userDataSecret").is_none());
}

/// Story: a badly written manifest gets every problem reported at once
#[test]
fn every_invalid_field_is_reported() {
    let (cluster, mut machine, mut powervs_machine) =
        (powervs_cluster(), machine(), powervs_machine());
    powervs_machine.spec.service_instance = None;
    powervs_machine.spec.image = None;
    powervs_machine.spec.network = Default::default();
    machine.spec.node_deletion_timeout = Some("1m".to_string());

    let (result, _) =
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster))
            .to_machine();

    let err = result.expect_err("conversion should fail");
    assert_eq!(
        field_paths(&err),
        vec![
            "spec.serviceInstance",
            "spec.image",
            "spec.network",
            "spec.nodeDeletionTimeout",
        ]
    );
    let network = err
        .field_errors()
        .into_iter()
        .find(|e| e.field == "spec.network")
        .expect("network error should be present");
    assert_eq!(network.error_type, FieldErrorType::Invalid);
    assert_eq!(network.bad_value, serde_json::json!({}));
}

/// Story: the caller lost track of one of the three objects
#[test]
fn each_missing_machine_input_fails_fast() {
    let (machine, powervs_machine, cluster) = (machine(), powervs_machine(), powervs_cluster());
    let conversions = [
        PowerVsMachineConversion::new(None, Some(&powervs_machine), Some(&cluster)),
        PowerVsMachineConversion::new(Some(&machine), None, Some(&cluster)),
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), None),
    ];

    for conversion in conversions {
        let (result, warnings) = conversion.to_machine();
        let err = result.expect_err("conversion should fail");
        assert!(err.is_precondition());
        assert_eq!(err.to_string(), ERR_MACHINE_POWERVS_MACHINE_POWERVS_CLUSTER_NIL);
        assert!(err.field_errors().is_empty());
        assert!(warnings.is_empty());
    }
}

/// Story: warnings come back whether or not the conversion succeeded
#[test]
fn warnings_survive_failure() {
    let (cluster, mut machine, mut powervs_machine) =
        (powervs_cluster(), machine(), powervs_machine());
    machine.spec.failure_domain = Some("dal10".to_string());
    powervs_machine.spec.network = Default::default();

    let (result, warnings) =
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster))
            .to_machine();

    assert!(result.is_err());
    assert_eq!(warnings.len(), 1);
}

/// Every reference in a successful conversion carries exactly one tag
#[test]
fn references_carry_a_single_tag() {
    let (machine, powervs_machine, cluster) = (machine(), powervs_machine(), powervs_cluster());
    let (result, _) =
        PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster))
            .to_machine();
    let mapi_machine = result.expect("conversion should succeed");

    let payload: serde_json::Value = serde_json::from_slice(
        &mapi_machine
            .spec
            .provider_spec
            .value
            .as_ref()
            .expect("payload should be attached")
            .raw,
    )
    .expect("payload should be JSON");

    for field in ["serviceInstance", "image", "network"] {
        let reference = payload[field]
            .as_object()
            .expect("reference should be an object");
        let set: Vec<_> = ["id", "name", "regex"]
            .into_iter()
            .filter(|key| reference.contains_key(*key))
            .collect();
        assert_eq!(set.len(), 1, "{field} should carry one tag, got {set:?}");
    }

    let config = provider_config(&mapi_machine);
    assert_eq!(
        config.service_instance.map(|r| r.resource_type()),
        Some(PowerVsResourceType::Id)
    );
}

// =============================================================================
// MachineSet conversion
// =============================================================================

/// Story: a worker pool converts and its template matches a single machine
#[test]
fn machine_set_template_matches_machine_conversion() {
    let (machine_set, template, cluster) = (machine_set(), machine_template(), powervs_cluster());
    let conversion =
        PowerVsMachineSetConversion::new(Some(&machine_set), Some(&template), Some(&cluster));

    let (result, warnings) = conversion.to_machine_set();
    let mapi_machine_set = result.expect("conversion should succeed");
    assert!(warnings.is_empty());

    let expected_labels = Some(BTreeMap::from([("tier".to_string(), "worker".to_string())]));
    assert_eq!(mapi_machine_set.spec.template.metadata.labels, expected_labels);
    assert!(mapi_machine_set.metadata.labels.is_none());
    assert_eq!(mapi_machine_set.spec.replicas, Some(3));

    let (machine_result, _) = conversion
        .machine()
        .expect("machine view should be synthesized")
        .to_machine();
    let mapi_machine = machine_result.expect("machine conversion should succeed");
    assert_eq!(mapi_machine.metadata.labels, expected_labels);
    assert_eq!(
        mapi_machine.metadata.annotations,
        mapi_machine_set.spec.template.metadata.annotations
    );
    assert_eq!(mapi_machine.spec, mapi_machine_set.spec.template.spec);
}

/// Story: clusterName alone never leaks a cluster label into the template
#[test]
fn cluster_name_does_not_add_template_labels() {
    let (machine_set, template, cluster) = (machine_set(), machine_template(), powervs_cluster());
    assert_eq!(machine_set.spec.cluster_name, "prod");
    assert_eq!(machine_set.spec.template.spec.cluster_name, "prod");

    let (result, _) =
        PowerVsMachineSetConversion::new(Some(&machine_set), Some(&template), Some(&cluster))
            .to_machine_set();
    let mapi_machine_set = result.expect("conversion should succeed");

    let labels = mapi_machine_set
        .spec
        .template
        .metadata
        .labels
        .expect("template labels should be copied");
    assert_eq!(
        labels,
        BTreeMap::from([("tier".to_string(), "worker".to_string())])
    );
    assert!(!labels.contains_key(MAPI_CLUSTER_NAME_LABEL));
}

/// Story: both the pool and its template have problems
#[test]
fn machine_set_surfaces_machine_and_set_errors() {
    let (cluster, mut machine_set, mut template) =
        (powervs_cluster(), machine_set(), machine_template());
    machine_set.spec.delete_policy = Some("Youngest".to_string());
    template.spec.template.spec.network = Default::default();

    let (result, _) =
        PowerVsMachineSetConversion::new(Some(&machine_set), Some(&template), Some(&cluster))
            .to_machine_set();

    let err = result.expect_err("conversion should fail");
    assert_eq!(field_paths(&err), vec!["spec.network", "spec.deletePolicy"]);
}

/// Story: the caller lost track of one of the set inputs
#[test]
fn each_missing_machine_set_input_fails_fast() {
    let (machine_set, template, cluster) = (machine_set(), machine_template(), powervs_cluster());
    let conversions = [
        PowerVsMachineSetConversion::new(None, Some(&template), Some(&cluster)),
        PowerVsMachineSetConversion::new(Some(&machine_set), None, Some(&cluster)),
        PowerVsMachineSetConversion::new(Some(&machine_set), Some(&template), None),
    ];

    for conversion in conversions {
        let (result, warnings) = conversion.to_machine_set();
        let err = result.expect_err("conversion should fail");
        assert!(err.is_precondition());
        assert_eq!(
            err.to_string(),
            ERR_MACHINE_SET_POWERVS_TEMPLATE_POWERVS_CLUSTER_NIL
        );
        assert!(warnings.is_empty());
    }
}
