//! Cluster size precondition gate

use deployflow_core::{StageConfig, StageContext, StageDefinition, StageType};
use serde_json::json;

pub const PRECONDITION_STAGE_NAME: &str = "Check Deploy Preconditions";

const CLUSTER_SIZE: &str = "clusterSize";

/// Stage failing the deploy when the cluster already has more enabled
/// server groups than `max_initial_count`
pub fn build_precondition_gate(config: &StageConfig) -> StageDefinition {
    let precondition = json!({
        "type": CLUSTER_SIZE,
        "preconditionType": CLUSTER_SIZE,
        "context": {
            "onlyEnabledServerGroups": true,
            "comparison": "<=",
            "expected": config.max_initial_count,
            "regions": [config.region],
            "cluster": config.cluster,
            "application": config.application,
            "credentials": config.credentials,
            "moniker": config.moniker,
        },
    });

    let mut context = StageContext::new();
    context.insert("preconditions".to_string(), json!([precondition]));

    StageDefinition::new(PRECONDITION_STAGE_NAME, StageType::CheckPreconditions, context)
}
