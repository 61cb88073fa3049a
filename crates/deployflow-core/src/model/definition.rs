//! Step and stage definitions produced by composers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped context payload attached to a stage definition
///
/// Interpreted only by the execution engine.
pub type StageContext = Map<String, Value>;

/// Task an additional step runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskRef {
    /// Record the source server group's capacity so it can be restored later
    CaptureSourceServerGroupCapacity,
}

impl std::fmt::Display for TaskRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskRef::CaptureSourceServerGroupCapacity => {
                write!(f, "captureSourceServerGroupCapacity")
            }
        }
    }
}

/// Stage builder a nested stage definition refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageType {
    /// Evaluates a list of preconditions and fails the pipeline when one does not hold
    CheckPreconditions,
    /// Pins or unpins a server group's minimum capacity, depending on context flags
    PinServerGroup,
    /// Restores the capacity captured by [`TaskRef::CaptureSourceServerGroupCapacity`]
    ApplySourceServerGroupCapacity,
}

impl std::fmt::Display for StageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageType::CheckPreconditions => write!(f, "checkPreconditions"),
            StageType::PinServerGroup => write!(f, "pinServerGroup"),
            StageType::ApplySourceServerGroupCapacity => {
                write!(f, "applySourceServerGroupCapacity")
            }
        }
    }
}

/// An additional step to run as part of the deploy stage itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub name: String,
    pub task: TaskRef,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, task: TaskRef) -> Self {
        Self {
            name: name.into(),
            task,
        }
    }
}

/// A nested stage to run before, after, or on failure of the deploy stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDefinition {
    pub name: String,

    #[serde(rename = "type")]
    pub stage_type: StageType,

    #[serde(default)]
    pub context: StageContext,
}

impl StageDefinition {
    pub fn new(name: impl Into<String>, stage_type: StageType, context: StageContext) -> Self {
        Self {
            name: name.into(),
            stage_type,
            context,
        }
    }

    /// Stage with an empty context
    pub fn bare(name: impl Into<String>, stage_type: StageType) -> Self {
        Self::new(name, stage_type, StageContext::new())
    }

    /// Get a context value as a specific type
    pub fn get_context<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.context
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stage_definition_serialization() {
        let mut context = StageContext::new();
        context.insert("pinMinimumCapacity".to_string(), json!(true));
        let stage = StageDefinition::new("Pin app-v002", StageType::PinServerGroup, context);

        let value = serde_json::to_value(&stage).unwrap();
        assert_eq!(value["name"], "Pin app-v002");
        assert_eq!(value["type"], "pinServerGroup");
        assert_eq!(value["context"]["pinMinimumCapacity"], true);
    }

    #[test]
    fn test_get_context() {
        let mut context = StageContext::new();
        context.insert("stageTimeoutMs".to_string(), json!(1_200_000));
        let stage = StageDefinition::new("Unpin", StageType::PinServerGroup, context);

        assert_eq!(stage.get_context::<u64>("stageTimeoutMs"), Some(1_200_000));
        assert_eq!(stage.get_context::<u64>("missing"), None);
        assert_eq!(stage.get_context::<String>("stageTimeoutMs"), None);
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(
            TaskRef::CaptureSourceServerGroupCapacity.to_string(),
            serde_json::to_value(TaskRef::CaptureSourceServerGroupCapacity).unwrap()
        );
        for stage_type in [
            StageType::CheckPreconditions,
            StageType::PinServerGroup,
            StageType::ApplySourceServerGroupCapacity,
        ] {
            assert_eq!(
                stage_type.to_string(),
                serde_json::to_value(stage_type).unwrap()
            );
        }
    }
}
