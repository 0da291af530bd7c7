use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::conversation::store::StoreError;
use crate::workflow::definitions::WorkflowKind;

/// Key under which the raw answer of the details turn is kept.
pub const USER_INPUT_DETAIL: &str = "user_input";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a conversation log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<WorkflowKind>,
    pub timestamp: DateTime<Utc>,
}

/// Position inside a workflow run. Only ever moves forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Initial,
    CollectingDetails,
    /// Terminal. Holds the generated document.
    Complete { document: String },
}

impl Step {
    fn rank(&self) -> u8 {
        match self {
            Step::Initial => 0,
            Step::CollectingDetails => 1,
            Step::Complete { .. } => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::Initial => "initial",
            Step::CollectingDetails => "collecting_details",
            Step::Complete { .. } => "complete",
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Step::Complete { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowRun {
    pub workflow: WorkflowKind,
    pub step: Step,
}

/// Per-conversation workflow state.
///
/// A conversation holds at most one run. The generated document only exists
/// inside `Step::Complete`, so a result can never be attached to the wrong
/// workflow or to an unfinished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub run: Option<WorkflowRun>,
    /// Free-form answers collected so far.
    pub details: BTreeMap<String, String>,
}

impl Context {
    pub fn workflow(&self) -> Option<WorkflowKind> {
        self.run.as_ref().map(|r| r.workflow)
    }

    /// `Initial` when no run has started.
    pub fn step(&self) -> &Step {
        self.run.as_ref().map(|r| &r.step).unwrap_or(&Step::Initial)
    }

    pub fn workflow_complete(&self) -> bool {
        self.step().is_complete()
    }

    pub fn document(&self) -> Option<&str> {
        match self.step() {
            Step::Complete { document } => Some(document),
            _ => None,
        }
    }

    /// Shallow-merges `update` into this context.
    ///
    /// The update is validated as a whole first; on error nothing changes.
    pub fn apply(&mut self, update: ContextUpdate) -> Result<(), StoreError> {
        let mut run = self.run.clone();

        if let Some(kind) = update.begin {
            if let Some(existing) = &run {
                return Err(StoreError::WorkflowActive(existing.workflow));
            }
            run = Some(WorkflowRun {
                workflow: kind,
                step: Step::Initial,
            });
        }

        if let Some(step) = update.step {
            let current = run.as_mut().ok_or(StoreError::NoActiveWorkflow)?;
            if current.step.is_complete() {
                return Err(StoreError::AlreadyComplete(current.workflow));
            }
            if step.rank() < current.step.rank() {
                return Err(StoreError::StepRegression {
                    from: current.step.name(),
                    to: step.name(),
                });
            }
            current.step = step;
        }

        self.run = run;
        self.details.extend(update.details);
        Ok(())
    }
}

impl Serialize for Context {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("workflow", &self.workflow())?;
        map.serialize_entry("step", self.step().name())?;
        map.serialize_entry("details", &self.details)?;
        map.serialize_entry("workflow_complete", &self.workflow_complete())?;
        if let (Some(kind), Some(document)) = (self.workflow(), self.document()) {
            map.serialize_entry(kind.result_field(), document)?;
        }
        map.end()
    }
}

/// Partial context fields for `ConversationStore::update_context`.
#[derive(Debug, Clone, Default)]
pub struct ContextUpdate {
    /// Starts a new run at `Step::Initial`.
    pub begin: Option<WorkflowKind>,
    pub step: Option<Step>,
    /// Merged key by key into the existing details.
    pub details: BTreeMap<String, String>,
}

impl ContextUpdate {
    pub fn begin(kind: WorkflowKind) -> Self {
        Self {
            begin: Some(kind),
            ..Default::default()
        }
    }

    pub fn step(step: Step) -> Self {
        Self {
            step: Some(step),
            ..Default::default()
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(document: &str) -> Step {
        Step::Complete {
            document: document.to_string(),
        }
    }

    #[test]
    fn test_default_context_is_idle() {
        let ctx = Context::default();
        assert_eq!(ctx.workflow(), None);
        assert_eq!(ctx.step(), &Step::Initial);
        assert!(!ctx.workflow_complete());
    }

    #[test]
    fn test_details_merge_without_loss() {
        let mut ctx = Context::default();
        ctx.apply(ContextUpdate::default().with_detail("a", "1")).unwrap();
        ctx.apply(ContextUpdate::default().with_detail("b", "2")).unwrap();
        assert_eq!(ctx.details.get("a").map(String::as_str), Some("1"));
        assert_eq!(ctx.details.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_step_cannot_regress() {
        let mut ctx = Context::default();
        ctx.apply(ContextUpdate::begin(WorkflowKind::InterviewPlan)).unwrap();
        ctx.apply(ContextUpdate::step(Step::CollectingDetails)).unwrap();

        let err = ctx.apply(ContextUpdate::step(Step::Initial)).unwrap_err();
        assert!(matches!(err, StoreError::StepRegression { .. }));
        assert_eq!(ctx.step(), &Step::CollectingDetails);
    }

    #[test]
    fn test_complete_is_reached_once() {
        let mut ctx = Context::default();
        ctx.apply(ContextUpdate::begin(WorkflowKind::OnboardingPlan)).unwrap();
        ctx.apply(ContextUpdate::step(complete("first"))).unwrap();

        let err = ctx.apply(ContextUpdate::step(complete("second"))).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyComplete(WorkflowKind::OnboardingPlan)));
        assert_eq!(ctx.document(), Some("first"));
    }

    #[test]
    fn test_second_run_is_rejected() {
        let mut ctx = Context::default();
        ctx.apply(ContextUpdate::begin(WorkflowKind::ParentalLeave)).unwrap();
        let err = ctx
            .apply(ContextUpdate::begin(WorkflowKind::JobDescription))
            .unwrap_err();
        assert!(matches!(err, StoreError::WorkflowActive(WorkflowKind::ParentalLeave)));
    }

    #[test]
    fn test_rejected_update_changes_nothing() {
        let mut ctx = Context::default();
        let update = ContextUpdate::step(Step::CollectingDetails).with_detail("user_input", "x");
        assert!(matches!(ctx.apply(update), Err(StoreError::NoActiveWorkflow)));
        assert!(ctx.details.is_empty());
    }

    #[test]
    fn test_serialized_document_uses_workflow_field() {
        let mut ctx = Context::default();
        ctx.apply(ContextUpdate::begin(WorkflowKind::ParentalLeave)).unwrap();
        ctx.apply(ContextUpdate::step(complete("Dear Sam"))).unwrap();

        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["workflow"], "parental-leave");
        assert_eq!(json["step"], "complete");
        assert_eq!(json["workflow_complete"], true);
        assert_eq!(json["parental_leave_email"], "Dear Sam");
        assert!(json.get("job_description").is_none());
    }
}
