//! The five built-in document workflows. Compiled in, never user-created.
//!
//! Table order matters: trigger detection is first-match-wins in `WORKFLOWS` order.

use serde::{Deserialize, Serialize};

use crate::workflow::prompts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowKind {
    JobDescription,
    InterviewPlan,
    ParentalLeave,
    OnboardingPlan,
    PerformanceReview,
}

impl WorkflowKind {
    pub fn key(self) -> &'static str {
        match self {
            WorkflowKind::JobDescription => "job-description",
            WorkflowKind::InterviewPlan => "interview-plan",
            WorkflowKind::ParentalLeave => "parental-leave",
            WorkflowKind::OnboardingPlan => "onboarding-plan",
            WorkflowKind::PerformanceReview => "performance-review",
        }
    }

    /// Context field under which the finished document is exposed.
    pub fn result_field(self) -> &'static str {
        match self {
            WorkflowKind::JobDescription => "job_description",
            WorkflowKind::InterviewPlan => "interview_plan",
            WorkflowKind::ParentalLeave => "parental_leave_email",
            WorkflowKind::OnboardingPlan => "onboarding_plan",
            WorkflowKind::PerformanceReview => "performance_review_proposal",
        }
    }

    pub fn definition(self) -> &'static WorkflowDefinition {
        match self {
            WorkflowKind::JobDescription => &WORKFLOWS[0],
            WorkflowKind::InterviewPlan => &WORKFLOWS[1],
            WorkflowKind::ParentalLeave => &WORKFLOWS[2],
            WorkflowKind::OnboardingPlan => &WORKFLOWS[3],
            WorkflowKind::PerformanceReview => &WORKFLOWS[4],
        }
    }
}

impl std::fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug)]
pub struct WorkflowDefinition {
    pub kind: WorkflowKind,
    /// Literal, case-sensitive substring that starts this workflow.
    pub trigger: &'static str,
    /// Human-readable document name used in replies ("job description").
    pub title: &'static str,
    /// Named sections the generated document must contain, in order.
    pub sections: &'static [&'static str],
    /// Fixed reply for the first turn.
    pub instructions: &'static str,
    pub system_prompt: &'static str,
    pub max_tokens: u32,
    /// Details must be strictly longer than this many characters before generating.
    pub min_detail_chars: Option<usize>,
}

pub static WORKFLOWS: [WorkflowDefinition; 5] = [
    WorkflowDefinition {
        kind: WorkflowKind::JobDescription,
        trigger: "Creating a Job Description",
        title: "job description",
        sections: &[
            "Company Overview",
            "Role Overview",
            "Responsibilities",
            "Required Experience",
            "Leadership Requirements",
            "Compensation",
        ],
        instructions: JOB_DESCRIPTION_INSTRUCTIONS,
        system_prompt: JOB_DESCRIPTION_SYSTEM,
        max_tokens: 1500,
        min_detail_chars: Some(50),
    },
    WorkflowDefinition {
        kind: WorkflowKind::InterviewPlan,
        trigger: "Creating an Interview Plan",
        title: "interview plan and scorecard",
        sections: &[
            "Interview Schedule & Responsibilities",
            "STAR Interview Questions",
            "Legal Compliance Tips",
            "Rating System",
        ],
        instructions: INTERVIEW_PLAN_INSTRUCTIONS,
        system_prompt: INTERVIEW_PLAN_SYSTEM,
        max_tokens: 2000,
        min_detail_chars: None,
    },
    WorkflowDefinition {
        kind: WorkflowKind::ParentalLeave,
        trigger: "Communicating a Parental Leave",
        title: "parental leave email",
        sections: &[
            "Disability Leave",
            "Compensation and Benefits",
            "Paperwork Instructions",
            "Privacy",
            "Check-in Points",
        ],
        instructions: PARENTAL_LEAVE_INSTRUCTIONS,
        system_prompt: PARENTAL_LEAVE_SYSTEM,
        max_tokens: 1200,
        min_detail_chars: None,
    },
    WorkflowDefinition {
        kind: WorkflowKind::OnboardingPlan,
        trigger: "Creating a New Hire Onboarding Plan",
        title: "onboarding plan",
        sections: &[
            "Standing Meetings",
            "Introductory Meetings",
            "Key Contacts",
            "Goal Setting",
            "Feedback and Check-ins",
        ],
        instructions: ONBOARDING_PLAN_INSTRUCTIONS,
        system_prompt: ONBOARDING_PLAN_SYSTEM,
        max_tokens: 1800,
        min_detail_chars: None,
    },
    WorkflowDefinition {
        kind: WorkflowKind::PerformanceReview,
        trigger: "Creating a Performance Review Proposal",
        title: "performance review proposal",
        sections: &[
            "Goals for the Program",
            "Feedback Measurement",
            "Training Requirements",
            "Feedback Gathering",
            "Data Utilization and Storage",
        ],
        instructions: PERFORMANCE_REVIEW_INSTRUCTIONS,
        system_prompt: PERFORMANCE_REVIEW_SYSTEM,
        max_tokens: 2000,
        min_detail_chars: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_lookup_matches_kind() {
        for def in &WORKFLOWS {
            assert_eq!(def.kind.definition().kind, def.kind);
        }
    }

    #[test]
    fn test_instructions_and_system_prompts_list_every_section() {
        for def in &WORKFLOWS {
            for section in def.sections {
                assert!(
                    def.instructions.contains(section),
                    "{} instructions missing {section}",
                    def.kind
                );
                assert!(
                    def.system_prompt.contains(section),
                    "{} system prompt missing {section}",
                    def.kind
                );
            }
        }
    }

    #[test]
    fn test_token_budgets_exceed_general_chat() {
        for def in &WORKFLOWS {
            assert!((1200..=2000).contains(&def.max_tokens));
        }
    }

    #[test]
    fn test_kind_serializes_as_key() {
        let json = serde_json::to_string(&WorkflowKind::PerformanceReview).unwrap();
        assert_eq!(json, "\"performance-review\"");
    }
}
