use crate::workflow::definitions::{WorkflowKind, WORKFLOWS};

/// Returns the first workflow whose trigger phrase appears verbatim in `message`.
///
/// Case-sensitive substring match, no normalization, first match in table order wins.
/// Callers only consult this when the conversation has no workflow run yet.
pub fn detect(message: &str) -> Option<WorkflowKind> {
    WORKFLOWS
        .iter()
        .find(|def| message.contains(def.trigger))
        .map(|def| def.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_action_messages_select_their_workflow() {
        let cases = [
            ("🟩 Creating a Job Description", WorkflowKind::JobDescription),
            (
                "🎯 Creating an Interview Plan and Scorecard\n\nDevelop an interview plan",
                WorkflowKind::InterviewPlan,
            ),
            ("👶 Communicating a Parental Leave", WorkflowKind::ParentalLeave),
            ("🚀 Creating a New Hire Onboarding Plan", WorkflowKind::OnboardingPlan),
            (
                "📊 Creating a Performance Review Proposal",
                WorkflowKind::PerformanceReview,
            ),
        ];
        for (message, expected) in cases {
            assert_eq!(detect(message), Some(expected), "{message}");
        }
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(detect("creating a job description"), None);
    }

    #[test]
    fn test_plain_questions_do_not_trigger() {
        assert_eq!(detect("How much PTO should we offer?"), None);
    }

    #[test]
    fn test_first_match_in_table_order_wins() {
        let message = "Creating a Performance Review Proposal after Creating a Job Description";
        assert_eq!(detect(message), Some(WorkflowKind::JobDescription));
    }

    #[test]
    fn test_trigger_inside_quoted_text_still_matches() {
        let message = "My manager said \"Creating a New Hire Onboarding Plan\" takes ages";
        assert_eq!(detect(message), Some(WorkflowKind::OnboardingPlan));
    }
}
