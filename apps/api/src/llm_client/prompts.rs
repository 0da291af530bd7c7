// Cross-cutting prompt fragments.
// Workflow-specific prompts live in workflow::prompts.

/// System prompt for open-ended chat when no workflow is active.
pub const GENERAL_HR_SYSTEM: &str = "You are an expert HR consultant helping with human resources tasks. \
    Give practical, accurate and legally aware guidance for small and mid-sized companies. \
    Be concise, use clear headings or bullet points when they help, \
    and recommend consulting employment counsel for jurisdiction-specific legal questions.";

/// Header placed in front of uploaded-document text inside a system prompt.
pub const FILE_CONTEXT_HEADER: &str = "The user has uploaded the following company documents. \
    Use them as reference material where relevant:";

/// Appends uploaded-document text to a system prompt. Blank context leaves the prompt unchanged.
pub fn with_file_context(system: &str, file_context: Option<&str>) -> String {
    match file_context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!("{system}\n\n{FILE_CONTEXT_HEADER}\n\n{context}"),
        None => system.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_context_is_ignored() {
        assert_eq!(with_file_context("base", None), "base");
        assert_eq!(with_file_context("base", Some("   \n")), "base");
    }

    #[test]
    fn test_context_is_appended_after_header() {
        let prompt = with_file_context("base", Some("--- handbook.pdf ---\nPTO: 20 days\n"));
        assert!(prompt.starts_with("base\n\n"));
        assert!(prompt.contains(FILE_CONTEXT_HEADER));
        assert!(prompt.ends_with("PTO: 20 days"));
    }
}
