/// A built-in template: title, category, content.
pub struct TemplateSeed {
    pub title: &'static str,
    pub category: &'static str,
    pub content: &'static str,
}

pub const DEFAULT_TEMPLATES: [TemplateSeed; 3] = [
    TemplateSeed {
        title: "Offer Letter",
        category: "hiring",
        content: "Subject: Offer of Employment\n\nDear [Candidate Name],\n\n\
            We are pleased to offer you the position of [Job Title] at [Company Name]. \
            Please find attached the terms and conditions of your employment.\n\n\
            Sincerely,\n[Your Name]\n[Company Name]",
    },
    TemplateSeed {
        title: "Onboarding Checklist",
        category: "onboarding",
        content: "- Welcome email sent\n- Employee handbook provided\n\
            - Payroll information collected\n- Equipment assigned\n\
            - First-day orientation scheduled",
    },
    TemplateSeed {
        title: "Termination Letter",
        category: "termination",
        content: "Subject: Notice of Termination\n\nDear [Employee Name],\n\n\
            We regret to inform you that your employment with [Company Name] will end \
            effective [Date]. Please contact HR for next steps.\n\n\
            Sincerely,\n[Your Name]\n[Company Name]",
    },
];
