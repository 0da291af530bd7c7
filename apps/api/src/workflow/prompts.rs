// All fixed replies and LLM prompt templates for the workflow engine.
// System prompts are sent at the focused temperature; fill the placeholders of
// WORKFLOW_USER_PROMPT_TEMPLATE before sending.

// ────────────────────────────────────────────────────────────────────────────
// Instructional replies (first turn of each workflow, no LLM call)
// ────────────────────────────────────────────────────────────────────────────

pub const JOB_DESCRIPTION_INSTRUCTIONS: &str = r#"Great, let's create a comprehensive, legally compliant job description.

Please tell me:
- The job title and department
- Your company name, mission and culture
- Seniority level and whether the role manages people
- Location (or remote) and the salary range you have in mind
- Any must-have skills, certifications or requirements

I'll draft the job description with these sections:
**Company Overview**
**Role Overview**
**Responsibilities**
**Required Experience**
**Leadership Requirements** (if applicable)
**Compensation** (with pay-transparency language for CA, CO and NY)"#;

pub const INTERVIEW_PLAN_INSTRUCTIONS: &str = r#"Let's build an interview plan and scorecard you can share through your ATS.

Please tell me:
- The job title and the key competencies you are hiring for
- Who is on the interview panel and their roles
- How many interview rounds you plan to run

I'll draft the plan with these sections:
**Interview Schedule & Responsibilities**
**STAR Interview Questions**
**Legal Compliance Tips**
**Rating System**"#;

pub const PARENTAL_LEAVE_INSTRUCTIONS: &str = r#"Let's draft a parental leave communication for your employee.

Please tell me:
- The employee's name, role and work state
- Expected leave start date and planned duration
- Your company's parental leave and pay-supplement policy
- The HR point of contact for questions

I'll draft the email with these sections:
**Disability Leave**
**Compensation and Benefits**
**Paperwork Instructions**
**Privacy**
**Check-in Points**"#;

pub const ONBOARDING_PLAN_INSTRUCTIONS: &str = r#"Let's put together a new hire onboarding plan.

Please tell me:
- The new hire's role, team and start date
- Their manager and any key stakeholders
- Tools, systems or training they will need

I'll draft the plan with these sections:
**Standing Meetings**
**Introductory Meetings**
**Key Contacts**
**Goal Setting (30/60/90 days)**
**Feedback and Check-ins**"#;

pub const PERFORMANCE_REVIEW_INSTRUCTIONS: &str = r#"Let's design a performance review proposal.

Please tell me:
- Company size, structure and industry
- How performance is reviewed today, if at all
- Preferred review cadence (quarterly, bi-annual, yearly)
- Any goals for the program, such as promotions, compensation or development

I'll draft the proposal with these sections:
**Goals for the Program**
**Feedback Measurement**
**Training Requirements**
**Feedback Gathering**
**Data Utilization and Storage**"#;

// ────────────────────────────────────────────────────────────────────────────
// System prompts (second turn, sent to the LLM)
// ────────────────────────────────────────────────────────────────────────────

pub const JOB_DESCRIPTION_SYSTEM: &str = r#"You are an expert HR consultant creating a comprehensive, inclusive and legally compliant job description.

Structure the document with EXACTLY these sections, in this order, each as a bold heading:
**Company Overview** — briefly introduce the company, its mission, values and culture.
**Role Overview** — a compelling summary of the position and what makes it unique.
**Responsibilities** — 5-8 core duties of the role.
**Required Experience** — ranked qualifications, education and certifications.
**Leadership Requirements** — only if the role manages people; otherwise state "Not applicable".
**Compensation** — a salary range placeholder noting that actual pay depends on location and experience, plus disclaimer language for CA, CO and NY pay-transparency statutes.

Use gender-neutral language. Do not invent details the user did not provide; use bracketed placeholders instead."#;

pub const INTERVIEW_PLAN_SYSTEM: &str = r#"You are an expert HR consultant creating a structured interview plan and scorecard to be shared through an applicant tracking system.

Structure the document with EXACTLY these sections, each as a bold heading:
**Interview Schedule & Responsibilities** — the interview sequence and what each interviewer owns.
**STAR Interview Questions** — Situation, Task, Action, Result questions for each interviewer's focus area.
**Legal Compliance Tips** — how to keep the process lawful, capture notes and deliver feedback.
**Rating System** — a rating scale for each question.

Do not invent details the user did not provide; use bracketed placeholders instead."#;

pub const PARENTAL_LEAVE_SYSTEM: &str = r#"You are an expert HR consultant drafting a warm, clear email that explains the parental leave process and timeline for a birthing parent.

Structure the email with EXACTLY these sections, each as a bold heading:
**Disability Leave** — state and company disability leave entitlements.
**Compensation and Benefits** — how pay and benefits are handled while away, including gaps and reductions.
**Paperwork Instructions** — how to submit approved state paperwork so the company can supplement state pay, and for how long.
**Privacy** — what the employee must send versus keep confidential, and where it is stored and shared.
**Check-in Points** — when and how check-ins happen, and the point of contact.

Do not invent details the user did not provide; use bracketed placeholders instead."#;

pub const ONBOARDING_PLAN_SYSTEM: &str = r#"You are an expert HR consultant writing a new hire onboarding plan with instructions for the hiring manager.

Structure the plan with EXACTLY these sections, each as a bold heading:
**Standing Meetings** — recurring meetings to schedule.
**Introductory Meetings** — which introductions to arrange and when.
**Key Contacts** — people to know, with placeholders for links to information and templates.
**Goal Setting** — clear goals for the first 30, 60 and 90 days.
**Feedback and Check-ins** — how and when HR checks in with the manager and employee during the first 90 days, and how that data is stored and shared.

Do not invent details the user did not provide; use bracketed placeholders instead."#;

pub const PERFORMANCE_REVIEW_SYSTEM: &str = r#"You are an expert HR consultant writing a proposal for a performance review program.

Structure the proposal with EXACTLY these sections, each as a bold heading:
**Goals for the Program** — objectives, what is measured (competencies, values, job descriptions) and the review frequency.
**Feedback Measurement** — a timeline template for self, manager and peer assessments, with optional calibration.
**Training Requirements** — training leads and materials needed for rollout.
**Feedback Gathering** — how to collect input from influential people about the program and how it shapes deployment.
**Data Utilization and Storage** — how data is stored and used for promotion, compensation, development and improvement plans.

Do not invent details the user did not provide; use bracketed placeholders instead."#;

/// User prompt for the generation call. Replace `{title}`, `{sections}` and `{details}`.
pub const WORKFLOW_USER_PROMPT_TEMPLATE: &str = r#"Create the {title} using the details below.

REQUIRED SECTIONS, IN ORDER:
{sections}

DETAILS PROVIDED BY THE USER:
{details}"#;

// ────────────────────────────────────────────────────────────────────────────
// Fixed replies
// ────────────────────────────────────────────────────────────────────────────

pub const MORE_DETAILS_PROMPT: &str = "Could you please provide more details? To write a strong job description \
    I need at least the job title, the team or department, the seniority level, \
    the location and any key requirements or salary range you have in mind.";

/// Prefix of every generation failure reply.
pub const APOLOGY_PREFIX: &str = "I apologize, but I encountered an error";

pub const GENERAL_CHAT_FALLBACK: &str = "I'm sorry, I couldn't process that request right now. \
    Please try again in a moment.";

/// Reply used when an unexpected failure escapes the engine.
pub const HELP_FALLBACK: &str = "I'm here to help with your HR questions. \
    Something went wrong while processing that message. Please try again, \
    or pick one of the guided workflows to get started.";

/// Generation failure reply for the given document title.
pub fn apology(title: &str) -> String {
    format!("{APOLOGY_PREFIX} while generating your {title}. Please try sending your details again.")
}

/// Wraps a freshly generated document for the completion reply.
pub fn completion_reply(title: &str, document: &str) -> String {
    format!(
        "Here is your {title}:\n\n---\n\n{document}\n\n---\n\n\
         Review it carefully and adapt any bracketed placeholders before sharing. \
         Sending another message in this conversation will show this document again."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apology_has_fixed_prefix() {
        assert!(apology("job description").starts_with(APOLOGY_PREFIX));
    }

    #[test]
    fn test_completion_reply_delimits_document() {
        let reply = completion_reply("onboarding plan", "DOC");
        assert!(reply.contains("---\n\nDOC\n\n---"));
    }
}
