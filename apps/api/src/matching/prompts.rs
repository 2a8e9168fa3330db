// Prompt constants for per-posting explanations.
// Reuses the plain-prose system fragment from llm_client::prompts.

/// Explanation prompt template. Replace every `{placeholder}` before sending.
pub const EXPLANATION_PROMPT_TEMPLATE: &str = r#"Create a concise explanation (2-3 sentences) for why this internship would be a good fit for a student.

Internship: {title} at {organization}
Sector: {sector}
Description: {description}
Required Skills: {required_skills}

Student Profile:
- Skills: {skills}
- Interests: {interests}
- Education: {education}

Focus on:
1. Why this matches the student's profile
2. How it could benefit their career development
3. What they might gain from this experience

Keep the response friendly and encouraging. Write in a natural, conversational tone."#;

/// Shown in the prompt for any profile field the student left blank.
pub const NOT_SPECIFIED: &str = "Not specified";
