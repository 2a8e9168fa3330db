// Shared prompt fragments. Each service that calls the LLM defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System instruction for any call whose reply is shown verbatim to students.
pub const PLAIN_PROSE_SYSTEM: &str = "You write short, friendly guidance for students \
    looking for internships. Reply in plain prose only. \
    Do NOT use markdown, bullet points or headings. \
    Do NOT invent facts about the organization that are not in the prompt.";
