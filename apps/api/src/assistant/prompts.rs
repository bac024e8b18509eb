// All LLM prompt constants for the assistant module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume extraction. JSON-only output.
pub const PARSE_SYSTEM: &str = "You are a professional resume parser. \
    Extract resume information into the JSON Resume structure. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Target shape shared by the free-text and document parsers.
const RESUME_SCHEMA: &str = r#"{
  "basics": {
    "name": "", "label": "", "email": "", "phone": "", "url": "", "summary": "",
    "location": { "city": "", "region": "", "countryCode": "" },
    "profiles": [{ "network": "", "username": "", "url": "" }]
  },
  "work": [{ "name": "", "position": "", "url": "", "startDate": "", "endDate": "", "summary": "", "highlights": [] }],
  "education": [{ "institution": "", "area": "", "studyType": "", "startDate": "", "endDate": "", "score": "", "courses": [] }],
  "skills": [{ "name": "Category", "level": "", "keywords": [] }],
  "projects": [{ "name": "", "description": "", "highlights": [], "url": "" }],
  "certifications": [{ "name": "", "issuer": "", "date": "", "url": "" }]
}"#;

/// Free-text parsing prompt. Replace `{schema}` and `{text}` before sending.
const PARSE_TEXT_PROMPT_TEMPLATE: &str = r#"Extract resume information from the following text and return it as a JSON object with this structure:
{schema}

Use these exact camelCase field names. Omit sections the text does not mention.
{no_invention}

Text to parse:
{text}"#;

/// Document parsing prompt. Sent alongside the image or PDF block.
const PARSE_DOCUMENT_PROMPT_TEMPLATE: &str = r#"Extract the information from the attached resume and return it as a JSON object with this structure:
{schema}

Format dates as YYYY-MM when present. Group skills into logical categories.
{no_invention}"#;

pub fn parse_text_prompt(text: &str) -> String {
    PARSE_TEXT_PROMPT_TEMPLATE
        .replace("{schema}", RESUME_SCHEMA)
        .replace("{no_invention}", crate::llm_client::prompts::NO_INVENTION_INSTRUCTION)
        .replace("{text}", text)
}

pub fn parse_document_prompt() -> String {
    PARSE_DOCUMENT_PROMPT_TEMPLATE
        .replace("{schema}", RESUME_SCHEMA)
        .replace("{no_invention}", crate::llm_client::prompts::NO_INVENTION_INSTRUCTION)
}

/// Replace `{text}`.
pub const REWRITE_SUMMARY_TEMPLATE: &str = "Rewrite the following professional summary to be \
    more impactful, concise, and ATS-friendly. Keep it under 4 sentences.\n\nText: \"{text}\"";

/// Replace `{text}`.
pub const REWRITE_BULLET_TEMPLATE: &str = "Rewrite the following resume bullet point using the \
    STAR method (Situation, Task, Action, Result) where possible, with strong action verbs. \
    Keep it concise.\n\nText: \"{text}\"";

/// Replace `{keywords}` and `{text}`.
pub const FIX_SUMMARY_TEMPLATE: &str = "Rewrite the following professional summary so that it \
    naturally includes these missing keywords and skills: {keywords}.\n\
    Do not just list them; weave them into the narrative. Keep it professional and under 5 \
    sentences.\n\nOriginal text: \"{text}\"";

/// System prompt for the ATS comparison.
pub const JOB_MATCH_SYSTEM: &str = "You are an expert ATS (Applicant Tracking System) scanner. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object.";

/// Replace `{resume}` and `{job_description}`.
pub const JOB_MATCH_PROMPT_TEMPLATE: &str = r#"Compare the following resume data against the job description.

1. Calculate a match score (0-100) based on skills and relevance.
2. Identify critical keywords or skills from the job description that are MISSING from the resume.
3. Provide 3 specific, actionable suggestions to improve the resume for this job.

Resume data:
{resume}

Job description:
{job_description}

Return JSON with this EXACT schema:
{
  "score": 0,
  "missingKeywords": ["string"],
  "suggestions": ["string", "string", "string"]
}"#;

/// System prompt for persona generation.
pub const VARIANTS_SYSTEM: &str = "You are a career strategist. \
    You MUST respond with a valid JSON array only. \
    Do NOT include any text outside the JSON array.";

/// Replace `{resume}`.
pub const VARIANTS_PROMPT_TEMPLATE: &str = r#"Based on this resume data, create 3 distinct personas for A/B testing job applications.

1. "specialist": focus deeply on technical hard skills and specific tools.
2. "leader": focus on collaboration, project management and impact.
3. "generalist": a balanced approach for smaller companies or cross-functional roles.

For EACH persona write:
- "label": a professional title matching the persona
- "summary": a 2-3 sentence professional summary
- "skills": skills reordered and prioritised for the persona (about 10 keywords)

Return ONLY a JSON array of exactly 3 objects:
[
  { "type": "specialist", "label": "...", "summary": "...", "skills": [{ "name": "Core Skills", "keywords": ["..."] }] },
  { "type": "leader", "label": "...", "summary": "...", "skills": [] },
  { "type": "generalist", "label": "...", "summary": "...", "skills": [] }
]

Resume data:
{resume}"#;
