// Shared prompt constants.
// Each assistant operation defines its own prompts in assistant/prompts.rs.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for operations that return plain prose.
pub const PLAIN_TEXT_SYSTEM: &str = "You are an expert resume writer. \
    Respond with the requested text only. \
    Do NOT add quotes, headings, explanations or markdown formatting.";

/// Never invent facts the candidate did not provide.
pub const NO_INVENTION_INSTRUCTION: &str = "\
    Only use facts present in the input. Do NOT invent employers, dates, \
    degrees, metrics or technologies. Omit anything the input does not support.";
