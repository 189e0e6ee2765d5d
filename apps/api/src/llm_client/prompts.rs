// Cross-cutting prompt fragments shared by every oracle call.
// Stage-specific templates live in scan/prompts.rs.

/// System prompt sent with every oracle call. Enforces JSON-only output, though callers
/// still recover the object from surrounding prose because the model does not always comply.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
