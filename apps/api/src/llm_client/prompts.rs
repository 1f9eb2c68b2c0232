// Shared prompt fragments for every JSON-producing completion call.
// Feature-specific prompts live next to the feature (see generation::prompts).

/// System instruction that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are an assistant that returns valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
