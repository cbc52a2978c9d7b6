//! Pulling JSON out of model replies
//!
//! Models wrap JSON in markdown fences, prepend prose, and leave trailing
//! commas or raw newlines inside strings. These helpers find the payload and
//! apply a small set of repairs before giving up.

use regex::Regex;
use serde::de::DeserializeOwned;
use std::sync::LazyLock;

static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma regex"));

/// Returns the most likely JSON payload inside `content`.
///
/// Preference order: a ```` ```json ```` fence, any ```` ``` ```` fence, then the
/// span from the first `{`/`[` to the last matching closer.
pub fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();

    if let Some(start_idx) = trimmed.find("```json") {
        let after_fence = &trimmed[start_idx + 7..];
        if let Some(end_idx) = after_fence.find("```") {
            return after_fence[..end_idx].trim();
        }
    }

    if let Some(start_idx) = trimmed.find("```") {
        let after_fence = &trimmed[start_idx + 3..];
        if let Some(end_idx) = after_fence.find("```") {
            return after_fence[..end_idx].trim();
        }
    }

    let open = match (trimmed.find('{'), trimmed.find('[')) {
        (Some(o), Some(a)) => Some(o.min(a)),
        (o, a) => o.or(a),
    };

    if let Some(start) = open {
        let closer = if trimmed.as_bytes()[start] == b'{' { '}' } else { ']' };
        if let Some(end) = trimmed.rfind(closer) {
            if end > start {
                return &trimmed[start..=end];
            }
        }
    }

    trimmed
}

/// Flattens line breaks and drops trailing commas before `}` / `]`.
pub fn repair_json(candidate: &str) -> String {
    let flattened = candidate.replace(['\r', '\n'], " ");
    TRAILING_COMMA.replace_all(&flattened, "$1").into_owned()
}

/// Parses a model reply into `T`, repairing common defects on the way.
///
/// The error from the unrepaired attempt is returned when both attempts fail,
/// since it points at the original text.
pub fn parse_lenient<T: DeserializeOwned>(content: &str) -> Result<T, serde_json::Error> {
    let candidate = extract_json(content);
    match serde_json::from_str(candidate) {
        Ok(value) => Ok(value),
        Err(first) => serde_json::from_str(&repair_json(candidate)).map_err(|_| first),
    }
}
