//! Batched prompt construction and line-per-record response parsing.

use std::fmt::Write as _;
use std::sync::LazyLock;

use radar_core::RestroomRecord;
use regex::Regex;

const PROMPT_HEADER: &str =
    "Generate brief, friendly descriptions for these restroom locations (1 sentence each):\n\n";
const PROMPT_FOOTER: &str = "\nFormat: Just return numbered descriptions, one per line.";

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*[.)]\s*").expect("valid regex"));

/// One prompt asking for a numbered description per record.
///
/// ```text
/// 1. Goodell - Floor 2 (multi-user) - 4 stalls - with shower
/// ```
#[must_use]
pub fn build_prompt(records: &[RestroomRecord]) -> String {
    let mut prompt = String::from(PROMPT_HEADER);
    for (i, record) in records.iter().enumerate() {
        let _ = write!(prompt, "{}. {}", i + 1, record.building_name);
        if let Some(floor) = record.floor_or_area.as_deref().map(str::trim) {
            if !floor.is_empty() {
                let _ = write!(prompt, " - {floor}");
            }
        }
        let _ = write!(prompt, " ({})", record.restroom_type);
        if let Some(stalls) = record.multi_user_stalls.filter(|n| *n > 0) {
            let _ = write!(prompt, " - {stalls} stalls");
        }
        if record.has_shower {
            prompt.push_str(" - with shower");
        }
        prompt.push('\n');
    }
    prompt.push_str(PROMPT_FOOTER);
    prompt
}

/// Split a completion into descriptions, one per non-blank line.
///
/// Leading `N.` or `N)` numbering is removed. Positional alignment with the
/// input records is left to the caller.
#[must_use]
pub fn parse_descriptions(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| LEADING_NUMBER_RE.replace(line, "").trim().to_string())
        .collect()
}
