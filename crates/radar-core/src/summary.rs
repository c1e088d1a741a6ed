//! Human-readable restroom descriptions.
//!
//! [`summarize`] is the local formatter used by the fast search path and as
//! the fallback for the enriched path. [`DescriptionGenerator`] is the seam for
//! an external text-generation service; [`enrich_summaries`] aligns whatever
//! it returns with the input records and falls back on failure.

use std::future::Future;

use crate::model::RestroomRecord;

/// Filler for positions the text-generation service left unanswered.
pub const GENERATED_FILLER: &str = "Clean restroom facilities available.";

/// External source of richer restroom descriptions.
///
/// Implementations return one description per input record, in input order.
/// A short or failed response is tolerated by [`enrich_summaries`].
pub trait DescriptionGenerator: Send + Sync {
    type Error: std::fmt::Display + Send;

    fn generate_descriptions(
        &self,
        records: &[RestroomRecord],
    ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send;
}

/// Describe a restroom in one or two sentences.
///
/// For example `"Multi User restroom in Goodell on Floor 2 with 4 stalls,
/// shower available. Near the elevator."`.
#[must_use]
pub fn summarize(record: &RestroomRecord) -> String {
    let kind = title_case(&record.restroom_type.as_str().replace('-', " "));
    if kind.trim().is_empty() {
        return fallback_summary(&record.building_name);
    }

    let mut summary = format!("{kind} restroom in {}", record.building_name);

    if let Some(floor) = non_blank(record.floor_or_area.as_deref()) {
        summary.push_str(" on ");
        summary.push_str(floor.trim());
    }

    let mut features: Vec<String> = Vec::new();
    if let Some(stalls) = record.multi_user_stalls.filter(|n| *n > 0) {
        features.push(format!("{stalls} stalls"));
    }
    if record.has_shower {
        features.push("shower available".to_string());
    }
    if record.staff_only {
        features.push("staff access only".to_string());
    }
    if !features.is_empty() {
        summary.push_str(" with ");
        summary.push_str(&features.join(", "));
    }
    summary.push('.');

    if let Some(notes) = non_blank(record.notes.as_deref()) {
        summary.push(' ');
        summary.push_str(notes.trim());
    }

    summary
}

/// Generic sentence used when a record cannot be described in detail.
#[must_use]
pub fn fallback_summary(building_name: &str) -> String {
    let building = if building_name.trim().is_empty() {
        "Building"
    } else {
        building_name
    };
    format!("Restroom facilities available in {building}.")
}

/// Descriptions for `records` from `generator`, one per record.
///
/// Never fails: with no generator, or when the generator errors, every record
/// gets the local [`summarize`] text. Extra generated lines are dropped,
/// missing ones become [`GENERATED_FILLER`], and blank ones are replaced by the
/// local text for that record.
pub async fn enrich_summaries<G>(generator: Option<&G>, records: &[RestroomRecord]) -> Vec<String>
where
    G: DescriptionGenerator,
{
    if records.is_empty() {
        return Vec::new();
    }

    let Some(generator) = generator else {
        return records.iter().map(summarize).collect();
    };

    match generator.generate_descriptions(records).await {
        Ok(generated) => align_descriptions(generated, records),
        Err(e) => {
            tracing::warn!(
                error = %e,
                records = records.len(),
                "description generation failed; using local summaries"
            );
            records.iter().map(summarize).collect()
        }
    }
}

fn align_descriptions(generated: Vec<String>, records: &[RestroomRecord]) -> Vec<String> {
    if generated.len() < records.len() {
        tracing::debug!(
            expected = records.len(),
            got = generated.len(),
            "padding short generated description batch"
        );
    }

    let mut generated = generated.into_iter();
    records
        .iter()
        .map(|record| match generated.next() {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            Some(_) => summarize(record),
            None => GENERATED_FILLER.to_string(),
        })
        .collect()
}

/// Capitalize the first letter of each word and lowercase the rest.
///
/// A word starts after any non-alphabetic character, so `"ada/family"`
/// becomes `"Ada/Family"`.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
