//! Content fingerprints for pricing inputs and outcome batches.
//!
//! Canonical JSON (sorted map keys via `BTreeMap`, fixed field order via
//! derive) hashed with BLAKE3. Two runs over the same inputs produce the
//! same fingerprint, which is how stored salaries are reused and how repeat
//! scoring runs are compared.

use serde::Serialize;

use crate::domain::{Bout, Competitor, EventId, Fingerprint, Outcome};
use crate::rules::PricingRules;

#[derive(Serialize)]
struct PricingInputs<'a> {
    event_id: &'a EventId,
    bouts: &'a [Bout],
    competitors: &'a [Competitor],
    rules: &'a PricingRules,
}

fn fingerprint_of<T: Serialize>(value: &T) -> Fingerprint {
    // Plain data with string map keys; serialization cannot fail.
    let bytes = serde_json::to_vec(value).unwrap_or_default();
    Fingerprint::from_bytes(&bytes)
}

/// Identity of everything that feeds salary generation for an event.
pub fn pricing_fingerprint(
    event_id: &EventId,
    bouts: &[Bout],
    competitors: &[Competitor],
    rules: &PricingRules,
) -> Fingerprint {
    fingerprint_of(&PricingInputs {
        event_id,
        bouts,
        competitors,
        rules,
    })
}

/// Identity of an outcome batch, independent of record order.
pub fn outcomes_fingerprint(outcomes: &[Outcome]) -> Fingerprint {
    let mut sorted: Vec<&Outcome> = outcomes.iter().collect();
    sorted.sort_by(|a, b| a.bout_id.cmp(&b.bout_id));
    fingerprint_of(&sorted)
}
