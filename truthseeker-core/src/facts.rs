//! Canonical claims with known answers, shared by the offline matcher and the
//! result validator. Each consumer has its own ordering; order decides which
//! pattern wins when a query matches several.

use regex::Regex;

#[derive(Debug, Clone)]
pub struct KnownFact {
    pub pattern: Regex,
    pub is_true: bool,
    pub confidence: u8,
    pub reason: &'static str,
}

const DELHI: (&str, bool, u8, &str) = (
    r"delhi.*capital.*india|india.*capital.*delhi",
    true,
    95,
    "New Delhi is the capital of India - basic geographical fact.",
);
const EARTH_ROUND: (&str, bool, u8, &str) = (
    r"earth.*round|round.*earth|earth.*spherical",
    true,
    99,
    "Earth is round/spherical - established scientific fact proven by satellite imagery, physics, and space exploration.",
);
const EARTH_FLAT: (&str, bool, u8, &str) = (
    r"earth.*flat|flat.*earth",
    false,
    99,
    "Earth is NOT flat - this is a debunked conspiracy theory. Scientific evidence proves Earth is spherical.",
);
const SUN_EAST: (&str, bool, u8, &str) = (
    r"sun.*rises.*east|east.*sun.*rises",
    true,
    95,
    "Sun rises in the east - basic astronomical fact due to Earth's rotation.",
);
const WATER_BOILS: (&str, bool, u8, &str) = (
    r"water.*boils.*100|100.*water.*boils",
    true,
    90,
    "Water boils at 100°C at sea level - scientific fact.",
);
const VACCINES_AUTISM: (&str, bool, u8, &str) = (
    r"vaccines.*autism",
    false,
    99,
    "Vaccines do NOT cause autism - this has been thoroughly debunked by medical research.",
);
const FIVE_G_COVID: (&str, bool, u8, &str) = (
    r"5g.*covid|covid.*5g",
    false,
    99,
    "5G does NOT cause COVID-19 - this is a conspiracy theory with no scientific basis.",
);

fn compile(table: &[(&str, bool, u8, &'static str)]) -> Vec<KnownFact> {
    table
        .iter()
        .filter_map(|(pattern, is_true, confidence, reason)| {
            match Regex::new(&format!("(?i){}", pattern)) {
                Ok(pattern) => Some(KnownFact {
                    pattern,
                    is_true: *is_true,
                    confidence: *confidence,
                    reason: *reason,
                }),
                Err(e) => {
                    tracing::error!(pattern, error = %e, "Invalid known-fact pattern skipped");
                    None
                }
            }
        })
        .collect()
}

/// Order used by the offline matcher: positive geography/science first.
pub fn offline_table() -> Vec<KnownFact> {
    compile(&[
        DELHI,
        EARTH_ROUND,
        EARTH_FLAT,
        SUN_EAST,
        WATER_BOILS,
        VACCINES_AUTISM,
        FIVE_G_COVID,
    ])
}

/// Order used by the validator: known falsehoods take precedence.
pub fn correction_table() -> Vec<KnownFact> {
    compile(&[
        EARTH_FLAT,
        VACCINES_AUTISM,
        FIVE_G_COVID,
        EARTH_ROUND,
        DELHI,
        SUN_EAST,
        WATER_BOILS,
    ])
}

/// First fact in `table` whose pattern matches `query`.
pub fn find_match<'a>(table: &'a [KnownFact], query: &str) -> Option<&'a KnownFact> {
    let lower = query.to_lowercase();
    table.iter().find(|fact| fact.pattern.is_match(&lower))
}
