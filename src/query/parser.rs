//! Intent and destination extraction from free text.
//!
//! # Responsibilities
//! - Classify a query as weather, places, or both
//! - Pull a destination out of phrasings like "I'm going to Bangalore"
//!   or "Weather in Paris", tolerating punctuation ("Bangalore!")
//!
//! # Design Decisions
//! - Keyword heuristics, not NLP; ambiguous queries default to Both
//! - Destination patterns are tried in a fixed order, first match wins
//! - Fallback destination is the whole normalized query, so a bare city
//!   name ("Tokyo") still resolves

use std::sync::OnceLock;

use regex::Regex;

/// What the user wants to know about the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Weather,
    Places,
    Both,
}

/// Parsed form of a free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Normalized (lowercased, punctuation-stripped) destination phrase.
    pub destination: String,
    pub intent: Intent,
}

const WEATHER_KEYWORDS: &[&str] = &["weather", "forecast", "temperature", "rain", "umbrella"];
const PLACES_KEYWORDS: &[&str] = &[
    "places",
    "attractions",
    "sights",
    "things to do",
    "poi",
    "tourist",
];

fn destination_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"going to\s+([a-z\-\s]+)",
            r"go to\s+([a-z\-\s]+)",
            r"travel to\s+([a-z\-\s]+)",
            r"visit\s+([a-z\-\s]+)",
            r"in\s+([a-z\-\s]+)",
            r"at\s+([a-z\-\s]+)",
            r"to\s+([a-z\-\s]+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
    })
}

fn normalizer() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z\s\-]").expect("static pattern"))
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static pattern"))
}

/// Parse a free-text travel query.
pub fn parse_query(input: &str) -> ParsedQuery {
    let normalized = normalizer().replace_all(input.trim(), " ").to_lowercase();

    let has_weather = WEATHER_KEYWORDS.iter().any(|k| normalized.contains(k));
    let has_places = PLACES_KEYWORDS.iter().any(|k| normalized.contains(k));
    let intent = match (has_weather, has_places) {
        (true, false) => Intent::Weather,
        (false, true) => Intent::Places,
        _ => Intent::Both,
    };

    let destination = destination_patterns()
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(&normalized)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().to_string())
        })
        .unwrap_or_else(|| normalized.clone());
    let destination = whitespace()
        .replace_all(destination.trim(), " ")
        .to_string();

    ParsedQuery {
        destination,
        intent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_intent_with_in_pattern() {
        let parsed = parse_query("Weather in Paris");
        assert_eq!(parsed.intent, Intent::Weather);
        assert_eq!(parsed.destination, "paris");
    }

    #[test]
    fn going_to_defaults_to_both() {
        let parsed = parse_query("I'm going to Bangalore");
        assert_eq!(parsed.intent, Intent::Both);
        assert_eq!(parsed.destination, "bangalore");
    }

    #[test]
    fn places_intent() {
        let parsed = parse_query("tourist attractions near london");
        assert_eq!(parsed.intent, Intent::Places);
    }

    #[test]
    fn strips_punctuation() {
        let parsed = parse_query("Bangalore!");
        assert_eq!(parsed.destination, "bangalore");
        assert_eq!(parsed.intent, Intent::Both);
    }

    #[test]
    fn bare_city_falls_back_to_full_text() {
        let parsed = parse_query("Tokyo");
        assert_eq!(parsed.destination, "tokyo");
    }

    #[test]
    fn both_keyword_sets_mean_both() {
        let parsed = parse_query("weather and tourist places in rome");
        assert_eq!(parsed.intent, Intent::Both);
    }

    #[test]
    fn collapses_internal_whitespace() {
        let parsed = parse_query("travel to   new   york");
        assert_eq!(parsed.destination, "new york");
    }
}
