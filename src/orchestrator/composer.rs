//! Response composition.
//!
//! # Responsibilities
//! - Merge the fan-out outcomes into one text answer
//! - Translate internal failure markers into user-facing language
//!
//! # Design Decisions
//! - The single point where failures become words; raw reasons (HTTP
//!   status, timeout, open circuit) never reach the user
//! - A circuit-open rejection and exhausted retries read the same to the
//!   user; they stay distinguishable in logs and metrics
//! - A successful but empty attraction list adds nothing rather than an
//!   apology; the service worked, the area is just quiet

use crate::providers::weather::WeatherReading;
use crate::resilience::retry::CallFailure;

/// Fixed answer when geocoding finds no such place.
pub const PLACE_NOT_FOUND: &str = "I don't think this place exists.";

/// Fixed answer when nothing could be retrieved.
pub const ALL_FAILED: &str = "Sorry, I couldn't retrieve weather or places right now.";

const WEATHER_APOLOGY: &str = "Sorry, the weather service is temporarily unavailable.";
const PLACES_APOLOGY: &str = "Sorry, attraction suggestions are temporarily unavailable.";

/// Compose the final answer from the per-side outcomes.
///
/// `None` marks a side the intent never requested. Successful sections
/// come first, apologies for failed sides after; if no section made it,
/// the single combined failure message is returned.
pub fn compose(
    destination: &str,
    weather: Option<Result<WeatherReading, CallFailure>>,
    places: Option<Result<Vec<String>, CallFailure>>,
) -> String {
    let mut sections: Vec<String> = Vec::new();
    let mut apologies: Vec<&'static str> = Vec::new();

    match weather {
        Some(Ok(reading)) => {
            sections.push(format!(
                "Weather in {destination}: {}.",
                weather_sentence(&reading)
            ));
        }
        Some(Err(_)) => apologies.push(WEATHER_APOLOGY),
        None => {}
    }

    match places {
        Some(Ok(names)) if !names.is_empty() => {
            let list: Vec<String> = names.iter().map(|n| format!("- {n}")).collect();
            sections.push(format!(
                "Top attractions near {destination}:\n{}",
                list.join("\n")
            ));
        }
        Some(Ok(_)) => {}
        Some(Err(_)) => apologies.push(PLACES_APOLOGY),
        None => {}
    }

    if sections.is_empty() {
        return ALL_FAILED.to_string();
    }

    sections.extend(apologies.iter().map(|a| a.to_string()));
    sections.join("\n\n")
}

fn weather_sentence(reading: &WeatherReading) -> String {
    let chance = reading
        .precipitation_chance
        .map(|p| format!("{p}%"))
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "{}°C with a chance of {chance} to rain",
        reading.temperature_c.round() as i64
    )
}
