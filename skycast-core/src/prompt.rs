//! Prompt construction for the generative-model backend.
//!
//! Each service sends a single natural-language instruction plus a
//! schema description. The instructions pin the exact sequence lengths
//! so validation can treat any deviation as a hard error.

use crate::model::{ForecastHorizon, HOURLY_WINDOW};

/// Instruction for a full weather snapshot with exactly `horizon.days()`
/// daily entries and [`HOURLY_WINDOW`] hourly entries.
pub fn weather(location: &str, horizon: ForecastHorizon) -> String {
    let days = horizon.days();
    format!(
        "You are a weather data service. Provide the current weather and forecast \
         for \"{location}\".\n\
         Respond with ONLY a single JSON object, no markdown fences and no commentary, \
         matching exactly this schema:\n\
         {{\n\
           \"location\": string (resolved display name),\n\
           \"date\": string (human-readable current date there),\n\
           \"current\": {{\n\
             \"temp\": number (°C),\n\
             \"condition\": string (e.g. \"Cloudy\"),\n\
             \"wind\": {{ \"speed\": number (km/h), \"direction\": string (compass), \"gust\": number (optional, km/h) }},\n\
             \"humidity\": number (0-100),\n\
             \"pressure\": number (hPa),\n\
             \"visibility\": number (km),\n\
             \"uvIndex\": {{ \"value\": number, \"description\": string }}\n\
           }},\n\
           \"hourly\": array of exactly {HOURLY_WINDOW} objects {{ \"time\": string, \"temp\": number, \"condition\": string }}, time ascending,\n\
           \"daily\": array of exactly {days} objects {{ \"day\": string, \"condition\": string, \"low\": number, \"high\": number }}, date ascending\n\
         }}\n\
         The \"daily\" array must contain exactly {days} entries. All numeric fields must be bare JSON numbers without units."
    )
}

/// Instruction for the active-alerts list of a location.
pub fn alerts(location: &str) -> String {
    format!(
        "You are a weather alert service. List the currently active weather alerts \
         for \"{location}\".\n\
         Respond with ONLY a single JSON object, no markdown fences and no commentary, \
         of the form:\n\
         {{ \"alerts\": [ {{ \"title\": string, \"description\": string, \
         \"severity\": one of \"Low\" | \"Moderate\" | \"High\" | \"Extreme\", \
         \"source\": string }} ] }}\n\
         If there are no active alerts, respond with {{ \"alerts\": [] }}."
    )
}

/// Free-form question grounded in a serialized weather snapshot.
pub fn conversation(question: &str, context_json: &str) -> String {
    format!(
        "You are a friendly weather assistant. Using only the weather data below, \
         answer the user's question in two or three plain sentences. Do not return JSON.\n\
         Weather data: {context_json}\n\
         Question: {question}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_prompt_pins_location_and_horizon() {
        let prompt = weather("Paris, France", ForecastHorizon::SevenDays);
        assert!(prompt.contains("Paris, France"));
        assert!(prompt.contains("exactly 7 entries"));
        assert!(prompt.contains("exactly 24 objects"));
    }

    #[test]
    fn alerts_prompt_enumerates_severities() {
        let prompt = alerts("Oslo");
        assert!(prompt.contains("Oslo"));
        for severity in ["Low", "Moderate", "High", "Extreme"] {
            assert!(prompt.contains(severity));
        }
    }

    #[test]
    fn conversation_prompt_embeds_context() {
        let prompt = conversation("Do I need an umbrella?", "{\"location\":\"Oslo\"}");
        assert!(prompt.contains("Do I need an umbrella?"));
        assert!(prompt.contains("{\"location\":\"Oslo\"}"));
    }
}
