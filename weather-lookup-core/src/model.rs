/// One current-conditions reading, built fresh for every lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    /// Title-cased description, e.g. "Clear Sky".
    pub condition: String,
    pub icon_code: String,
}

impl WeatherReading {
    /// Multi-line text shown in the result area.
    pub fn display_text(&self) -> String {
        format!(
            "📍 {}, {}\n🌡 Temperature: {}°C\n💧 Humidity: {}%\n☁ Condition: {}",
            self.city, self.country, self.temperature_c, self.humidity_pct, self.condition
        )
    }
}

/// Uppercase the first letter of every run of letters, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;

    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }

    out
}
