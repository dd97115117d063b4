//! Maps the provider's broad condition groups onto the small set of
//! categories that have dedicated local artwork.

/// A condition group with a local background/icon asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
}

impl ConditionCategory {
    /// Path of the bundled PNG for this category.
    pub fn asset_path(self) -> &'static str {
        match self {
            ConditionCategory::Clear => "icons/clear.png",
            ConditionCategory::Clouds => "icons/clouds.png",
            ConditionCategory::Rain => "icons/rain.png",
            ConditionCategory::Drizzle => "icons/drizzle.png",
            ConditionCategory::Thunderstorm => "icons/thunder.png",
            ConditionCategory::Snow => "icons/snow.png",
            ConditionCategory::Mist => "icons/mist.png",
        }
    }
}

/// Case-insensitive exact match of a provider condition group ("Clear",
/// "Rain", ...) to a local category. "haze" and "fog" share the mist
/// artwork. Anything unrecognized is `None`: callers fall back to the
/// remote icon and set no local background.
pub fn categorize(condition_main: &str) -> Option<ConditionCategory> {
    match condition_main.to_lowercase().as_str() {
        "clear" => Some(ConditionCategory::Clear),
        "clouds" => Some(ConditionCategory::Clouds),
        "rain" => Some(ConditionCategory::Rain),
        "drizzle" => Some(ConditionCategory::Drizzle),
        "thunderstorm" => Some(ConditionCategory::Thunderstorm),
        "snow" => Some(ConditionCategory::Snow),
        "mist" | "haze" | "fog" => Some(ConditionCategory::Mist),
        _ => None,
    }
}

/// URL of the provider-hosted icon image for an icon code, at the fixed
/// 2x display resolution.
pub fn remote_icon_url(icon_code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{icon_code}@2x.png")
}
