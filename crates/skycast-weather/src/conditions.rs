//! WMO weather code translation.

use serde::{Deserialize, Serialize};

/// Weather condition buckets mapped from WMO codes.
/// See: https://open-meteo.com/en/docs#weathervariables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    MostlyClear,
    Fog,
    Drizzle,
    FreezingDrizzle,
    Rain,
    FreezingRain,
    Snow,
    SnowGrains,
    Showers,
    SnowShowers,
    Thunderstorm,
    ThunderstormHail,
    #[default]
    Unknown,
}

impl WeatherCondition {
    /// Convert a WMO weather code. Codes outside the table map to
    /// `Unknown` rather than failing.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Clear,
            1..=3 => Self::MostlyClear,
            45 | 48 => Self::Fog,
            51 | 53 | 55 => Self::Drizzle,
            56 | 57 => Self::FreezingDrizzle,
            61 | 63 | 65 => Self::Rain,
            66 | 67 => Self::FreezingRain,
            71 | 73 | 75 => Self::Snow,
            77 => Self::SnowGrains,
            80 | 81 | 82 => Self::Showers,
            85 | 86 => Self::SnowShowers,
            95 => Self::Thunderstorm,
            96 | 99 => Self::ThunderstormHail,
            _ => Self::Unknown,
        }
    }

    /// Short human-readable condition label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::MostlyClear => "Mostly clear",
            Self::Fog => "Fog",
            Self::Drizzle => "Drizzle",
            Self::FreezingDrizzle => "Freezing drizzle",
            Self::Rain => "Rain",
            Self::FreezingRain => "Freezing rain",
            Self::Snow => "Snow",
            Self::SnowGrains => "Snow grains",
            Self::Showers => "Rain showers",
            Self::SnowShowers => "Snow showers",
            Self::Thunderstorm => "Thunderstorm",
            Self::ThunderstormHail => "Thunderstorm with hail",
            Self::Unknown => "Unknown",
        }
    }

    /// Icon category for the rendering layer.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Clear => "sun",
            Self::MostlyClear => "cloud_sun",
            Self::Fog => "cloud_fog",
            Self::Drizzle | Self::FreezingDrizzle | Self::Rain | Self::FreezingRain
            | Self::Showers => "cloud_rain",
            Self::Snow | Self::SnowGrains | Self::SnowShowers => "cloud_snow",
            Self::Thunderstorm | Self::ThunderstormHail => "cloud_lightning",
            Self::Unknown => "cloud",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_clear() {
        assert_eq!(WeatherCondition::from_code(0), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::from_code(0).label(), "Clear");
    }

    #[test]
    fn test_code_mostly_clear_bucket() {
        for code in [1, 2, 3] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::MostlyClear);
        }
    }

    #[test]
    fn test_code_fog() {
        assert_eq!(WeatherCondition::from_code(45), WeatherCondition::Fog);
        assert_eq!(WeatherCondition::from_code(48), WeatherCondition::Fog);
    }

    #[test]
    fn test_code_drizzle_family() {
        for code in [51, 53, 55] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Drizzle);
        }
        assert_eq!(WeatherCondition::from_code(56), WeatherCondition::FreezingDrizzle);
        assert_eq!(WeatherCondition::from_code(57), WeatherCondition::FreezingDrizzle);
    }

    #[test]
    fn test_code_rain_family() {
        for code in [61, 63, 65] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Rain);
        }
        for code in [66, 67] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::FreezingRain);
        }
        for code in [80, 81, 82] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Showers);
        }
    }

    #[test]
    fn test_code_snow_family() {
        for code in [71, 73, 75] {
            assert_eq!(WeatherCondition::from_code(code), WeatherCondition::Snow);
        }
        assert_eq!(WeatherCondition::from_code(77), WeatherCondition::SnowGrains);
        assert_eq!(WeatherCondition::from_code(85), WeatherCondition::SnowShowers);
        assert_eq!(WeatherCondition::from_code(86), WeatherCondition::SnowShowers);
    }

    #[test]
    fn test_code_thunderstorm_family() {
        assert_eq!(WeatherCondition::from_code(95), WeatherCondition::Thunderstorm);
        assert_eq!(WeatherCondition::from_code(96), WeatherCondition::ThunderstormHail);
        assert_eq!(WeatherCondition::from_code(99), WeatherCondition::ThunderstormHail);
        assert!(WeatherCondition::from_code(95).label().contains("Thunderstorm"));
        assert!(WeatherCondition::from_code(99).label().contains("Thunderstorm"));
    }

    #[test]
    fn test_unknown_code_never_fails() {
        assert_eq!(WeatherCondition::from_code(9999), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_code(-1), WeatherCondition::Unknown);
        assert_eq!(WeatherCondition::from_code(9999).label(), "Unknown");
    }

    #[test]
    fn test_icon_categories() {
        assert_eq!(WeatherCondition::Clear.icon(), "sun");
        assert_eq!(WeatherCondition::Rain.icon(), "cloud_rain");
        assert_eq!(WeatherCondition::Thunderstorm.icon(), "cloud_lightning");
    }
}
