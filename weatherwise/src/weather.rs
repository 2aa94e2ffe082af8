//! Mocked current-weather lookup exposed to the model as a function.
//!
//! ```rust
//! use weatherwise::weather::current_weather;
//!
//! let report = current_weather("Tokyo", None);
//! assert_eq!(report.temperature, "10");
//! assert_eq!(report.unit.as_str(), "celsius");
//! ```

use serde_json::json;
use wtooling::{FunctionTable, ToolArguments, ToolError, optional_string, required_string};

pub const WEATHER_TOOL_NAME: &str = "get_current_weather";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ToolError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "celsius" => Ok(Self::Celsius),
            "fahrenheit" => Ok(Self::Fahrenheit),
            other => Err(ToolError::invalid_arguments(format!(
                "unit must be 'celsius' or 'fahrenheit', got '{other}'"
            ))),
        }
    }

    fn convert(self, degrees: i32, to: Self) -> i32 {
        match (self, to) {
            (Self::Celsius, Self::Fahrenheit) => (degrees * 9 + 160) / 5,
            (Self::Fahrenheit, Self::Celsius) => ((degrees - 32) * 5) / 9,
            _ => degrees,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    pub location: String,
    pub temperature: String,
    pub unit: TemperatureUnit,
}

impl WeatherReport {
    pub fn to_json(&self) -> String {
        json!({
            "location": self.location,
            "temperature": self.temperature,
            "unit": self.unit.as_str(),
        })
        .to_string()
    }
}

fn known_reading(location: &str) -> Option<(&'static str, i32, TemperatureUnit)> {
    let location = location.to_ascii_lowercase();
    if location.contains("tokyo") {
        Some(("Tokyo", 10, TemperatureUnit::Celsius))
    } else if location.contains("san francisco") {
        Some(("San Francisco", 72, TemperatureUnit::Fahrenheit))
    } else if location.contains("paris") {
        Some(("Paris", 22, TemperatureUnit::Celsius))
    } else {
        None
    }
}

/// Fixed readings for Tokyo, San Francisco and Paris; anything else is
/// reported with an `"unknown"` temperature.
pub fn current_weather(location: &str, unit: Option<TemperatureUnit>) -> WeatherReport {
    match known_reading(location) {
        Some((city, degrees, native)) => {
            let unit = unit.unwrap_or(native);
            WeatherReport {
                location: city.to_string(),
                temperature: native.convert(degrees, unit).to_string(),
                unit,
            }
        }
        None => WeatherReport {
            location: location.to_string(),
            temperature: "unknown".to_string(),
            unit: unit.unwrap_or(TemperatureUnit::Celsius),
        },
    }
}

/// Function-table entry point: reads `location` and the optional `unit`.
pub fn get_current_weather(args: ToolArguments) -> Result<String, ToolError> {
    let location = required_string(&args, "location")?;
    let unit = optional_string(&args, "unit")?
        .map(|unit| TemperatureUnit::parse(&unit))
        .transpose()?;

    Ok(current_weather(&location, unit).to_json())
}

pub fn function_table() -> FunctionTable {
    FunctionTable::new().with_sync_fn(WEATHER_TOOL_NAME, get_current_weather)
}
