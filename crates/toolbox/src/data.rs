//! Data retrieval and calculation tools.

use runtime::tools::{Arguments, Tool, ToolError, parse_arguments};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::calc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Units {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Reports current weather for a location. Placeholder readings.
#[derive(Debug, Default)]
pub struct FetchWeather;

impl Tool for FetchWeather {
    fn name(&self) -> &str {
        "fetch_weather"
    }

    fn description(&self) -> &str {
        "Fetch current weather information for a specific location. Use this when \
         the user asks about weather conditions or temperature."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "City name or location (e.g. \"San Francisco\" or \"New York, NY\")"
                },
                "units": {
                    "type": "string",
                    "enum": ["celsius", "fahrenheit"],
                    "description": "Temperature units (default: celsius)"
                }
            },
            "required": ["location"]
        })
    }

    fn invoke(&self, arguments: &Arguments) -> Result<Value, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            location: String,
            #[serde(default)]
            units: Units,
        }

        let params: Params = parse_arguments(arguments)?;
        info!(location = %params.location, units = ?params.units, "Tool called: fetch_weather");

        let temperature = match params.units {
            Units::Celsius => "22°C",
            Units::Fahrenheit => "72°F",
        };
        Ok(Value::String(format!(
            "Weather in {}: Sunny, {temperature}, humidity 65%, wind 10 km/h",
            params.location
        )))
    }
}

/// Evaluates arithmetic expressions.
///
/// Evaluation failures are reported in the returned text rather than as a
/// tool error, so the model sees what went wrong with its expression.
#[derive(Debug, Default)]
pub struct CalculateMath;

impl Tool for CalculateMath {
    fn name(&self) -> &str {
        "calculate_math"
    }

    fn description(&self) -> &str {
        "Calculate mathematical expressions and return the result. Supports + - * / \
         // % **, parentheses, and the functions abs, round, min, max and sqrt."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "expression": {
                    "type": "string",
                    "description": "Expression to evaluate (e.g. \"2 + 2\", \"sqrt(16)\", \"10 * 5\")"
                }
            },
            "required": ["expression"]
        })
    }

    fn invoke(&self, arguments: &Arguments) -> Result<Value, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            expression: String,
        }

        let params: Params = parse_arguments(arguments)?;
        info!(expression = %params.expression, "Tool called: calculate_math");

        let text = match calc::evaluate(&params.expression) {
            Ok(value) => format!("Result: {}", calc::format_number(value)),
            Err(e) => {
                warn!(expression = %params.expression, error = %e, "Math calculation failed");
                format!("Error calculating '{}': {e}", params.expression)
            }
        };
        Ok(Value::String(text))
    }
}
