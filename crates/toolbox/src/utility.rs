//! Time and currency utilities.

use chrono::{DateTime, Utc};
use runtime::tools::{Arguments, Tool, ToolError, parse_arguments};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

/// Reports the current date and time.
///
/// The clock is always read in UTC; the requested zone name is echoed back.
#[derive(Debug, Default)]
pub struct GetCurrentTime;

impl GetCurrentTime {
    fn render(timezone_name: &str, now: DateTime<Utc>) -> String {
        format!(
            "Current time in {timezone_name}: {}",
            now.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}

impl Tool for GetCurrentTime {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time in a specified timezone. Use this when the \
         user asks about the current time or date."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "timezone_name": {
                    "type": "string",
                    "description": "Timezone name (e.g. \"UTC\", \"America/New_York\"; default: UTC)"
                }
            }
        })
    }

    fn invoke(&self, arguments: &Arguments) -> Result<Value, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            timezone_name: Option<String>,
        }

        let params: Params = parse_arguments(arguments)?;
        let timezone_name = params.timezone_name.as_deref().unwrap_or("UTC");
        info!(timezone_name, "Tool called: get_current_time");

        Ok(Value::String(Self::render(timezone_name, Utc::now())))
    }
}

/// Placeholder exchange rates keyed by upper-case currency codes.
const EXCHANGE_RATES: &[(&str, &str, f64)] = &[
    ("USD", "EUR", 0.92),
    ("USD", "GBP", 0.79),
    ("EUR", "USD", 1.09),
    ("GBP", "USD", 1.27),
];

fn exchange_rate(from: &str, to: &str) -> Option<f64> {
    let (from, to) = (from.to_uppercase(), to.to_uppercase());
    EXCHANGE_RATES
        .iter()
        .find(|(f, t, _)| *f == from && *t == to)
        .map(|(_, _, rate)| *rate)
}

/// Converts an amount between currencies using a fixed rate table.
#[derive(Debug, Default)]
pub struct ConvertCurrency;

impl Tool for ConvertCurrency {
    fn name(&self) -> &str {
        "convert_currency"
    }

    fn description(&self) -> &str {
        "Convert an amount from one currency to another using current exchange rates."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "amount": {
                    "type": "number",
                    "description": "The monetary amount to convert"
                },
                "from_currency": {
                    "type": "string",
                    "description": "Source currency code (e.g. \"USD\", \"EUR\", \"GBP\")"
                },
                "to_currency": {
                    "type": "string",
                    "description": "Target currency code (e.g. \"USD\", \"EUR\", \"GBP\")"
                }
            },
            "required": ["amount", "from_currency", "to_currency"]
        })
    }

    fn invoke(&self, arguments: &Arguments) -> Result<Value, ToolError> {
        #[derive(Deserialize)]
        struct Params {
            amount: f64,
            from_currency: String,
            to_currency: String,
        }

        let Params {
            amount,
            from_currency: from,
            to_currency: to,
        } = parse_arguments(arguments)?;
        info!(amount, %from, %to, "Tool called: convert_currency");

        let text = match exchange_rate(&from, &to) {
            Some(rate) => format!("{amount:.2} {from} = {:.2} {to}", amount * rate),
            None => format!(
                "Exchange rate not available for {from} to {to} (placeholder implementation)"
            ),
        };
        Ok(Value::String(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn time_is_rendered_in_utc() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            GetCurrentTime::render("Europe/London", now),
            "Current time in Europe/London: 2024-03-09 14:05:07 UTC"
        );
    }

    #[test]
    fn time_defaults_to_utc_label() {
        let output = GetCurrentTime.invoke(&Arguments::new()).unwrap();
        assert!(output.as_str().unwrap().starts_with("Current time in UTC: "));
        assert!(output.as_str().unwrap().ends_with(" UTC"));
    }

    #[test]
    fn converts_known_pairs() {
        let output = ConvertCurrency
            .invoke(&args(json!({
                "amount": 100,
                "from_currency": "USD",
                "to_currency": "EUR"
            })))
            .unwrap();
        assert_eq!(output, "100.00 USD = 92.00 EUR");

        let output = ConvertCurrency
            .invoke(&args(json!({
                "amount": 10.5,
                "from_currency": "gbp",
                "to_currency": "usd"
            })))
            .unwrap();
        assert_eq!(output, "10.50 gbp = 13.34 usd");
    }

    #[test]
    fn unknown_pair_is_reported() {
        let output = ConvertCurrency
            .invoke(&args(json!({
                "amount": 5,
                "from_currency": "JPY",
                "to_currency": "EUR"
            })))
            .unwrap();
        assert_eq!(
            output,
            "Exchange rate not available for JPY to EUR (placeholder implementation)"
        );
    }

    #[test]
    fn missing_amount_is_invalid() {
        let err = ConvertCurrency
            .invoke(&args(json!({"from_currency": "USD", "to_currency": "EUR"})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
