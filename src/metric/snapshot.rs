use serde_json::{Map, Value};

/// Ordered metric name/value pairs collected for a single logging tick.
///
/// Keys keep their insertion order, both in memory and once serialized to
/// the JSON log file.
pub type MetricSnapshot = Map<String, Value>;

/// Names of the snapshot entries the hook writes itself.
pub mod keys {
    /// Run mode (`train`, `val` or `test`).
    pub const MODE: &str = "mode";
    /// Current epoch.
    pub const EPOCH: &str = "epoch";
    /// Current iteration.
    pub const ITER: &str = "iter";
    /// Learning rate(s).
    pub const LR: &str = "lr";
    /// Estimated remaining wall-clock time.
    pub const ETA: &str = "eta";
    /// Duration of one iteration, in seconds.
    pub const ITER_TIME: &str = "iter_time";
    /// Time spent loading data for one iteration, in seconds.
    pub const DATA_LOAD_TIME: &str = "data_load_time";
    /// Peak accelerator memory, in megabytes.
    pub const MEMORY: &str = "memory";
}

/// Deep copy of a JSON value with every float rounded to `ndigits` decimal
/// places, including floats nested inside arrays and objects. Non-float
/// values are returned unchanged.
pub fn round_floats(value: &Value, ndigits: i32) -> Value {
    match value {
        Value::Number(num) => match num.as_f64().filter(|_| num.is_f64()) {
            Some(float) => {
                let factor = 10f64.powi(ndigits);
                let rounded = (float * factor).round() / factor;
                serde_json::Number::from_f64(rounded)
                    .map(Value::Number)
                    .unwrap_or_else(|| value.clone())
            }
            None => value.clone(),
        },
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| round_floats(item, ndigits))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(name, item)| (name.clone(), round_floats(item, ndigits)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Render a snapshot value the way the text line shows it: floats to 4
/// decimal places, strings bare, anything else in its default JSON form.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Number(num) if num.is_f64() => {
            format!("{:.4}", num.as_f64().unwrap_or_default())
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rounds_floats_recursively() {
        let value = json!({
            "loss": 0.123456789,
            "iter": 100,
            "lr": {"backbone": 0.000012345678},
            "history": [1.000001234, 2.0, 3],
        });

        let rounded = round_floats(&value, 5);

        assert_eq!(
            rounded,
            json!({
                "loss": 0.12346,
                "iter": 100,
                "lr": {"backbone": 0.00001},
                "history": [1.0, 2.0, 3],
            })
        );
    }

    #[test]
    fn rounding_preserves_key_order() {
        let value = json!({"b": 1.23456789, "a": 2, "c": "text"});

        let rounded = round_floats(&value, 5);
        let keys: Vec<&String> = rounded.as_object().unwrap().keys().collect();

        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn displays_floats_with_four_decimals() {
        assert_eq!(display_value(&json!(0.123456)), "0.1235");
        assert_eq!(display_value(&json!(2.0)), "2.0000");
    }

    #[test]
    fn displays_non_floats_unchanged() {
        assert_eq!(display_value(&json!(42)), "42");
        assert_eq!(display_value(&json!("train")), "train");
        assert_eq!(display_value(&json!(true)), "true");
    }
}
