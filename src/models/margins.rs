use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// A theoretical margin applied from a path step onwards
///
/// Written as `none`, `5%` or `3.5min/100km`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MarginValue {
    #[default]
    None,
    Percentage(f64),
    MinPer100Km(f64),
}

impl FromStr for MarginValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "none" {
            return Ok(Self::None);
        }

        if let Some(value) = s.strip_suffix('%') {
            let value: f64 = value
                .parse()
                .map_err(|e| format!("Invalid percentage margin '{s}': {e}"))?;
            if value < 0.0 {
                return Err(format!("Margin '{s}' must not be negative"));
            }
            return Ok(Self::Percentage(value));
        }

        if let Some(value) = s.strip_suffix("min/100km") {
            let value: f64 = value
                .parse()
                .map_err(|e| format!("Invalid time margin '{s}': {e}"))?;
            if value < 0.0 {
                return Err(format!("Margin '{s}' must not be negative"));
            }
            return Ok(Self::MinPer100Km(value));
        }

        Err(format!("Unknown margin format '{s}'"))
    }
}

impl fmt::Display for MarginValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Percentage(value) => write!(f, "{value}%"),
            Self::MinPer100Km(value) => write!(f, "{value}min/100km"),
        }
    }
}

impl Serialize for MarginValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MarginValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Margins of a train schedule
///
/// `values[0]` applies from the origin up to `boundaries[0]`, and `values[k + 1]`
/// applies from `boundaries[k]` onwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    #[serde(default)]
    pub boundaries: Vec<String>,
    #[serde(default = "default_margin_values")]
    pub values: Vec<MarginValue>,
}

fn default_margin_values() -> Vec<MarginValue> {
    vec![MarginValue::None]
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            boundaries: Vec::new(),
            values: default_margin_values(),
        }
    }
}

impl Margins {
    /// Margin starting at the path step at `index` out of `path_len` steps
    ///
    /// The origin gets the first value, a boundary step gets the value that
    /// follows it, and the destination never starts a margin.
    #[must_use]
    pub fn margin_starting_at(&self, step_id: &str, index: usize, path_len: usize) -> Option<MarginValue> {
        if index + 1 >= path_len {
            return None;
        }
        if index == 0 {
            return self.values.first().copied();
        }
        self.boundaries
            .iter()
            .position(|boundary| boundary == step_id)
            .and_then(|k| self.values.get(k + 1).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_margin_values() {
        assert_eq!("none".parse::<MarginValue>(), Ok(MarginValue::None));
        assert_eq!("5%".parse::<MarginValue>(), Ok(MarginValue::Percentage(5.0)));
        assert_eq!("3.5min/100km".parse::<MarginValue>(), Ok(MarginValue::MinPer100Km(3.5)));
    }

    #[test]
    fn test_parse_margin_invalid() {
        assert!("".parse::<MarginValue>().is_err());
        assert!("5".parse::<MarginValue>().is_err());
        assert!("-5%".parse::<MarginValue>().is_err());
        assert!("abc%".parse::<MarginValue>().is_err());
    }

    #[test]
    fn test_display_margin_values() {
        assert_eq!(MarginValue::None.to_string(), "none");
        assert_eq!(MarginValue::Percentage(5.0).to_string(), "5%");
        assert_eq!(MarginValue::MinPer100Km(3.5).to_string(), "3.5min/100km");
    }

    #[test]
    fn test_margins_deserialize_defaults() {
        let margins: Margins = serde_json::from_str("{}").expect("should deserialize");
        assert_eq!(margins, Margins::default());
    }

    #[test]
    fn test_margins_json_shape() {
        let margins: Margins = serde_json::from_str(r#"{"boundaries":["b"],"values":["5%","2min/100km"]}"#)
            .expect("should deserialize");
        assert_eq!(margins.boundaries, vec!["b".to_string()]);
        assert_eq!(margins.values, vec![MarginValue::Percentage(5.0), MarginValue::MinPer100Km(2.0)]);
    }

    #[test]
    fn test_margin_starting_at() {
        let margins = Margins {
            boundaries: vec!["b".to_string()],
            values: vec![MarginValue::Percentage(5.0), MarginValue::MinPer100Km(2.0)],
        };
        assert_eq!(margins.margin_starting_at("a", 0, 3), Some(MarginValue::Percentage(5.0)));
        assert_eq!(margins.margin_starting_at("b", 1, 3), Some(MarginValue::MinPer100Km(2.0)));
        assert_eq!(margins.margin_starting_at("c", 2, 3), None);
        assert_eq!(margins.margin_starting_at("x", 1, 4), None);
    }
}
