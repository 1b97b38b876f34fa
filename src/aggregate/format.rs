//! Presentation of nominal values at the output boundary

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default unit label for the short form, "ribu" meaning thousand
pub const DEFAULT_UNIT_LABEL: &str = "ribu";

/// Default currency symbol
pub const DEFAULT_CURRENCY_SYMBOL: &str = "Rp";

/// How nominal values are rendered in a report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FormattingPolicy {
    /// Plain integers, e.g. `75000`
    #[default]
    RawInteger,
    /// Thousands with a unit label, e.g. `"75ribu"`
    ShortLabel { unit: String },
    /// Currency with grouped digits, e.g. `"Rp 75,000"`
    Currency { symbol: String },
}

impl FormattingPolicy {
    pub fn short_label() -> Self {
        FormattingPolicy::ShortLabel {
            unit: DEFAULT_UNIT_LABEL.to_string(),
        }
    }

    pub fn currency() -> Self {
        FormattingPolicy::Currency {
            symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }

    pub fn format(&self, value: u64) -> FormattedValue {
        match self {
            FormattingPolicy::RawInteger => FormattedValue::Integer(value),
            // Integer division, matching how totals were always reported
            FormattingPolicy::ShortLabel { unit } => {
                FormattedValue::Text(format!("{}{}", value / 1000, unit))
            }
            FormattingPolicy::Currency { symbol } => {
                FormattedValue::Text(format!("{} {}", symbol, group_thousands(value)))
            }
        }
    }
}

/// A nominal rendered for output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormattedValue {
    Integer(u64),
    Text(String),
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormattedValue::Integer(v) => write!(f, "{}", v),
            FormattedValue::Text(s) => f.write_str(s),
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
