//! Locale-aware formatting of dates and amounts for printed documents

use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Document locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fr,
    Ar,
}

impl Locale {
    /// BCP 47 tag written into the `lang` attribute
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Fr => "fr-FR",
            Locale::Ar => "ar-DZ",
        }
    }

    /// Text direction for the `dir` attribute
    pub fn direction(&self) -> &'static str {
        match self {
            Locale::Fr => "ltr",
            Locale::Ar => "rtl",
        }
    }

    fn group_separator(&self) -> char {
        match self {
            // narrow no-break space
            Locale::Fr => '\u{202f}',
            Locale::Ar => '.',
        }
    }

    fn decimal_separator(&self) -> char {
        ','
    }

    /// Short numeric date (`01/05/2024` in French, `1/5/2024` in Arabic)
    pub fn format_date<D: Datelike>(&self, value: &D) -> String {
        match self {
            Locale::Fr => format!("{:02}/{:02}/{}", value.day(), value.month(), value.year()),
            Locale::Ar => format!("{}/{}/{}", value.day(), value.month(), value.year()),
        }
    }

    /// Group thousands and keep at most two fraction digits
    pub fn format_amount(&self, value: f64) -> String {
        if !value.is_finite() {
            return "0".to_string();
        }
        let cents = (value.abs() * 100.0).round() as u64;
        let int_part = cents / 100;
        let frac = cents % 100;

        let digits = int_part.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.group_separator());
            }
            grouped.push(ch);
        }

        let mut out = String::new();
        if value < 0.0 && cents > 0 {
            out.push('-');
        }
        out.push_str(&grouped);
        if frac > 0 {
            out.push(self.decimal_separator());
            if frac % 10 == 0 {
                out.push_str(&(frac / 10).to_string());
            } else {
                out.push_str(&format!("{:02}", frac));
            }
        }
        out
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fr" | "fr-fr" => Ok(Locale::Fr),
            "ar" | "ar-dz" => Ok(Locale::Ar),
            other => Err(format!("unsupported locale '{}'", other)),
        }
    }
}
