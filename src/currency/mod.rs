use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// How the integer part of a number is split into groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupingStyle {
    /// `1,234,567`
    Western,
    /// `12,34,567`: the last three digits, then pairs.
    Indian,
}

/// `Short` is `2024-03-05`, `Medium` is `05 Mar 2024`, `Long` adds the weekday.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateFormatStyle {
    Short,
    #[default]
    Medium,
    Long,
}

impl DateFormatStyle {
    pub const NAMES: [&'static str; 3] = ["short", "medium", "long"];

    pub fn name(self) -> &'static str {
        match self {
            DateFormatStyle::Short => "short",
            DateFormatStyle::Medium => "medium",
            DateFormatStyle::Long => "long",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "short" => Some(DateFormatStyle::Short),
            "medium" => Some(DateFormatStyle::Medium),
            "long" => Some(DateFormatStyle::Long),
            _ => None,
        }
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: GroupingStyle,
    pub date_format: DateFormatStyle,
}

impl LocaleConfig {
    /// Resolves a BCP 47 tag. Indian regions group in lakhs, everything else
    /// in thousands.
    pub fn for_tag(tag: &str) -> Self {
        let grouping = if tag.to_ascii_lowercase().ends_with("-in") {
            GroupingStyle::Indian
        } else {
            GroupingStyle::Western
        };
        Self {
            language_tag: tag.to_string(),
            grouping,
            ..Self::default()
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-IN".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            grouping: GroupingStyle::Indian,
            date_format: DateFormatStyle::default(),
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AED" => "AED ".into(),
        _ => format!("{code} "),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let mut body = format!("{:.*}", precision as usize, value);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    if let Some(pos) = body.find(locale.decimal_separator) {
        let mut int_part = body[..pos].to_string();
        insert_grouping(&mut int_part, locale);
        body = format!("{}{}", int_part, &body[pos..]);
    } else {
        insert_grouping(&mut body, locale);
    }
    body
}

fn insert_grouping(int_part: &mut String, locale: &LocaleConfig) {
    let separator = locale.grouping_separator;
    let mut cleaned = int_part.replace(separator, "");
    let sign = if cleaned.starts_with('-') {
        Some(cleaned.remove(0))
    } else {
        None
    };
    let grouped = match locale.grouping {
        GroupingStyle::Western => group_digits(&cleaned, separator, 3),
        GroupingStyle::Indian => group_indian(&cleaned, separator),
    };
    *int_part = match sign {
        Some(sign) => format!("{sign}{grouped}"),
        None => grouped,
    };
}

fn group_digits(digits: &str, separator: char, size: usize) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % size == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

fn group_indian(digits: &str, separator: char) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    format!("{}{}{}", group_digits(head, separator, 2), separator, tail)
}

/// Formats `amount` with the currency symbol, e.g. `₹12,34,567.00`.
pub fn format_currency_value(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    if amount < 0.0 {
        format!("-{symbol}{body}")
    } else {
        format!("{symbol}{body}")
    }
}

pub fn format_date(locale: &LocaleConfig, date: NaiveDate) -> String {
    match locale.date_format {
        DateFormatStyle::Short => date.format("%Y-%m-%d").to_string(),
        DateFormatStyle::Medium => format!(
            "{:02} {} {}",
            date.day(),
            month_label(date.month()),
            date.year()
        ),
        DateFormatStyle::Long => format!(
            "{}, {:02} {} {}",
            date.weekday(),
            date.day(),
            month_label(date.month()),
            date.year()
        ),
    }
}

pub fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}
