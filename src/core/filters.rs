use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Entry, EntryKind};
use crate::errors::ValidationError;

/// Date window relative to a reference day (usually today).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    All,
    Today,
    /// The reference day and anything on or after the day one week before it.
    ThisWeek,
    ThisMonth,
}

impl DateRange {
    pub fn contains(self, date: NaiveDate, reference: NaiveDate) -> bool {
        match self {
            DateRange::All => true,
            DateRange::Today => date == reference,
            DateRange::ThisWeek => date >= reference - Duration::days(7),
            DateRange::ThisMonth => {
                date.year() == reference.year() && date.month() == reference.month()
            }
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DateRange::All => "All",
            DateRange::Today => "Today",
            DateRange::ThisWeek => "This Week",
            DateRange::ThisMonth => "This Month",
        })
    }
}

impl FromStr for DateRange {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "all" => Ok(DateRange::All),
            "today" => Ok(DateRange::Today),
            "week" | "thisweek" => Ok(DateRange::ThisWeek),
            "month" | "thismonth" => Ok(DateRange::ThisMonth),
            _ => Err(ValidationError::Other(format!("unknown date range `{}`", s.trim()))),
        }
    }
}

/// Criteria applied to a project's entries. `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    pub search: Option<String>,
    pub kind: Option<EntryKind>,
    pub category: Option<String>,
    pub range: DateRange,
}

impl EntryFilter {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.trim().is_empty()).then(|| term.trim().to_lowercase());
        self
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// `"All"` clears the category filter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = if category.trim().eq_ignore_ascii_case("all") {
            None
        } else {
            Some(category)
        };
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }

    pub fn matches(&self, entry: &Entry, reference: NaiveDate) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = entry.description.to_lowercase().contains(&term)
                || entry.category.to_lowercase().contains(&term)
                || entry.amount.to_string().contains(&term);
            if !hit {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if entry.kind != kind {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &entry.category != category {
                return false;
            }
        }
        self.range.contains(entry.date, reference)
    }

    pub fn apply<'a, I>(&self, entries: I, reference: NaiveDate) -> Vec<&'a Entry>
    where
        I: IntoIterator<Item = &'a Entry>,
    {
        entries
            .into_iter()
            .filter(|entry| self.matches(entry, reference))
            .collect()
    }
}

/// Distinct categories in first-seen order.
pub fn distinct_categories<'a, I>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut seen = Vec::new();
    for entry in entries {
        if !seen.contains(&entry.category) {
            seen.push(entry.category.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<Entry> {
        let project = Uuid::new_v4();
        vec![
            Entry::new(project, "u", EntryKind::Income, 5000.0, day(2024, 3, 20))
                .with_category("salary")
                .with_description("March pay"),
            Entry::new(project, "u", EntryKind::Expense, 120.0, day(2024, 3, 18))
                .with_category("food")
                .with_description("Lunch with team"),
            Entry::new(project, "u", EntryKind::Expense, 800.0, day(2024, 2, 2))
                .with_category("rent"),
        ]
    }

    #[test]
    fn search_covers_description_category_and_amount() {
        let entries = sample();
        let today = day(2024, 3, 20);
        assert_eq!(EntryFilter::default().with_search("LUNCH").apply(&entries, today).len(), 1);
        assert_eq!(EntryFilter::default().with_search("rent").apply(&entries, today).len(), 1);
        assert_eq!(EntryFilter::default().with_search("800").apply(&entries, today).len(), 1);
    }

    #[test]
    fn ranges_are_relative_to_reference() {
        let entries = sample();
        let today = day(2024, 3, 20);
        let week = EntryFilter::default().with_range(DateRange::ThisWeek);
        assert_eq!(week.apply(&entries, today).len(), 2);
        let month = EntryFilter::default().with_range(DateRange::ThisMonth);
        assert_eq!(month.apply(&entries, today).len(), 2);
        let only_today = EntryFilter::default().with_range(DateRange::Today);
        assert_eq!(only_today.apply(&entries, today).len(), 1);
    }

    #[test]
    fn kind_and_category_combine() {
        let entries = sample();
        let today = day(2024, 3, 20);
        let filter = EntryFilter::default()
            .with_kind(EntryKind::Expense)
            .with_category("food");
        let hits = filter.apply(&entries, today);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].amount, 120.0);
        assert!(EntryFilter::default().with_category("All").category.is_none());
    }

    #[test]
    fn range_names_parse() {
        assert_eq!("This Week".parse::<DateRange>(), Ok(DateRange::ThisWeek));
        assert_eq!("month".parse::<DateRange>(), Ok(DateRange::ThisMonth));
        assert!("fortnight".parse::<DateRange>().is_err());
    }

    #[test]
    fn categories_are_distinct() {
        let mut entries = sample();
        entries.push(entries[1].clone());
        assert_eq!(distinct_categories(&entries), vec!["salary", "food", "rent"]);
    }
}
