//! Years-of-experience inference from free-text resumes

use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

const MONTHS: [(&str, &str); 12] = [
    ("jan", "january"),
    ("feb", "february"),
    ("mar", "march"),
    ("apr", "april"),
    ("may", "may"),
    ("jun", "june"),
    ("jul", "july"),
    ("aug", "august"),
    ("sep", "september"),
    ("oct", "october"),
    ("nov", "november"),
    ("dec", "december"),
];

/// One `<Month> <Year>` to `<Month> <Year>|present` span found in a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_year: i32,
    pub start_month: u32,
    pub end_year: i32,
    pub end_month: u32,
    pub ongoing: bool,
}

impl DateRange {
    /// Elapsed whole months, never negative.
    pub fn months(&self) -> u32 {
        let delta = (self.end_year - self.start_year) * 12
            + (self.end_month as i32 - self.start_month as i32);
        delta.max(0) as u32
    }
}

pub struct ExperienceEstimator {
    range_regex: Regex,
    years_regex: Regex,
    labelled_regex: Regex,
}

impl Default for ExperienceEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExperienceEstimator {
    pub fn new() -> Self {
        let range_regex = Regex::new(
            r"(?i)\b([a-z]{3,9})\.?\s+(\d{4})\s*(?:-|–|—|to|until|till)\s*(?:([a-z]{3,9})\.?\s+(\d{4})|(present|current|now))\b",
        )
        .expect("Invalid date range regex");

        let years_regex = Regex::new(r"(?i)\b(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b")
            .expect("Invalid years regex");

        // The number must end at a non-digit so a year like "2019" is never read as "20"
        let labelled_regex = Regex::new(r"(?i)\bexperience\b[^0-9\n]{0,30}?(\d{1,2}(?:\.\d+)?)(?:\D|$)")
            .expect("Invalid labelled experience regex");

        Self {
            range_regex,
            years_regex,
            labelled_regex,
        }
    }

    /// Estimated years of experience as of today, rounded to one decimal.
    pub fn estimate(&self, text: &str) -> f32 {
        self.estimate_at(text, Local::now().date_naive())
    }

    /// Estimated years of experience with `today` standing in for "present".
    pub fn estimate_at(&self, text: &str, today: NaiveDate) -> f32 {
        let total_months: u32 = self
            .date_ranges(text, today)
            .iter()
            .map(DateRange::months)
            .sum();

        if total_months > 0 {
            return round1(total_months as f32 / 12.0);
        }

        self.stated_years(text).map(round1).unwrap_or(0.0)
    }

    /// Every parseable date range in `text`; unparseable ones are skipped.
    pub fn date_ranges(&self, text: &str, today: NaiveDate) -> Vec<DateRange> {
        self.range_regex
            .captures_iter(text)
            .filter_map(|caps| {
                let start_month = month_number(caps.get(1)?.as_str())?;
                let start_year = caps.get(2)?.as_str().parse::<i32>().ok()?;

                let (end_year, end_month, ongoing) = if caps.get(5).is_some() {
                    (today.year(), today.month(), true)
                } else {
                    let end_month = month_number(caps.get(3)?.as_str())?;
                    let end_year = caps.get(4)?.as_str().parse::<i32>().ok()?;
                    (end_year, end_month, false)
                };

                Some(DateRange {
                    start_year,
                    start_month,
                    end_year,
                    end_month,
                    ongoing,
                })
            })
            .collect()
    }

    /// First explicit "N years" / "experience: N" statement, if any.
    fn stated_years(&self, text: &str) -> Option<f32> {
        let by_unit = self.years_regex.captures(text).and_then(|c| c.get(1));
        let by_label = self.labelled_regex.captures(text).and_then(|c| c.get(1));

        let first = match (by_unit, by_label) {
            (Some(a), Some(b)) => Some(if a.start() <= b.start() { a } else { b }),
            (a, b) => a.or(b),
        }?;

        first.as_str().parse::<f32>().ok()
    }
}

fn month_number(token: &str) -> Option<u32> {
    let token = token.to_lowercase();
    MONTHS
        .iter()
        .position(|(short, long)| token == *short || token == *long || (*short == "sep" && token == "sept"))
        .map(|index| index as u32 + 1)
}

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
