//! Domain models that mirror the pre-generated catalog and get passed
//! throughout the TUI. These types stay light-weight data holders so other
//! layers can focus on ordering, persistence and presentation. Field names
//! follow Rust conventions while the serde attributes keep the JSON layout of
//! the generated catalog intact.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;
use ratatui::style::Color;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Subjects grouped by admission unit (for example `unitA`).
pub type SubjectsByUnit = BTreeMap<String, Vec<Subject>>;

#[derive(Debug, Clone, Default, Deserialize)]
/// The whole static dataset supplied at startup. Nothing in the crate mutates
/// it after loading.
pub struct Catalog {
    #[serde(default)]
    pub universities: Vec<Institution>,
    /// Flat list of exam events across every institution.
    #[serde(default, rename = "CalendarInfo", alias = "calendarInfo")]
    pub calendar_info: Vec<AdmissionScheduleItem>,
}

#[derive(Debug, Clone, Deserialize)]
/// One university or institute. Only the seat-info screen looks at the
/// subjects; the schedule lives in [`Catalog::calendar_info`].
pub struct Institution {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Optional because several institutions never publish per-subject seats.
    #[serde(default)]
    pub subjects: Option<SubjectsByUnit>,
}

#[derive(Debug, Clone, Deserialize)]
/// A single academic subject offering.
pub struct Subject {
    /// Short identifier, unique within an institution unit. Bookmarks are
    /// stored by this code.
    #[serde(rename = "short")]
    pub short_code: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "seat")]
    pub seat_count: SeatCount,
    /// Opaque rich-text annotation. The catalog stores HTML snippets here.
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default, rename = "reviewLink")]
    pub review_link: Option<String>,
}

impl Subject {
    /// Whether the subject carries a non-blank review link.
    pub fn has_review_link(&self) -> bool {
        self.review_link
            .as_deref()
            .is_some_and(|link| !link.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// Seat counts are usually numbers, but some institutions publish free text
/// such as "40 (+5 quota)".
pub enum SeatCount {
    Count(u64),
    Text(String),
}

impl fmt::Display for SeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatCount::Count(count) => write!(f, "{count}"),
            SeatCount::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Department category of an exam. Only used to pick a color and a label.
pub enum Department {
    Science,
    Arts,
    Commerce,
    #[default]
    #[serde(other)]
    Mixed,
}

impl Department {
    /// Tag color drawn next to the university name.
    pub fn color(self) -> Color {
        match self {
            Department::Science => Color::Rgb(0x22, 0xc5, 0x5e),
            Department::Arts => Color::Rgb(0x3b, 0x82, 0xf6),
            Department::Commerce => Color::Rgb(0xea, 0xb3, 0x08),
            Department::Mixed => Color::Rgb(0x6b, 0x72, 0x80),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Department::Science => "বিজ্ঞান",
            Department::Arts => "মানবিক",
            Department::Commerce => "ব্যবসা",
            Department::Mixed => "মিক্সড",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExamDetails {
    /// Human-readable date exactly as published (may be a range or "TBA").
    #[serde(default)]
    pub date: Option<String>,
    /// Exact start of the exam, used for the countdown and for ranking.
    #[serde(
        default,
        rename = "ExamCountdownDate",
        alias = "examCountdownDate",
        deserialize_with = "lenient_countdown_date"
    )]
    pub exam_countdown_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
/// One exam/admission event on the schedule screen.
pub struct AdmissionScheduleItem {
    pub id: String,
    #[serde(rename = "universityNameAndUnit")]
    pub university_name_and_unit: String,
    #[serde(default, deserialize_with = "lenient_department")]
    pub department: Department,
    #[serde(default, rename = "examDetails")]
    pub exam_details: ExamDetails,
}

impl AdmissionScheduleItem {
    pub fn countdown_date(&self) -> Option<DateTime<Utc>> {
        self.exam_details.exam_countdown_date
    }

    /// Items with neither a display date nor a countdown target carry no
    /// schedule information and never appear on screen.
    pub fn is_scheduled(&self) -> bool {
        self.exam_details.date.is_some() || self.exam_details.exam_countdown_date.is_some()
    }
}

/// Any department value that is not one of the known names, including
/// `null` and numbers, reads as [`Department::Mixed`].
fn lenient_department<'de, D>(deserializer: D) -> Result<Department, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Department::deserialize(value).unwrap_or_default())
}

/// A countdown date that cannot be read leaves the item undated instead of
/// failing the whole catalog. Blank strings mean undated. Timestamps without
/// an offset are taken in local time and bare dates as UTC midnight.
fn lenient_countdown_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::String(raw) => raw,
        other => {
            warn!("ignoring non-text ExamCountdownDate {other}");
            return Ok(None);
        }
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let parsed = parse_countdown_date(raw);
    if parsed.is_none() {
        warn!("ignoring unreadable ExamCountdownDate {raw:?}");
    }
    Ok(parsed)
}

fn parse_countdown_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|at| at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}
