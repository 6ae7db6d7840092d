use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Time of day on a 24-hour clock. Ordering is chronological.
///
/// Times read from text keep whatever digits the text had, so `13 PM`
/// becomes hour 25. [`TimeOfDay::is_valid`] tells real clock times apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Returns `None` unless `hour < 24` and `minute < 60`.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        let time = Self::from_parts(hour, minute);
        time.is_valid().then_some(time)
    }

    /// No range checks; out-of-range parts are carried through as given.
    pub fn from_parts(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    pub fn is_valid(self) -> bool {
        self.hour < 24 && self.minute < 60
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// `hour * 100 + minute`, e.g. 1830 for 6:30 PM.
    pub fn as_hhmm(self) -> u16 {
        u16::from(self.hour) * 100 + u16::from(self.minute)
    }
}

impl From<TimeOfDay> for u16 {
    fn from(time: TimeOfDay) -> Self {
        time.as_hhmm()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.as_hhmm())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_hhmm())
    }
}

/// A start/end pair. `end < start` is allowed and kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self { start, end }
    }

    /// `(start, end)` as `HHMM` integers.
    pub fn as_hhmm(self) -> (u16, u16) {
        (self.start.as_hhmm(), self.end.as_hhmm())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

impl Serialize for TimeRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalized contents of one hours cell.
///
/// `Open(vec![])` means no hours could be read from the cell and is
/// deliberately distinct from `Closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayHours {
    Closed,
    Open(Vec<TimeRange>),
}

impl DayHours {
    pub const CLOSED_LABEL: &'static str = "CLOSED";

    pub fn is_closed(&self) -> bool {
        matches!(self, DayHours::Closed)
    }

    pub fn ranges(&self) -> &[TimeRange] {
        match self {
            DayHours::Closed => &[],
            DayHours::Open(ranges) => ranges,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DayHours::Open(ranges) if ranges.is_empty())
    }
}

impl Default for DayHours {
    fn default() -> Self {
        DayHours::Open(Vec::new())
    }
}

impl fmt::Display for DayHours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayHours::Closed => f.write_str(Self::CLOSED_LABEL),
            DayHours::Open(ranges) => {
                for (i, range) in ranges.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" / ")?;
                    }
                    write!(f, "{}", range)?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for DayHours {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            DayHours::Closed => serializer.serialize_str(Self::CLOSED_LABEL),
            DayHours::Open(ranges) => {
                let mut seq = serializer.serialize_seq(Some(ranges.len()))?;
                for range in ranges {
                    seq.serialize_element(range)?;
                }
                seq.end()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Exact day name after trimming, e.g. `"Monday"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|day| day.name() == name)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three hour columns of the facility hours table, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoursCategory {
    Building,
    ClimbingWall,
    PoolAndSauna,
}

impl HoursCategory {
    pub const ALL: [HoursCategory; 3] = [
        HoursCategory::Building,
        HoursCategory::ClimbingWall,
        HoursCategory::PoolAndSauna,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HoursCategory::Building => "Building Hours",
            HoursCategory::ClimbingWall => "Climbing Wall Hours",
            HoursCategory::PoolAndSauna => "Pool and Sauna Hours",
        }
    }

    /// Table column holding this category; column 0 is the day name.
    pub fn column(self) -> usize {
        match self {
            HoursCategory::Building => 1,
            HoursCategory::ClimbingWall => 2,
            HoursCategory::PoolAndSauna => 3,
        }
    }
}

pub type WeekHours = BTreeMap<Weekday, DayHours>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct HoursReport {
    #[serde(rename = "Building Hours")]
    pub building: WeekHours,
    #[serde(rename = "Climbing Wall Hours")]
    pub climbing_wall: WeekHours,
    #[serde(rename = "Pool and Sauna Hours")]
    pub pool_and_sauna: WeekHours,
    #[serde(rename = "Updated Time", skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<String>,
    #[serde(rename = "Current Time")]
    pub current_time: String,
}

impl HoursReport {
    pub fn hours(&self, category: HoursCategory) -> &WeekHours {
        match category {
            HoursCategory::Building => &self.building,
            HoursCategory::ClimbingWall => &self.climbing_wall,
            HoursCategory::PoolAndSauna => &self.pool_and_sauna,
        }
    }

    pub fn hours_mut(&mut self, category: HoursCategory) -> &mut WeekHours {
        match category {
            HoursCategory::Building => &mut self.building,
            HoursCategory::ClimbingWall => &mut self.climbing_wall,
            HoursCategory::PoolAndSauna => &mut self.pool_and_sauna,
        }
    }

    /// Number of days seen in the table.
    pub fn day_count(&self) -> usize {
        self.building.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassRecord {
    #[serde(rename = "Class Name")]
    pub class_name: String,
    #[serde(rename = "Day")]
    pub day: String,
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Instructor")]
    pub instructor: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Time Ranges", skip_serializing_if = "Vec::is_empty")]
    pub time_ranges: Vec<TimeRange>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassReport {
    #[serde(rename = "Classes")]
    pub classes: Vec<ClassRecord>,
    #[serde(rename = "Current Time")]
    pub current_time: String,
}
