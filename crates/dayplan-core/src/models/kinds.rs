//! Small enumerations used by plan records.

use std::str::FromStr;

use jiff::civil::Date;

/// Weather recorded for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Weather {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Overcast,
    Snowy,
}

impl Weather {
    /// All weather values in display order.
    pub const ALL: [Weather; 5] = [
        Weather::Sunny,
        Weather::Cloudy,
        Weather::Rainy,
        Weather::Overcast,
        Weather::Snowy,
    ];

    /// Storage string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Sunny => "sunny",
            Weather::Cloudy => "cloudy",
            Weather::Rainy => "rainy",
            Weather::Overcast => "overcast",
            Weather::Snowy => "snowy",
        }
    }
}

impl FromStr for Weather {
    type Err = String;

    /// Accepts the storage names as well as the labels written by the first
    /// version of the document format.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunny" | "晴" => Ok(Weather::Sunny),
            "cloudy" | "多云" => Ok(Weather::Cloudy),
            "rainy" | "rain" | "雨" => Ok(Weather::Rainy),
            "overcast" | "阴" => Ok(Weather::Overcast),
            "snowy" | "snow" | "雪" => Ok(Weather::Snowy),
            _ => Err(format!("Invalid weather: {s}")),
        }
    }
}

/// Subject a planned task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Subject {
    Math,
    Physics,
    Econ,
    Cs,
    #[default]
    Other,
}

impl Subject {
    /// All subjects in display order.
    pub const ALL: [Subject; 5] = [
        Subject::Math,
        Subject::Physics,
        Subject::Econ,
        Subject::Cs,
        Subject::Other,
    ];

    /// Storage string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Physics => "physics",
            Subject::Econ => "econ",
            Subject::Cs => "cs",
            Subject::Other => "other",
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "math" => Ok(Subject::Math),
            "physics" => Ok(Subject::Physics),
            "econ" => Ok(Subject::Econ),
            "cs" => Ok(Subject::Cs),
            "other" => Ok(Subject::Other),
            _ => Err(format!("Invalid subject: {s}")),
        }
    }
}

/// Where the planned task list of a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanSource {
    /// Fresh record created for a date with nothing stored
    #[default]
    New,
    /// Tasks copied from the record of another date
    InheritedFrom(Date),
    /// Fresh record created while switching to a past date
    DateChanged,
}

const INHERITED_PREFIX: &str = "inherited_from_";

impl PlanSource {
    /// Storage tag, e.g. `new` or `inherited_from_2026-10-18`.
    pub fn tag(&self) -> String {
        match self {
            PlanSource::New => "new".to_string(),
            PlanSource::InheritedFrom(date) => format!("{INHERITED_PREFIX}{date}"),
            PlanSource::DateChanged => "date_changed".to_string(),
        }
    }
}

impl FromStr for PlanSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(PlanSource::New),
            "date_changed" => Ok(PlanSource::DateChanged),
            _ => s
                .strip_prefix(INHERITED_PREFIX)
                .and_then(|date| date.parse::<Date>().ok())
                .map(PlanSource::InheritedFrom)
                .ok_or_else(|| format!("Invalid plan source: {s}")),
        }
    }
}

/// Position of a plan date relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStatus {
    Today,
    Future,
    Past,
}

impl DateStatus {
    /// Classify `date` against `today`.
    pub fn classify(date: Date, today: Date) -> Self {
        match date.cmp(&today) {
            std::cmp::Ordering::Equal => DateStatus::Today,
            std::cmp::Ordering::Greater => DateStatus::Future,
            std::cmp::Ordering::Less => DateStatus::Past,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateStatus::Today => "today",
            DateStatus::Future => "future",
            DateStatus::Past => "past",
        }
    }
}
