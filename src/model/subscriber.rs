use std::{fmt, num::ParseIntError, str::FromStr};

use serde::{Serialize, Serializer};

/// Width of the `ime`, `priimek` and `uporabnisko_ime` columns.
pub const NAME_MAX_LEN: usize = 64;
/// Width of the `telefonska_stevilka` column.
pub const PHONE_MAX_LEN: usize = 32;

// ###################################
// ->   STRUCTS
// ###################################
/// A subscriber record as stored in the `narocniki` table, text fields already trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subscriber {
    pub id: i32,
    #[serde(rename = "ime")]
    pub first_name: String,
    #[serde(rename = "priimek")]
    pub last_name: String,
    #[serde(rename = "uporabnisko_ime")]
    pub username: String,
    #[serde(
        rename = "telefonska_stevilka",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone_number: Option<String>,
    #[serde(rename = "ocena")]
    pub score: Score,
}

/// Leaderboard score. Stored and served as text, `-1` marks an unranked subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(i64);

/// The closed set of columns that can be changed on an existing subscriber.
/// `id` is not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    FirstName(String),
    LastName(String),
    Username(String),
    PhoneNumber(String),
    Score(Score),
}

// ###################################
// ->   IMPLS
// ###################################
impl Score {
    pub const UNRANKED: Score = Score(-1);

    pub fn new(value: i64) -> Self {
        Score(value)
    }

    pub fn value(self) -> i64 {
        self.0
    }

    pub fn is_ranked(self) -> bool {
        self != Self::UNRANKED
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::UNRANKED
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Score {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Score)
    }
}

impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FieldUpdate {
    /// The column this update writes to. Only ever one of a fixed set of identifiers.
    pub fn column(&self) -> &'static str {
        match self {
            FieldUpdate::FirstName(_) => "ime",
            FieldUpdate::LastName(_) => "priimek",
            FieldUpdate::Username(_) => "uporabnisko_ime",
            FieldUpdate::PhoneNumber(_) => "telefonska_stevilka",
            FieldUpdate::Score(_) => "ocena",
        }
    }

    /// The new value in its stored (text) form.
    pub fn value(&self) -> String {
        match self {
            FieldUpdate::FirstName(v)
            | FieldUpdate::LastName(v)
            | FieldUpdate::Username(v)
            | FieldUpdate::PhoneNumber(v) => v.clone(),
            FieldUpdate::Score(score) => score.to_string(),
        }
    }

    pub fn apply_to(&self, subscriber: &mut Subscriber) {
        match self {
            FieldUpdate::FirstName(v) => subscriber.first_name = v.clone(),
            FieldUpdate::LastName(v) => subscriber.last_name = v.clone(),
            FieldUpdate::Username(v) => subscriber.username = v.clone(),
            FieldUpdate::PhoneNumber(v) => subscriber.phone_number = Some(v.clone()),
            FieldUpdate::Score(score) => subscriber.score = *score,
        }
    }
}
