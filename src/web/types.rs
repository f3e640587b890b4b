//! Request and response bodies of the `web` module, and the parsing that turns
//! raw request bodies into validated model types.

use serde::{Deserialize, Serialize};

use crate::model::{FieldUpdate, RankedSubscriber, Score, Subscriber, NAME_MAX_LEN, PHONE_MAX_LEN};

// ###################################
// ->   STRUCTS
// ###################################
/// Deserializable Subscriber
/// Every field is optional so a missing one can be reported as invalid input
/// instead of a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct DeserSubscriber {
    pub id: Option<i32>,
    pub ime: Option<String>,
    pub priimek: Option<String>,
    pub uporabnisko_ime: Option<String>,
    pub telefonska_stevilka: Option<String>,
    pub ocena: Option<TextOrInt>,
}

/// Body of a single field update: `{"atribut": "ime", "vrednost": "Teolina"}`
#[derive(Debug, Default, Deserialize)]
pub struct DeserFieldUpdate {
    pub atribut: Option<String>,
    pub vrednost: Option<TextOrInt>,
}

/// Scores are text in the API, but plain JSON numbers are accepted too.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextOrInt {
    Int(i64),
    Text(String),
}

#[derive(Debug, Serialize)]
pub struct SubscriberList {
    pub narocniki: Vec<Subscriber>,
}

#[derive(Debug, Serialize)]
pub struct Leaderboard {
    pub lestvica: Vec<RankedSubscriber>,
}

// ###################################
// ->   IMPLS
// ###################################
impl TryFrom<DeserSubscriber> for Subscriber {
    type Error = DataParsingError;

    fn try_from(deser_sub: DeserSubscriber) -> Result<Self, Self::Error> {
        let id = deser_sub.id.ok_or(DataParsingError::MissingField("id"))?;
        let first_name = parse_required_text("ime", deser_sub.ime, NAME_MAX_LEN)?;
        let last_name = parse_required_text("priimek", deser_sub.priimek, NAME_MAX_LEN)?;
        let username =
            parse_required_text("uporabnisko_ime", deser_sub.uporabnisko_ime, NAME_MAX_LEN)?;
        let phone_number = parse_optional_text(
            "telefonska_stevilka",
            deser_sub.telefonska_stevilka,
            PHONE_MAX_LEN,
        )?;
        let score = deser_sub
            .ocena
            .map(parse_score)
            .transpose()?
            .unwrap_or_default();

        Ok(Subscriber {
            id,
            first_name,
            last_name,
            username,
            phone_number,
            score,
        })
    }
}

impl TryFrom<DeserFieldUpdate> for FieldUpdate {
    type Error = DataParsingError;

    fn try_from(deser_update: DeserFieldUpdate) -> Result<Self, Self::Error> {
        let attribute = deser_update
            .atribut
            .ok_or(DataParsingError::MissingField("atribut"))?;
        let value = deser_update
            .vrednost
            .ok_or(DataParsingError::MissingField("vrednost"))?;

        let update = match attribute.as_str() {
            "ime" => FieldUpdate::FirstName(parse_text("ime", value.into_text(), NAME_MAX_LEN)?),
            "priimek" => {
                FieldUpdate::LastName(parse_text("priimek", value.into_text(), NAME_MAX_LEN)?)
            }
            "uporabnisko_ime" => FieldUpdate::Username(parse_text(
                "uporabnisko_ime",
                value.into_text(),
                NAME_MAX_LEN,
            )?),
            "telefonska_stevilka" => FieldUpdate::PhoneNumber(parse_text(
                "telefonska_stevilka",
                value.into_text(),
                PHONE_MAX_LEN,
            )?),
            "ocena" => FieldUpdate::Score(parse_score(value)?),
            _ => return Err(DataParsingError::UnknownAttribute(attribute)),
        };

        Ok(update)
    }
}

impl TextOrInt {
    pub fn into_text(self) -> String {
        match self {
            TextOrInt::Int(v) => v.to_string(),
            TextOrInt::Text(v) => v,
        }
    }
}

// ###################################
// ->   HELPERS
// ###################################
/// Trims the value and checks it fits its fixed-width column.
/// Column widths count characters, so that is what gets counted here too.
fn parse_text(
    field: &'static str,
    value: String,
    max_len: usize,
) -> Result<String, DataParsingError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(DataParsingError::FieldEmpty(field));
    }
    if value.chars().count() > max_len {
        return Err(DataParsingError::FieldTooLong { field, max_len });
    }

    Ok(value.to_owned())
}

fn parse_required_text(
    field: &'static str,
    value: Option<String>,
    max_len: usize,
) -> Result<String, DataParsingError> {
    let value = value.ok_or(DataParsingError::MissingField(field))?;
    parse_text(field, value, max_len)
}

/// `null`, a missing field and a blank string all mean "no value".
fn parse_optional_text(
    field: &'static str,
    value: Option<String>,
    max_len: usize,
) -> Result<Option<String>, DataParsingError> {
    match value {
        Some(value) if !value.trim().is_empty() => parse_text(field, value, max_len).map(Some),
        _ => Ok(None),
    }
}

fn parse_score(value: TextOrInt) -> Result<Score, DataParsingError> {
    match value {
        TextOrInt::Int(v) => Ok(Score::new(v)),
        TextOrInt::Text(v) => v.parse().map_err(|_| DataParsingError::InvalidScore(v)),
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("field is empty: {0}")]
    FieldEmpty(&'static str),
    #[error("field {field} is longer than {max_len} characters")]
    FieldTooLong { field: &'static str, max_len: usize },

    #[error("score is not an integer: {0:?}")]
    InvalidScore(String),

    #[error("unknown or read-only attribute: {0:?}")]
    UnknownAttribute(String),
}
