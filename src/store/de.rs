//! Serde helpers for the loosely typed store payloads.
//!
//! The store hands decimals back as strings (`"1.50"`) and dates either as
//! `YYYY-MM-DD` or as a full timestamp.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::{macros::format_description, Date};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

fn to_f64<E: de::Error>(raw: NumberOrText) -> Result<f64, E> {
    match raw {
        NumberOrText::Number(n) => n
            .as_f64()
            .ok_or_else(|| E::custom(format!("number out of range: {n}"))),
        NumberOrText::Text(s) if s.trim().is_empty() => Ok(0.0),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| E::custom(format!("not a number: {s:?}"))),
    }
}

pub fn f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    to_f64(NumberOrText::deserialize(d)?)
}

pub fn u32_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let v = to_f64::<D::Error>(NumberOrText::deserialize(d)?)?;
    if v < 0.0 || v > f64::from(u32::MAX) {
        return Err(de::Error::custom(format!("out of range: {v}")));
    }
    Ok(v.round() as u32)
}

pub fn id_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    match NumberOrText::deserialize(d)? {
        NumberOrText::Number(n) => n
            .as_u64()
            .ok_or_else(|| de::Error::custom(format!("invalid id: {n}"))),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| de::Error::custom(format!("invalid id: {s:?}"))),
    }
}

pub fn opt_id_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_lenient")] u64);
    Ok(Option::<Wrapped>::deserialize(d)?.map(|Wrapped(id)| id))
}

/// Parses the date part of `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS...`.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();
    let day = raw.get(..10)?;
    Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

pub mod date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &Date, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {raw:?}")))
    }
}
