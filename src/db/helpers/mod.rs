use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::db::models::{CoinFace, InitiativeMethod, MatchResult, TurnOrder};

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_optional_datetime(
    value: Option<String>,
    field: &str,
) -> Result<Option<DateTime<Utc>>> {
    match value {
        Some(raw) => parse_datetime(&raw, field).map(Some),
        None => Ok(None),
    }
}

pub fn parse_result(value: &str) -> Result<MatchResult> {
    match value {
        "win" => Ok(MatchResult::Win),
        "loss" => Ok(MatchResult::Loss),
        other => Err(anyhow!("unknown match result {other}")),
    }
}

pub fn parse_turn_order(value: &str) -> Result<TurnOrder> {
    match value {
        "first" => Ok(TurnOrder::First),
        "second" => Ok(TurnOrder::Second),
        other => Err(anyhow!("unknown turn order {other}")),
    }
}

pub fn parse_initiative_method(value: &str) -> Result<InitiativeMethod> {
    match value {
        "coin" => Ok(InitiativeMethod::Coin),
        other => Err(anyhow!("unknown initiative method {other}")),
    }
}

pub fn parse_coin_face(value: Option<String>) -> Result<Option<CoinFace>> {
    match value.as_deref() {
        None => Ok(None),
        Some("heads") => Ok(Some(CoinFace::Heads)),
        Some("tails") => Ok(Some(CoinFace::Tails)),
        Some(other) => Err(anyhow!("unknown coin face {other}")),
    }
}

pub fn decode_json<T: DeserializeOwned>(raw: &str, field: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("failed to decode {field}"))
}

pub fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("failed to encode JSON column")
}
