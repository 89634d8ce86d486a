//! Raw, user-controlled search requests and their validation.
//!
//! Validation short-circuits: the first failing rule is reported. An
//! unparseable `limit` silently falls back to the default, while an
//! unparseable `maxPrice` is rejected.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{SearchMode, SearchParams, DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub mode: Option<String>,
    #[serde(alias = "query")]
    pub description: Option<String>,
    pub title: Option<String>,
    pub limit: Option<Value>,
    pub available: Option<Value>,
    pub max_price: Option<Value>,
    pub restaurant: Option<String>,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<SearchParams, ValidationError> {
        let mode = parse_mode(self.mode.as_deref())?;

        let description = non_blank(self.description.as_deref());
        let title = non_blank(self.title.as_deref());
        if mode.needs_vector() && description.is_none() {
            return Err(ValidationError::MissingDescription { mode: mode.to_string() });
        }
        if mode.needs_title() && title.is_none() {
            return Err(ValidationError::MissingTitle { mode: mode.to_string() });
        }

        let limit = parse_limit(self.limit.as_ref());
        let max_price = parse_max_price(self.max_price.as_ref())?;
        let available = parse_available(self.available.as_ref())?;
        let restaurant = non_blank(self.restaurant.as_deref());

        Ok(SearchParams { mode, description, title, limit, available, max_price, restaurant })
    }
}

fn parse_mode(raw: Option<&str>) -> Result<SearchMode, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(SearchMode::default()),
        Some(m) => SearchMode::parse(m).ok_or_else(|| ValidationError::InvalidMode(m.to_string())),
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Clamp to `[MIN_LIMIT, MAX_LIMIT]`; anything unparseable becomes the default.
pub fn parse_limit(raw: Option<&Value>) -> usize {
    let parsed: Option<i64> = match raw {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(truncate)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(truncate))
        }
        _ => None,
    };
    match parsed {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Some(n) => n.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as usize,
        None => DEFAULT_LIMIT,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate(f: f64) -> i64 { f.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64 }

fn parse_max_price(raw: Option<&Value>) -> Result<Option<f64>, ValidationError> {
    let value = match raw {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    let Some(price) = value.filter(|p| p.is_finite()) else {
        return Err(ValidationError::InvalidNumericFormat { field: "maxPrice", value: display_raw(raw) });
    };
    if price < 0.0 {
        return Err(ValidationError::NegativePrice(price));
    }
    Ok(Some(price))
}

fn parse_available(raw: Option<&Value>) -> Result<Option<bool>, ValidationError> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => Ok(Some(true)),
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => Ok(Some(false)),
        Some(_) => Err(ValidationError::InvalidAvailability(display_raw(raw))),
    }
}

fn display_raw(raw: Option<&Value>) -> String {
    match raw {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
