//! Inbound frame decoding.
//!
//! Frames are JSON text with a `type` discriminator:
//! `{"type":"price","data":{"gram":..,"ons":..,"usd":..,"gumus":..}}` or
//! `{"type":"bot_reply","reply":"..."}`. Everything else is ignored.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::state::types::{format_number, whole_float, PriceSnapshot, Quote};

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("null payload")]
    NullPayload,

    #[error("binary frame is not UTF-8")]
    NotUtf8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Price(PriceSnapshot),
    BotReply(String),
    Ignored,
}

// Payload of a "price" frame; every field is optional on the wire
#[derive(Debug, Default, Deserialize)]
struct WsPriceData {
    #[serde(default)]
    gram: Option<Value>,
    #[serde(default)]
    ons: Option<Value>,
    #[serde(default)]
    usd: Option<Value>,
    #[serde(default)]
    gumus: Option<Value>,
}

impl From<WsPriceData> for PriceSnapshot {
    fn from(d: WsPriceData) -> Self {
        PriceSnapshot {
            gram: Quote::from_field(d.gram.as_ref()),
            ons: Quote::from_field(d.ons.as_ref()),
            usd: Quote::from_field(d.usd.as_ref()),
            gumus: Quote::from_field(d.gumus.as_ref()),
        }
    }
}

pub fn decode(text: &str) -> Result<Frame, FrameError> {
    let msg: Value = serde_json::from_str(text)?;

    let obj = match &msg {
        Value::Null => return Err(FrameError::NullPayload),
        Value::Object(obj) => obj,
        _ => return Ok(Frame::Ignored),
    };

    match obj.get("type").and_then(Value::as_str) {
        Some("price") => match obj.get("data") {
            Some(data) if is_truthy(data) => {
                // non-object data carries no fields -> all placeholders
                let parsed = match data {
                    Value::Object(_) => serde_json::from_value::<WsPriceData>(data.clone()).unwrap_or_default(),
                    _ => WsPriceData::default(),
                };
                Ok(Frame::Price(parsed.into()))
            }
            _ => Ok(Frame::Ignored),
        },
        Some("bot_reply") => {
            let reply = obj
                .get("reply")
                .filter(|v| is_truthy(v))
                .or_else(|| obj.get("text").filter(|v| is_truthy(v)))
                .map(display_text)
                .unwrap_or_else(|| render_numbers(&msg).to_string());
            Ok(Frame::BotReply(reply))
        }
        _ => Ok(Frame::Ignored),
    }
}

/// Binary frames are accepted if they carry UTF-8 JSON.
pub fn decode_bytes(bytes: &[u8]) -> Result<Frame, FrameError> {
    let text = std::str::from_utf8(bytes).map_err(|_| FrameError::NotUtf8)?;
    decode(text)
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n),
        other => render_numbers(other).to_string(),
    }
}

// Rewrites whole floats as integers so serialized JSON reads 2451, not 2451.0
fn render_numbers(v: &Value) -> Value {
    match v {
        Value::Number(n) => whole_float(n).map_or_else(|| v.clone(), Value::from),
        Value::Array(items) => Value::Array(items.iter().map(render_numbers).collect()),
        Value::Object(obj) => Value::Object(obj.iter().map(|(k, v)| (k.clone(), render_numbers(v))).collect()),
        other => other.clone(),
    }
}
