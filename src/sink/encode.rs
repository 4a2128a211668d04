//! Text and JSON record encoders.
//!
//! Text records are `key=value` pairs separated by spaces; JSON records are
//! one object per line. Both keep attributes in call order. Quoted text
//! values use JSON string escaping.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::ConfigError;
use crate::sink::record::{Attr, Source};

/// Wire format of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl Format {
    pub const fn as_str(self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Json => "json",
        }
    }

    pub(crate) fn timestamp(self, time: &DateTime<Local>) -> String {
        match self {
            Format::Text => time.to_rfc3339_opts(SecondsFormat::Millis, true),
            Format::Json => time.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }

    pub(crate) fn source_value(self, source: Source) -> Value {
        match self {
            Format::Text => Value::String(source.to_string()),
            Format::Json => json!({ "file": source.file, "line": source.line }),
        }
    }

    /// Serialize one record terminated by a newline.
    pub(crate) fn encode<'a>(
        self,
        attrs: impl Iterator<Item = &'a Attr>,
        buf: &mut Vec<u8>,
    ) -> io::Result<()> {
        match self {
            Format::Text => encode_text(attrs, buf),
            Format::Json => encode_json(attrs, buf),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Format {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            _ => Err(ConfigError::InvalidValue {
                key: "format".to_string(),
                reason: format!("expected \"text\" or \"json\", got {s:?}"),
            }),
        }
    }
}

fn encode_text<'a>(attrs: impl Iterator<Item = &'a Attr>, buf: &mut Vec<u8>) -> io::Result<()> {
    for (i, attr) in attrs.enumerate() {
        if i > 0 {
            buf.push(b' ');
        }
        write_text_str(buf, &attr.key)?;
        buf.push(b'=');
        match &attr.value {
            Value::String(s) => write_text_str(buf, s)?,
            Value::Null => buf.extend_from_slice(b"<nil>"),
            Value::Bool(_) | Value::Number(_) => write!(buf, "{}", attr.value)?,
            nested => write_text_str(buf, &nested.to_string())?,
        }
    }
    buf.push(b'\n');
    Ok(())
}

fn write_text_str(buf: &mut Vec<u8>, s: &str) -> io::Result<()> {
    if needs_quoting(s) {
        serde_json::to_writer(&mut *buf, s)?;
        Ok(())
    } else {
        buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

fn needs_quoting(s: &str) -> bool {
    s.is_empty()
        || s
            .chars()
            .any(|c| c == '=' || c == '"' || c.is_whitespace() || c.is_control())
}

fn encode_json<'a>(attrs: impl Iterator<Item = &'a Attr>, buf: &mut Vec<u8>) -> io::Result<()> {
    buf.push(b'{');
    for (i, attr) in attrs.enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        serde_json::to_writer(&mut *buf, attr.key.as_ref())?;
        buf.push(b':');
        serde_json::to_writer(&mut *buf, &attr.value)?;
    }
    buf.extend_from_slice(b"}\n");
    Ok(())
}
