use std::fmt::Display;
use std::str::FromStr;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::http::curl_handle::CurlOption;
use crate::http::error::{Code, ErrorResponse};

pub mod bucket_access_controls;
pub mod buckets;
pub mod conn_pool;
pub mod curl_handle;
pub(crate) mod curl_multi;
pub mod curl_request;
pub mod curl_request_builder;
pub mod default_object_access_controls;
pub mod download_stream;
pub mod error;
pub mod object_access_controls;
pub mod objects;
pub mod options;
pub mod patch_builder;
pub mod storage_class;
pub mod storage_client;
pub mod upload_stream;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An error returned from the Google Cloud Storage service.
    #[error(transparent)]
    Response(#[from] ErrorResponse),

    /// A libcurl easy interface failure.
    #[error("{site}: {source}")]
    Transport {
        site: &'static str,
        #[source]
        source: curl::Error,
    },

    /// A libcurl multi interface failure.
    #[error("{site}: {source}")]
    Multi {
        site: &'static str,
        #[source]
        source: curl::MultiError,
    },

    /// A transport option could not be applied.
    #[error("cannot set {option:?} to {value}: {message}")]
    SetOption {
        option: CurlOption,
        value: String,
        message: String,
    },

    /// An error from a token source.
    #[error("token source failed: {0}")]
    TokenSource(Box<dyn std::error::Error + Send + Sync>),

    /// Malformed input or a value that cannot be used in a request.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A lookup by key found nothing.
    #[error("not found: {0}")]
    NotFound(String),

    /// The transfer ended in a state that has no better classification.
    #[error("{site}: {message}")]
    Transfer { site: &'static str, message: String },
}

impl Error {
    pub(crate) fn transport(site: &'static str, source: curl::Error) -> Self {
        Error::Transport { site, source }
    }

    pub(crate) fn multi(site: &'static str, source: curl::MultiError) -> Self {
        Error::Multi { site, source }
    }

    pub(crate) fn transfer(site: &'static str, message: impl Into<String>) -> Self {
        Error::Transfer {
            site,
            message: message.into(),
        }
    }

    /// The error kind of this failure.
    pub fn code(&self) -> Code {
        match self {
            Error::Response(e) => e.status(),
            Error::Transport { source, .. } => {
                if source.is_couldnt_connect()
                    || source.is_couldnt_resolve_host()
                    || source.is_couldnt_resolve_proxy()
                {
                    Code::Unavailable
                } else {
                    Code::Unknown
                }
            }
            Error::InvalidArgument(_) => Code::InvalidArgument,
            Error::NotFound(_) => Code::NotFound,
            Error::Multi { .. } | Error::SetOption { .. } | Error::TokenSource(_) | Error::Transfer { .. } => {
                Code::Unknown
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        // streams wrap our own errors into io::Error, unwrap them on the way back
        match e.get_ref().map(|inner| inner.is::<Error>()) {
            Some(true) => match e.into_inner().map(|inner| inner.downcast::<Error>()) {
                Some(Ok(inner)) => *inner,
                Some(Err(other)) => Error::transfer("io", other.to_string()),
                None => Error::transfer("io", "unknown I/O failure"),
            },
            _ => Error::transfer("io", e.to_string()),
        }
    }
}

/// Parses `text` as a JSON object into `T`. Non-object documents and type mismatches are
/// reported as `InvalidArgument`.
pub(crate) fn parse_json_object<T: DeserializeOwned>(text: &str) -> Result<T, Error> {
    let value: Value = serde_json::from_str(text).map_err(|e| Error::InvalidArgument(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::InvalidArgument(format!("expected a JSON object, got {}", text.trim())));
    }
    serde_json::from_value(value).map_err(|e| Error::InvalidArgument(e.to_string()))
}

/// Serializes `value` to compact JSON.
pub(crate) fn to_json_string<T: Serialize>(value: &T) -> String {
    // derived impls with string keyed maps cannot fail
    serde_json::to_string(value).unwrap_or_default()
}

pub(crate) trait Escape {
    fn escape(&self) -> String;
}

impl Escape for str {
    fn escape(&self) -> String {
        utf8_percent_encode(self, ENCODE_SET).to_string()
    }
}

const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'*').remove(b'-').remove(b'.').remove(b'_');

pub(crate) fn from_str_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: FromStr,
    T::Err: Display,
    D: Deserializer<'de>,
{
    let s: Result<Value, _> = Deserialize::deserialize(deserializer);
    match s {
        Ok(Value::String(s)) => T::from_str(&s).map_err(de::Error::custom).map(Some),
        Ok(Value::Number(num)) => T::from_str(&num.to_string()).map_err(de::Error::custom).map(Some),
        Ok(Value::Null) => Ok(None),
        Ok(_) => Err(de::Error::custom("Incorrect type")),
        Err(_) => Ok(None),
    }
}

pub(crate) fn from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: FromStr,
    T::Err: Display,
    D: de::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => T::from_str(&s).map_err(de::Error::custom),
        Value::Number(num) => T::from_str(&num.to_string()).map_err(de::Error::custom),
        _ => Err(de::Error::custom("Incorrect type")),
    }
}

/// int64 values travel as decimal strings.
pub(crate) fn to_str<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

pub(crate) fn to_str_option<T: Display, S: Serializer>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.collect_str(v),
        None => serializer.serialize_none(),
    }
}

pub(crate) fn is_i64_zero(num: &i64) -> bool {
    *num == 0
}

/// RFC 3339 timestamps, normalized to UTC on the way in and written with a `Z` suffix.
pub(crate) mod rfc3339 {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::{OffsetDateTime, UtcOffset};

    pub fn serialize<S: Serializer>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => {
                let text = v
                    .to_offset(UtcOffset::UTC)
                    .format(&Rfc3339)
                    .map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => OffsetDateTime::parse(&text, &Rfc3339)
                .map(|v| Some(v.to_offset(UtcOffset::UTC)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Calendar dates in `YYYY-MM-DD` form.
pub(crate) mod date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::FormatItem;
    use time::macros::format_description;
    use time::Date;

    pub(crate) const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

    pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_str(&v.format(FORMAT).map_err(serde::ser::Error::custom)?),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            // full timestamps are accepted too, only the date part is kept
            Some(text) => Date::parse(text.get(..10).unwrap_or(text.as_str()), FORMAT)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Formats an optional timestamp for diagnostics.
pub(crate) fn format_timestamp(value: &time::OffsetDateTime) -> String {
    value
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}
