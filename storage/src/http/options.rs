//! Optional request parameters.
//!
//! Every request type carries a [`RequestOptions`] pack. Options are either query parameters or
//! request headers, and setting an option of a kind already present replaces the earlier value.

use std::fmt;

use base64::prelude::*;
use sha2::{Digest, Sha256};

use crate::http::bucket_access_controls::PredefinedBucketAcl;
use crate::http::curl_request_builder::CurlRequestBuilder;
use crate::http::object_access_controls::PredefinedObjectAcl;

/// Where an option is placed on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OptionTarget {
    Query,
    Header,
}

/// A set of properties to return in a response.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Projection {
    /// Omit `owner`, `acl`, and `defaultObjectAcl` properties.
    NoAcl,
    /// Include all properties.
    Full,
}

impl Projection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Projection::NoAcl => "noAcl",
            Projection::Full => "full",
        }
    }
}

/// A customer-supplied encryption key.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKeyData {
    pub algorithm: String,
    /// base64 of the raw key
    pub key: String,
    /// base64 of the SHA-256 of the raw key
    pub sha256: String,
}

impl EncryptionKeyData {
    /// Builds an AES256 key description from raw key bytes.
    pub fn from_binary_key(key: &[u8]) -> Self {
        Self {
            algorithm: "AES256".to_string(),
            key: BASE64_STANDARD.encode(key),
            sha256: BASE64_STANDARD.encode(Sha256::digest(key)),
        }
    }
}

impl fmt::Debug for EncryptionKeyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionKeyData")
            .field("algorithm", &self.algorithm)
            .field("sha256", &self.sha256)
            .finish_non_exhaustive()
    }
}

/// One optional request parameter.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum RequestOption {
    /// Selects a specific revision of an object.
    Generation(i64),
    IfGenerationMatch(i64),
    IfGenerationNotMatch(i64),
    IfMetagenerationMatch(i64),
    IfMetagenerationNotMatch(i64),
    IfSourceGenerationMatch(i64),
    IfSourceGenerationNotMatch(i64),
    IfSourceMetagenerationMatch(i64),
    IfSourceMetagenerationNotMatch(i64),
    /// The project to be billed for this request. Required for Requester Pays buckets.
    UserProject(String),
    Projection(Projection),
    /// Selector specifying which fields to include in a partial response.
    Fields(String),
    QuotaUser(String),
    Prefix(String),
    Delimiter(String),
    MaxResults(i64),
    /// List all revisions of an object instead of the live version only.
    Versions(bool),
    PredefinedAcl(PredefinedObjectAcl),
    PredefinedBucketAcl(PredefinedBucketAcl),
    PredefinedDefaultObjectAcl(PredefinedObjectAcl),
    /// `If-Match` entity tag precondition.
    IfMatchEtag(String),
    /// `If-None-Match` entity tag precondition.
    IfNoneMatchEtag(String),
    ContentType(String),
    EncryptionKey(EncryptionKeyData),
    /// Range of bytes to download, see [`crate::http::objects::download::Range`].
    Range(crate::http::objects::download::Range),
}

impl RequestOption {
    pub fn target(&self) -> OptionTarget {
        match self {
            RequestOption::IfMatchEtag(_)
            | RequestOption::IfNoneMatchEtag(_)
            | RequestOption::ContentType(_)
            | RequestOption::EncryptionKey(_)
            | RequestOption::Range(_) => OptionTarget::Header,
            _ => OptionTarget::Query,
        }
    }

    /// The query parameter or header name.
    pub fn name(&self) -> &'static str {
        match self {
            RequestOption::Generation(_) => "generation",
            RequestOption::IfGenerationMatch(_) => "ifGenerationMatch",
            RequestOption::IfGenerationNotMatch(_) => "ifGenerationNotMatch",
            RequestOption::IfMetagenerationMatch(_) => "ifMetagenerationMatch",
            RequestOption::IfMetagenerationNotMatch(_) => "ifMetagenerationNotMatch",
            RequestOption::IfSourceGenerationMatch(_) => "ifSourceGenerationMatch",
            RequestOption::IfSourceGenerationNotMatch(_) => "ifSourceGenerationNotMatch",
            RequestOption::IfSourceMetagenerationMatch(_) => "ifSourceMetagenerationMatch",
            RequestOption::IfSourceMetagenerationNotMatch(_) => "ifSourceMetagenerationNotMatch",
            RequestOption::UserProject(_) => "userProject",
            RequestOption::Projection(_) => "projection",
            RequestOption::Fields(_) => "fields",
            RequestOption::QuotaUser(_) => "quotaUser",
            RequestOption::Prefix(_) => "prefix",
            RequestOption::Delimiter(_) => "delimiter",
            RequestOption::MaxResults(_) => "maxResults",
            RequestOption::Versions(_) => "versions",
            RequestOption::PredefinedAcl(_) | RequestOption::PredefinedBucketAcl(_) => "predefinedAcl",
            RequestOption::PredefinedDefaultObjectAcl(_) => "predefinedDefaultObjectAcl",
            RequestOption::IfMatchEtag(_) => "If-Match",
            RequestOption::IfNoneMatchEtag(_) => "If-None-Match",
            RequestOption::ContentType(_) => "Content-Type",
            RequestOption::EncryptionKey(_) => "x-goog-encryption-key",
            RequestOption::Range(_) => "Range",
        }
    }

    /// The wire value. Encryption keys have no single value, see [`RequestOption::headers`].
    pub fn value(&self) -> String {
        match self {
            RequestOption::Generation(v)
            | RequestOption::IfGenerationMatch(v)
            | RequestOption::IfGenerationNotMatch(v)
            | RequestOption::IfMetagenerationMatch(v)
            | RequestOption::IfMetagenerationNotMatch(v)
            | RequestOption::IfSourceGenerationMatch(v)
            | RequestOption::IfSourceGenerationNotMatch(v)
            | RequestOption::IfSourceMetagenerationMatch(v)
            | RequestOption::IfSourceMetagenerationNotMatch(v)
            | RequestOption::MaxResults(v) => v.to_string(),
            RequestOption::UserProject(v)
            | RequestOption::Fields(v)
            | RequestOption::QuotaUser(v)
            | RequestOption::Prefix(v)
            | RequestOption::Delimiter(v)
            | RequestOption::IfMatchEtag(v)
            | RequestOption::IfNoneMatchEtag(v)
            | RequestOption::ContentType(v) => v.clone(),
            RequestOption::Versions(v) => v.to_string(),
            RequestOption::Projection(v) => v.as_str().to_string(),
            RequestOption::PredefinedAcl(v) | RequestOption::PredefinedDefaultObjectAcl(v) => v.as_str().to_string(),
            RequestOption::PredefinedBucketAcl(v) => v.as_str().to_string(),
            RequestOption::EncryptionKey(v) => v.sha256.clone(),
            RequestOption::Range(v) => v.header_value(),
        }
    }

    /// Header lines contributed by a header option.
    pub fn headers(&self) -> Vec<String> {
        match self {
            RequestOption::EncryptionKey(key) => vec![
                format!("x-goog-encryption-algorithm: {}", key.algorithm),
                format!("x-goog-encryption-key: {}", key.key),
                format!("x-goog-encryption-key-sha256: {}", key.sha256),
            ],
            RequestOption::Range(range) if range.header_value().is_empty() => vec![],
            _ if self.target() == OptionTarget::Header => vec![format!("{}: {}", self.name(), self.value())],
            _ => vec![],
        }
    }
}

impl fmt::Display for RequestOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.target()) {
            // never print the key itself
            (RequestOption::EncryptionKey(key), _) => write!(
                f,
                "x-goog-encryption-algorithm: {}, x-goog-encryption-key-sha256: {}",
                key.algorithm, key.sha256
            ),
            (_, OptionTarget::Query) => write!(f, "{}={}", self.name(), self.value()),
            (_, OptionTarget::Header) => write!(f, "{}: {}", self.name(), self.value()),
        }
    }
}

/// The options attached to a request, in insertion order with at most one option per kind.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct RequestOptions {
    options: Vec<RequestOption>,
}

impl RequestOptions {
    /// Stores `option`. An option with the same wire name is replaced in place.
    pub fn set(&mut self, option: RequestOption) {
        match self
            .options
            .iter_mut()
            .find(|existing| existing.target() == option.target() && existing.name() == option.name())
        {
            Some(slot) => *slot = option,
            None => self.options.push(option),
        }
    }

    pub fn set_multiple_options(&mut self, options: impl IntoIterator<Item = RequestOption>) {
        for option in options {
            self.set(option);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestOption> {
        self.options.iter()
    }

    /// Finds the first option matching `predicate`.
    pub fn find(&self, predicate: impl Fn(&RequestOption) -> bool) -> Option<&RequestOption> {
        self.options.iter().find(|o| predicate(o))
    }

    /// Adds all query options to `builder`.
    pub fn apply_query(&self, builder: &mut CurlRequestBuilder) {
        for option in self.options.iter().filter(|o| o.target() == OptionTarget::Query) {
            builder.add_query_parameter(option.name(), &option.value());
        }
    }

    /// Adds all header options to `builder`.
    pub fn apply_headers(&self, builder: &mut CurlRequestBuilder) {
        for option in self.options.iter().filter(|o| o.target() == OptionTarget::Header) {
            for header in option.headers() {
                builder.add_header(header);
            }
        }
    }
}

impl RequestOptions {
    /// Writes `, name=value` for each option, the tail of a request's diagnostic form.
    pub fn dump(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for option in &self.options {
            write!(f, ", {option}")?;
        }
        Ok(())
    }
}

impl fmt::Display for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{option}")?;
        }
        Ok(())
    }
}

impl<const N: usize> From<[RequestOption; N]> for RequestOptions {
    fn from(options: [RequestOption; N]) -> Self {
        let mut result = RequestOptions::default();
        result.set_multiple_options(options);
        result
    }
}

/// Adds the option setters shared by every request type. The type needs an
/// `options: RequestOptions` field.
macro_rules! impl_request_options {
    ($($request:ty),+ $(,)?) => {$(
        impl $request {
            /// Sets an option, replacing an earlier option of the same kind.
            pub fn set_option(&mut self, option: $crate::http::options::RequestOption) -> &mut Self {
                self.options.set(option);
                self
            }

            pub fn with_option(mut self, option: $crate::http::options::RequestOption) -> Self {
                self.options.set(option);
                self
            }

            pub fn set_multiple_options(
                &mut self,
                options: impl IntoIterator<Item = $crate::http::options::RequestOption>,
            ) -> &mut Self {
                self.options.set_multiple_options(options);
                self
            }

            pub fn options(&self) -> &$crate::http::options::RequestOptions {
                &self.options
            }
        }
    )+};
}

pub(crate) use impl_request_options;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_wins_in_place() {
        let mut options = RequestOptions::default();
        options.set_multiple_options([
            RequestOption::Generation(1),
            RequestOption::UserProject("p1".to_string()),
            RequestOption::IfMetagenerationMatch(3),
            RequestOption::Generation(7),
        ]);
        assert_eq!(
            options.to_string(),
            "generation=7, userProject=p1, ifMetagenerationMatch=3"
        );
    }

    #[test]
    fn headers_render_with_colon() {
        let options = RequestOptions::from([
            RequestOption::IfMatchEtag("abc".to_string()),
            RequestOption::Prefix("logs/".to_string()),
        ]);
        assert_eq!(options.to_string(), "If-Match: abc, prefix=logs/");
    }

    #[test]
    fn encryption_key_is_not_printed() {
        let key = EncryptionKeyData::from_binary_key(&[7u8; 32]);
        let option = RequestOption::EncryptionKey(key.clone());
        let text = option.to_string();
        assert!(text.contains("AES256"));
        assert!(text.contains(&key.sha256));
        assert!(!text.contains(&key.key));
        assert!(!format!("{key:?}").contains(&key.key));
        assert_eq!(option.headers().len(), 3);
        assert_eq!(key.key, BASE64_STANDARD.encode([7u8; 32]));
    }

    #[test]
    fn predefined_acl_names() {
        assert_eq!(
            RequestOption::PredefinedAcl(PredefinedObjectAcl::BucketOwnerRead).to_string(),
            "predefinedAcl=bucketOwnerRead"
        );
        assert_eq!(
            RequestOption::PredefinedDefaultObjectAcl(PredefinedObjectAcl::PublicRead).to_string(),
            "predefinedDefaultObjectAcl=publicRead"
        );
        assert_eq!(
            RequestOption::PredefinedBucketAcl(PredefinedBucketAcl::PublicReadWrite).to_string(),
            "predefinedAcl=publicReadWrite"
        );
        assert_eq!(RequestOption::Projection(Projection::Full).to_string(), "projection=full");
        assert_eq!(RequestOption::Versions(true).to_string(), "versions=true");
    }

    #[test]
    fn predefined_acl_kinds_share_one_slot() {
        let options = RequestOptions::from([
            RequestOption::UserProject("p".to_string()),
            RequestOption::PredefinedAcl(PredefinedObjectAcl::Private),
            RequestOption::PredefinedBucketAcl(PredefinedBucketAcl::PublicReadWrite),
        ]);
        assert_eq!(options.iter().count(), 2);
        assert_eq!(options.to_string(), "userProject=p, predefinedAcl=publicReadWrite");
    }
}
