//! URL rules for `gopher://host[:port]/<type><selector>` addresses.

use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

pub const SCHEME: &str = "gopher://";
pub const DEFAULT_PORT: &str = "70";
/// Item type assumed when a URL has no path.
pub const DEFAULT_ITEM_TYPE: char = '1';

/// Selector bytes escaped in URLs. Non-ASCII bytes are always escaped, so any
/// selector a server advertises survives the trip through a URL unchanged.
const SELECTOR_ESCAPES: &AsciiSet = &CONTROLS.add(b'%');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("invalid address: {0}")]
    Invalid(String),
    #[error("address has no host")]
    MissingHost,
}

/// A URL split into the parts needed to open a connection and request a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub host: String,
    pub port: String,
    pub item_type: char,
    /// Raw selector bytes, percent-decoded from the URL.
    pub selector: Vec<u8>,
}

impl Address {
    pub fn parse(url: &str) -> Result<Self, AddressError> {
        let remote = strip_scheme(url);
        let (authority, path) = match remote.split_once('/') {
            Some((authority, path)) => (authority, Some(path)),
            None => (remote, None),
        };
        let (host, port) = split_authority(authority);
        if host.is_empty() {
            return Err(AddressError::MissingHost);
        }

        let mut chars = path.unwrap_or_default().chars();
        let item_type = chars.next().unwrap_or(DEFAULT_ITEM_TYPE);
        Ok(Self {
            host: host.to_string(),
            port: port.unwrap_or(DEFAULT_PORT).to_string(),
            item_type,
            selector: decode_selector(chars.as_str()),
        })
    }

    /// The protocol request: the selector followed by exactly one CR-LF.
    pub fn request_line(&self) -> Vec<u8> {
        let mut line = Vec::with_capacity(self.selector.len() + 2);
        line.extend_from_slice(&self.selector);
        line.extend_from_slice(b"\r\n");
        line
    }
}

fn split_authority(authority: &str) -> (&str, Option<&str>) {
    if let Some(bracketed) = authority.strip_prefix('[') {
        return match bracketed.split_once(']') {
            Some((host, rest)) => (host, rest.strip_prefix(':').filter(|p| !p.is_empty())),
            None => (bracketed, None),
        };
    }
    match authority.split_once(':') {
        Some((host, port)) if !port.is_empty() => (host, Some(port)),
        Some((host, _)) => (host, None),
        None => (authority, None),
    }
}

pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix(SCHEME).unwrap_or(url)
}

/// Makes a selector absolute.
pub fn normalize_selector(selector: &[u8]) -> Vec<u8> {
    if selector.starts_with(b"/") {
        selector.to_vec()
    } else {
        let mut absolute = Vec::with_capacity(selector.len() + 1);
        absolute.push(b'/');
        absolute.extend_from_slice(selector);
        absolute
    }
}

/// URL form of raw selector bytes.
pub fn encode_selector(selector: &[u8]) -> String {
    percent_encode(selector, SELECTOR_ESCAPES).to_string()
}

/// Raw selector bytes of the URL form; malformed escapes are kept literally.
pub fn decode_selector(encoded: &str) -> Vec<u8> {
    percent_decode_str(encoded).collect()
}

/// Builds `gopher://host[:port]/<type><selector>`, omitting the default port.
pub fn build_url(host: &str, port: &str, item_type: char, selector: &[u8]) -> String {
    let selector = encode_selector(selector);
    if port == DEFAULT_PORT {
        format!("{SCHEME}{host}/{item_type}{selector}")
    } else {
        format!("{SCHEME}{host}:{port}/{item_type}{selector}")
    }
}

/// Item type of a URL: the character after the first `/` following the host.
pub fn item_type_of(url: &str) -> char {
    strip_scheme(url)
        .split_once('/')
        .and_then(|(_, path)| path.chars().next())
        .unwrap_or(DEFAULT_ITEM_TYPE)
}

/// Normalizes address-bar input into a full URL.
pub fn normalize_input(input: &str) -> Result<String, AddressError> {
    let trimmed = input.trim();
    let candidate = if trimmed.starts_with(SCHEME) {
        trimmed.to_string()
    } else {
        format!("{SCHEME}{trimmed}")
    };

    let parsed =
        url::Url::parse(&candidate).map_err(|err| AddressError::Invalid(err.to_string()))?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(candidate),
        _ => Err(AddressError::MissingHost),
    }
}

/// Parent directory of `url`, or `None` when there is nothing above it.
///
/// `gopher://h/1/a/b` goes to `gopher://h/1/a`; `gopher://h/1/a` goes to the
/// host root `gopher://h`.
pub fn parent_url(url: &str) -> Option<String> {
    let remote = strip_scheme(url);
    let (authority, path) = remote.split_once('/')?;
    let mut chars = path.chars();
    chars.next()?;
    let selector = chars.as_str();
    if selector.is_empty() {
        return None;
    }

    let root = format!("{SCHEME}{authority}");
    match selector.rfind('/') {
        Some(cut) if cut > 0 => Some(format!("{root}/1{}", &selector[..cut])),
        _ => Some(root),
    }
}

/// URL for a search item: the query travels after a tab in the selector.
pub fn search_url(base_url: &str, query: &str) -> String {
    format!("{base_url}\t{}", encode_selector(query.as_bytes()))
}
