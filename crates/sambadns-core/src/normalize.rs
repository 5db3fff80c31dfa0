//! Per-record-type value strategies
//!
//! samba-tool speaks a different text encoding per record type, and the
//! encoding it prints on query is not always the one it accepts back:
//!
//! | Type        | Query prints                      | Delete wants        | Compared as            |
//! |-------------|-----------------------------------|---------------------|------------------------|
//! | AAAA        | any valid IPv6 text               | as stored           | fully expanded address |
//! | CNAME / PTR | FQDN, usually with trailing dot   | as stored           | trailing dot stripped  |
//! | MX          | `host. (prio)`                    | `host prio`         | raw                    |
//! | TXT         | `"seg1","seg2"`                   | `'seg1' 'seg2'`     | raw                    |
//! | others      | as stored                         | as stored           | raw                    |
//!
//! Each row is one [`ValueStrategy`]; [`RecordType::strategy`] picks it.
//! Canonical forms are only ever used for comparison and are never sent to
//! the tool.

use crate::error::{Error, Result};
use crate::record::RecordType;
use std::borrow::Cow;
use std::net::Ipv6Addr;

/// How one record type's values are read, compared and deleted
pub trait ValueStrategy: Send + Sync {
    /// Comparable form of a value
    fn canonical<'a>(&self, value: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(value)
    }

    /// Encoding `dns delete` needs for a stored value
    fn delete_encoding<'a>(&self, value: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(value)
    }

    /// Rebuild the native value from a listing line.
    ///
    /// `value` is the text between the type prefix and the first `(`,
    /// `rest` is everything from that `(` to the end of the line.
    fn from_listing(&self, value: &str, _rest: &str) -> Result<String> {
        Ok(value.to_string())
    }
}

/// Values compared and sent exactly as written
pub struct Verbatim;

impl ValueStrategy for Verbatim {}

/// IPv6 addresses, compared in fully expanded form
pub struct Ipv6Address;

impl ValueStrategy for Ipv6Address {
    fn canonical<'a>(&self, value: &'a str) -> Cow<'a, str> {
        Cow::Owned(normalize_ipv6(value))
    }
}

/// Host names that may or may not carry the root dot
pub struct TargetName;

impl ValueStrategy for TargetName {
    fn canonical<'a>(&self, value: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(trim_trailing_dot(value))
    }
}

/// Mail exchangers: listed as `host. (prio)`, managed as `host prio`
pub struct MailExchange;

impl ValueStrategy for MailExchange {
    fn from_listing(&self, value: &str, rest: &str) -> Result<String> {
        let priority = leading_priority(rest.trim_start()).ok_or_else(|| {
            Error::parse(format!("malformed MX priority group in listing: {rest:?}"))
        })?;
        Ok(format!("{} {}", trim_trailing_dot(value), priority))
    }
}

/// TXT segments: listed as `"a","b"`, deleted as `'a' 'b'`
pub struct TextSegments;

impl ValueStrategy for TextSegments {
    fn delete_encoding<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if value.contains(',') {
            Cow::Owned(format_txt_for_delete(value))
        } else {
            Cow::Borrowed(value)
        }
    }
}

impl RecordType {
    /// The value strategy for this type
    pub fn strategy(self) -> &'static dyn ValueStrategy {
        match self {
            RecordType::Aaaa => &Ipv6Address,
            RecordType::Cname | RecordType::Ptr => &TargetName,
            RecordType::Mx => &MailExchange,
            RecordType::Txt => &TextSegments,
            RecordType::A | RecordType::Srv | RecordType::Ns => &Verbatim,
        }
    }
}

/// True when two values denote the same record for this type
pub fn values_equivalent(record_type: RecordType, a: &str, b: &str) -> bool {
    let strategy = record_type.strategy();
    strategy.canonical(a) == strategy.canonical(b)
}

/// Expand an IPv6 address to eight zero-padded lower-case groups.
///
/// IPv4-mapped addresses and anything that does not parse as IPv6 come back
/// unchanged.
///
/// `2001:db8::1` becomes `2001:0db8:0000:0000:0000:0000:0000:0001`.
pub fn normalize_ipv6(value: &str) -> String {
    let Ok(addr) = value.parse::<Ipv6Addr>() else {
        return value.to_string();
    };
    if addr.to_ipv4_mapped().is_some() {
        return value.to_string();
    }

    addr.segments()
        .iter()
        .map(|segment| format!("{segment:04x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Strip exactly one trailing `.`
pub fn trim_trailing_dot(value: &str) -> &str {
    value.strip_suffix('.').unwrap_or(value)
}

/// Rewrite a queried TXT value into the form `dns delete` accepts.
///
/// `"v=spf1","~all"` becomes `'v=spf1' '~all'`.
pub fn format_txt_for_delete(value: &str) -> String {
    value
        .split(',')
        .map(|segment| format!("'{}'", segment.trim().trim_matches('"')))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Digits of a leading `(<digits>)` group
fn leading_priority(text: &str) -> Option<&str> {
    let inner = text.strip_prefix('(')?;
    let (digits, _) = inner.split_once(')')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits)
}
