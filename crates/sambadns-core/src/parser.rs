//! `samba-tool dns query` output parser
//!
//! The listing is free text, one record per line under a name header:
//!
//! ```text
//!   Name=*, Records=1, Children=0
//!     CNAME: target.example.com (flags=600000f0, serial=123, ttl=3600)
//!     MX: mail.example.com. (10) (flags=f0, serial=0, ttl=900)
//! ```
//!
//! The parser only recognizes these shapes. Anything else is a
//! [`Error::Parse`], so a change in the tool's output format shows up as an
//! error instead of a wrong value.

use crate::error::{Error, Result};
use crate::record::{DEFAULT_TTL, DnsRecord, RecordType};

/// Extract the `record_type` record from a query listing.
///
/// The returned value is in samba-tool's native encoding (MX is reshaped to
/// `host prio`), ready to be passed back to delete.
pub fn parse_query_output(
    output: &str,
    server: &str,
    zone: &str,
    name: &str,
    record_type: RecordType,
) -> Result<DnsRecord> {
    let prefix = format!("{}:", record_type.as_str());

    let Some(line) = output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(&prefix))
    else {
        return Err(Error::parse(format!(
            "record type {record_type} not found in output"
        )));
    };

    let after_type = line[prefix.len()..].trim();
    let Some(paren) = after_type.find('(') else {
        return Err(Error::parse(format!("unexpected output format: {line}")));
    };
    let (raw_value, rest) = after_type.split_at(paren);

    let value = record_type
        .strategy()
        .from_listing(raw_value.trim(), rest)?;
    let ttl = scan_ttl(rest)?.unwrap_or(DEFAULT_TTL);

    tracing::debug!(
        "Parsed {} record for {} in {}: {:?} (ttl={})",
        record_type,
        name,
        zone,
        value,
        ttl
    );

    Ok(DnsRecord {
        server: server.to_string(),
        zone: zone.to_string(),
        name: name.to_string(),
        record_type,
        value,
        ttl,
    })
}

/// Find `ttl=<digits>` in the annotation part of a listing line.
///
/// No `ttl=` at all is `None`. A `ttl=` without a `u32` after it is a
/// parse error.
fn scan_ttl(text: &str) -> Result<Option<u32>> {
    let Some((_, after)) = text.split_once("ttl=") else {
        return Ok(None);
    };
    let end = after
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after.len());
    after[..end]
        .parse()
        .map(Some)
        .map_err(|_| Error::parse(format!("invalid ttl in listing: {text:?}")))
}
