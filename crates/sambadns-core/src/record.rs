// # DNS Record Model
//
// The single entity the core works with, plus its record type enumeration
// and the composite identity string handed to the orchestration layer.
//
// ## Value encoding
//
// `DnsRecord::value` is always in samba-tool's *native* text encoding, never
// a canonical form. A record returned from a query can be passed straight
// back to delete or update. Canonical forms exist only for comparison
// (see `crate::normalize`).

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TTL assumed when the listing carries no `ttl=` field
pub const DEFAULT_TTL: u32 = 3600;

/// Record types the core can manage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Text
    Txt,
    /// Mail exchanger
    Mx,
    /// Pointer
    Ptr,
    /// Service locator
    Srv,
    /// Name server
    Ns,
}

impl RecordType {
    /// Every supported type, in the order they are documented
    pub const ALL: [RecordType; 8] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Txt,
        RecordType::Mx,
        RecordType::Ptr,
        RecordType::Srv,
        RecordType::Ns,
    ];

    /// Upper-case name, as samba-tool expects and prints it
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
            RecordType::Mx => "MX",
            RecordType::Ptr => "PTR",
            RecordType::Srv => "SRV",
            RecordType::Ns => "NS",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.trim().to_ascii_uppercase();
        RecordType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| {
                Error::invalid_input(format!(
                    "unsupported record type {s:?} (expected one of A, AAAA, CNAME, TXT, MX, PTR, SRV, NS)"
                ))
            })
    }
}

/// A DNS record as samba-tool sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// DNS server hostname
    pub server: String,
    /// Zone name
    pub zone: String,
    /// Record name within the zone; `@` for the apex, may contain `*`
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Record data in samba-tool's native encoding
    pub value: String,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl DnsRecord {
    /// Create a record with the default TTL
    pub fn new(
        server: impl Into<String>,
        zone: impl Into<String>,
        name: impl Into<String>,
        record_type: RecordType,
        value: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            zone: zone.into(),
            name: name.into(),
            record_type,
            value: value.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Identity of this record (value and TTL are not part of it)
    pub fn id(&self) -> RecordId {
        RecordId::new(&self.server, &self.zone, &self.name, self.record_type)
    }
}

/// Identity key of a managed record: `(server, zone, name, type)`
///
/// Rendered as `server/zone/name/TYPE`. Parsing splits on `/` into at most
/// four parts, so a zone or name containing `/` does not round-trip. No
/// escaping scheme is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    /// DNS server hostname
    pub server: String,
    /// Zone name
    pub zone: String,
    /// Record name
    pub name: String,
    /// Record type
    pub record_type: RecordType,
}

impl RecordId {
    /// Create a record identity
    pub fn new(
        server: impl Into<String>,
        zone: impl Into<String>,
        name: impl Into<String>,
        record_type: RecordType,
    ) -> Self {
        Self {
            server: server.into(),
            zone: zone.into(),
            name: name.into(),
            record_type,
        }
    }

    /// Build a record with this identity and the given value
    pub fn record(&self, value: impl Into<String>) -> DnsRecord {
        DnsRecord::new(
            &self.server,
            &self.zone,
            &self.name,
            self.record_type,
            value,
        )
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.server, self.zone, self.name, self.record_type
        )
    }
}

impl FromStr for RecordId {
    type Err = Error;

    fn from_str(id: &str) -> Result<Self> {
        let parts: Vec<&str> = id.splitn(4, '/').collect();
        let [server, zone, name, record_type] = parts.as_slice() else {
            return Err(Error::invalid_input(format!(
                "invalid ID format: {id} (expected server/zone/name/type)"
            )));
        };

        Ok(Self {
            server: (*server).to_string(),
            zone: (*zone).to_string(),
            name: (*name).to_string(),
            record_type: record_type.parse()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_is_case_insensitive() {
        assert_eq!("cname".parse::<RecordType>().unwrap(), RecordType::Cname);
        assert_eq!("Aaaa".parse::<RecordType>().unwrap(), RecordType::Aaaa);
        assert_eq!(RecordType::Mx.to_string(), "MX");
    }

    #[test]
    fn test_record_type_rejects_unknown() {
        let err = "SOA".parse::<RecordType>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_record_type_serializes_upper_case() {
        let json = serde_json::to_string(&RecordType::Aaaa).unwrap();
        assert_eq!(json, "\"AAAA\"");
    }

    #[test]
    fn test_id_round_trip() {
        let id = RecordId::new("dc1.example.com", "example.com", "*.app", RecordType::Cname);
        let rendered = id.to_string();
        assert_eq!(rendered, "dc1.example.com/example.com/*.app/CNAME");
        assert_eq!(rendered.parse::<RecordId>().unwrap(), id);
    }

    #[test]
    fn test_id_type_is_normalized_on_parse() {
        let id: RecordId = "dc1/example.com/@/mx".parse().unwrap();
        assert_eq!(id.record_type, RecordType::Mx);
        assert_eq!(id.to_string(), "dc1/example.com/@/MX");
    }

    #[test]
    fn test_id_needs_four_parts() {
        assert!("dc1/example.com/www".parse::<RecordId>().is_err());
        assert!("".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_id_with_slash_in_name_is_misparsed() {
        // Extra separators land in the last component, which then fails to
        // parse as a record type.
        assert!("dc1/example.com/a/b/A".parse::<RecordId>().is_err());
    }

    #[test]
    fn test_new_record_has_default_ttl() {
        let record = DnsRecord::new("dc1", "example.com", "www", RecordType::A, "10.0.0.1");
        assert_eq!(record.ttl, DEFAULT_TTL);
        assert_eq!(record.with_ttl(60).ttl, 60);
    }
}
