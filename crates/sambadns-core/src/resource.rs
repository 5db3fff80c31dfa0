// # Record Resource Lifecycle
//
// What an orchestration host does with one managed record, built on the
// RecordSynchronizer:
//
// - create, then read back computed fields (TTL, stored value)
// - read by composite ID; absence means "drop from state"
// - update by re-querying the stored value, deleting it, creating the new one
// - delete by re-querying the stored value and deleting exactly that
// - import by ID, and a data-source style lookup that requires presence
//
// State is returned to the caller as a `ResourceState` value. Persisting it
// is the host's job.

use crate::error::{Error, Result};
use crate::normalize::values_equivalent;
use crate::record::{DnsRecord, RecordId, RecordType};
use crate::sync::RecordSynchronizer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// The desired configuration of a managed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    /// DNS server hostname (e.g. `dc1.example.com`)
    pub dns_server: String,
    /// Zone name (e.g. `example.com`)
    pub zone: String,
    /// Record name; `*` for wildcards (e.g. `*.myapp`)
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Record value in samba-tool's input encoding (MX: `host priority`)
    pub value: String,
}

impl RecordSpec {
    /// Identity of the record this spec manages
    pub fn id(&self) -> RecordId {
        RecordId::new(&self.dns_server, &self.zone, &self.name, self.record_type)
    }
}

/// The state an orchestration host persists for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Composite identity `server/zone/name/TYPE`
    pub id: String,
    /// DNS server hostname
    pub dns_server: String,
    /// Zone name
    pub zone: String,
    /// Record name
    pub name: String,
    /// Record type
    pub record_type: RecordType,
    /// Value as the server stores it
    pub value: String,
    /// TTL in seconds, as reported by the server
    pub ttl: u32,
}

impl ResourceState {
    /// Parse the stored composite ID
    pub fn record_id(&self) -> Result<RecordId> {
        self.id.parse()
    }
}

impl From<DnsRecord> for ResourceState {
    fn from(record: DnsRecord) -> Self {
        Self {
            id: record.id().to_string(),
            dns_server: record.server,
            zone: record.zone,
            name: record.name,
            record_type: record.record_type,
            value: record.value,
            ttl: record.ttl,
        }
    }
}

/// True when a change from `old` to `new` should not be treated as a diff.
///
/// Covers the cases where the server echoes a value in a different form
/// than it was configured: expanded IPv6 addresses and trailing dots on
/// CNAME/PTR targets.
pub fn suppress_value_diff(record_type: RecordType, old: &str, new: &str) -> bool {
    values_equivalent(record_type, old, new)
}

/// Resource lifecycle operations over a synchronizer
pub struct RecordResource<'a> {
    sync: &'a RecordSynchronizer,
}

impl<'a> RecordResource<'a> {
    /// Wrap a synchronizer
    pub fn new(sync: &'a RecordSynchronizer) -> Self {
        Self { sync }
    }

    /// Create the record and read back its stored state
    pub async fn create(&self, spec: &RecordSpec) -> Result<ResourceState> {
        let id = spec.id();
        self.sync.create(&id.record(&spec.value)).await?;

        self.read(&id).await?.ok_or_else(|| {
            Error::not_found(format!("{id} was created but is not present on read-back"))
        })
    }

    /// Read the current state of a record.
    ///
    /// `Ok(None)` means the record is gone from the server and the host
    /// should remove it from its state.
    pub async fn read(&self, id: &RecordId) -> Result<Option<ResourceState>> {
        let current = self.sync.query(id).await?;
        if current.is_none() {
            warn!("DNS record {} no longer exists on the server", id);
        }
        Ok(current.map(ResourceState::from))
    }

    /// Change the value of a managed record.
    ///
    /// The value to delete is taken from a fresh query rather than from
    /// `state`, since the server may hold it in a different encoding (MX,
    /// TXT). If the record is gone from the server, it is created again.
    /// If the server already holds an equivalent value, nothing is changed.
    pub async fn update(&self, state: &ResourceState, new_value: &str) -> Result<ResourceState> {
        let id = state.record_id()?;

        if suppress_value_diff(id.record_type, &state.value, new_value) {
            if let Some(current) = self.read(&id).await? {
                debug!(
                    "DNS record {} value {:?} is equivalent to {:?}, no update needed",
                    id, state.value, new_value
                );
                return Ok(current);
            }
            info!("DNS record {} disappeared from the server, recreating it", id);
        }

        let desired = id.record(new_value);
        match self.sync.query(&id).await? {
            Some(current) if values_equivalent(id.record_type, &current.value, new_value) => {
                debug!("DNS record {} already holds {:?}", id, current.value);
            }
            Some(current) => {
                self.sync.update(&current, &desired).await?;
            }
            None => {
                info!("DNS record {} is already absent, creating it", id);
                self.sync.create(&desired).await?;
            }
        }

        self.read(&id).await?.ok_or_else(|| {
            Error::not_found(format!("{id} was updated but is not present on read-back"))
        })
    }

    /// Delete a managed record using the value the server actually stores
    pub async fn delete(&self, state: &ResourceState) -> Result<()> {
        let id = state.record_id()?;

        let Some(current) = self.sync.query(&id).await? else {
            debug!("DNS record {} already absent, nothing to delete", id);
            return Ok(());
        };

        self.sync.delete(&current).await?;
        Ok(())
    }

    /// Adopt an existing record by its composite ID
    pub async fn import(&self, id: &str) -> Result<ResourceState> {
        let id: RecordId = id.parse()?;
        self.read(&id)
            .await?
            .ok_or_else(|| Error::not_found(format!("cannot import {id}: record does not exist")))
    }

    /// Look up a record that must exist
    pub async fn lookup(
        &self,
        server: &str,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<ResourceState> {
        let id = RecordId::new(server, zone, name, record_type);
        self.sync
            .query(&id)
            .await?
            .map(ResourceState::from)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "record not found: {name} {record_type} in zone {zone}"
                ))
            })
    }
}
