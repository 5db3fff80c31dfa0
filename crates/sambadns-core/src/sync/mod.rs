//! Record synchronizer
//!
//! The RecordSynchronizer turns a declared [`DnsRecord`] into idempotent
//! `samba-tool dns` invocations:
//!
//! - **Create**: `dns add`; "already exists" is resolved by re-querying and
//!   comparing canonical values
//! - **Query**: `dns query`; "does not exist" is an absent result, not an error
//! - **Delete**: `dns delete`; "does not exist" counts as done
//! - **Update**: Delete(old) then Create(new)
//!
//! ## Architecture
//!
//! ```text
//!                 ┌────────────────────┐
//!                 │ RecordSynchronizer │
//!                 └────────────────────┘
//!                   │        ▲       │
//!          args     │        │ text  │ compare
//!                   ▼        │       ▼
//!         ┌─────────────────┐│ ┌──────────────┐
//!         │ CommandExecutor ││ │ValueStrategy │
//!         └─────────────────┘│ └──────────────┘
//!                   │        │
//!                   ▼        │
//!              samba-tool ───┴──► parser
//! ```
//!
//! ## Update is not atomic
//!
//! samba-tool has no multi-step transaction. Between the two phases of
//! [`RecordSynchronizer::update`] the record is absent, and if the create
//! phase fails it stays absent. The error then reports
//! [`UpdatePhase::Create`] (see [`Error::record_left_absent`]) and the caller
//! should retry only the create.
//!
//! Nothing here is cached or shared between calls: every operation derives
//! the situation from a fresh invocation.

use crate::error::{Error, Result, UpdatePhase, Verb};
use crate::failure::FailureKind;
use crate::normalize::values_equivalent;
use crate::parser::parse_query_output;
use crate::record::{DnsRecord, RecordId};
use crate::traits::CommandExecutor;
use tracing::{debug, info, warn};

/// Result of a create
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The record was added
    Created,
    /// An equivalent record was already there (no-op)
    AlreadyPresent {
        /// The value as stored on the server
        existing: String,
    },
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed
    Deleted,
    /// There was nothing to remove (no-op)
    AlreadyAbsent,
}

/// Result of a delete-then-create update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// What the delete phase did
    pub deleted: DeleteOutcome,
    /// What the create phase did
    pub created: CreateOutcome,
}

/// Orchestrates create/query/delete/update over one executor
///
/// ## Threading
///
/// The synchronizer holds no mutable state. It can be shared across tasks
/// and called concurrently; concurrent calls on the same key are arbitrated
/// by the DNS server, not here.
pub struct RecordSynchronizer {
    executor: Box<dyn CommandExecutor>,
}

impl RecordSynchronizer {
    /// Create a synchronizer over the given executor
    pub fn new(executor: Box<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Create a record.
    ///
    /// If the server reports the record already exists, the stored value is
    /// queried and compared under the type's canonical form. An equivalent
    /// value is success; anything else is [`Error::Conflict`].
    pub async fn create(&self, record: &DnsRecord) -> Result<CreateOutcome> {
        let id = record.id();
        info!("Creating DNS record {} -> {:?}", id, record.value);

        let err = match self.invoke(Verb::Create, &id, Some(record.value.as_str())).await {
            Ok(_) => {
                info!("Created DNS record {}", id);
                return Ok(CreateOutcome::Created);
            }
            Err(err) => err,
        };

        if FailureKind::of(&err) != FailureKind::AlreadyExists {
            return Err(Error::operation(Verb::Create, id.to_string(), err));
        }

        debug!("DNS record {} already exists, comparing stored value", id);
        let Some(existing) = self.query(&id).await? else {
            return Err(Error::operation(
                Verb::Create,
                id.to_string(),
                Error::AlreadyExists(format!(
                    "server reported {id} present but a query found nothing"
                )),
            ));
        };

        if values_equivalent(record.record_type, &existing.value, &record.value) {
            info!(
                "DNS record {} already has value {:?}, nothing to do",
                id, existing.value
            );
            Ok(CreateOutcome::AlreadyPresent {
                existing: existing.value,
            })
        } else {
            warn!(
                "DNS record {} holds {:?}, refusing to overwrite with {:?}",
                id, existing.value, record.value
            );
            Err(Error::Conflict {
                record: id.to_string(),
                existing: existing.value,
                requested: record.value.clone(),
            })
        }
    }

    /// Query a record.
    ///
    /// Returns `Ok(None)` when the server says the record does not exist.
    /// This is how drift is detected: the caller compares the result with
    /// what it expects on every pass.
    ///
    /// # Errors
    ///
    /// - [`Error::Parse`] when the listing does not contain the type's line
    /// - [`Error::Operation`] wrapping any other tool failure
    pub async fn query(&self, id: &RecordId) -> Result<Option<DnsRecord>> {
        debug!("Querying DNS record {}", id);

        let output = match self.invoke(Verb::Query, id, None).await {
            Ok(output) => output,
            Err(err) if FailureKind::of(&err) == FailureKind::NotFound => {
                debug!("DNS record {} does not exist", id);
                return Ok(None);
            }
            Err(err) => return Err(Error::operation(Verb::Query, id.to_string(), err)),
        };

        parse_query_output(&output, &id.server, &id.zone, &id.name, id.record_type).map(Some)
    }

    /// Delete a record.
    ///
    /// `record.value` should be the value as the server stores it (i.e. what
    /// [`query`](Self::query) returned). Multi-segment TXT values are
    /// rewritten into the form `dns delete` accepts. A record that does not
    /// exist counts as deleted.
    pub async fn delete(&self, record: &DnsRecord) -> Result<DeleteOutcome> {
        let id = record.id();
        let value = record.record_type.strategy().delete_encoding(&record.value);
        info!("Deleting DNS record {} ({:?})", id, value);

        match self.invoke(Verb::Delete, &id, Some(&*value)).await {
            Ok(_) => {
                info!("Deleted DNS record {}", id);
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) if FailureKind::of(&err) == FailureKind::NotFound => {
                debug!("DNS record {} already absent", id);
                Ok(DeleteOutcome::AlreadyAbsent)
            }
            Err(err) => Err(Error::operation(Verb::Delete, id.to_string(), err)),
        }
    }

    /// Replace `old` with `new` by deleting then creating.
    ///
    /// If the delete fails, nothing is created. If the delete succeeds and
    /// the create fails, the record is left absent; there is no rollback.
    /// Callers should pass the value most recently returned by
    /// [`query`](Self::query) as `old`, not a remembered one.
    pub async fn update(&self, old: &DnsRecord, new: &DnsRecord) -> Result<UpdateOutcome> {
        info!(
            "Updating DNS record {}: {:?} -> {:?}",
            new.id(),
            old.value,
            new.value
        );

        let deleted = self
            .delete(old)
            .await
            .map_err(|e| Error::update(UpdatePhase::Delete, e))?;

        let created = self.create(new).await.map_err(|e| {
            warn!(
                "DNS record {} was deleted but could not be recreated; it is now absent",
                new.id()
            );
            Error::update(UpdatePhase::Create, e)
        })?;

        Ok(UpdateOutcome { deleted, created })
    }

    /// Run one `samba-tool dns <verb>` invocation
    async fn invoke(&self, verb: Verb, id: &RecordId, value: Option<&str>) -> Result<String> {
        let mut args = vec![
            "dns".to_string(),
            verb.subcommand().to_string(),
            id.server.clone(),
            id.zone.clone(),
            id.name.clone(),
            id.record_type.to_string(),
        ];
        if let Some(value) = value {
            args.push(value.to_string());
        }

        debug!("Running {} {}", self.executor.program(), args.join(" "));
        self.executor.run(args).await
    }
}
