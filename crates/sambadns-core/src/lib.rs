// # sambadns-core
//
// Record synchronization core for managing Samba AD DNS records through
// `samba-tool`.
//
// ## Architecture Overview
//
// - **CommandExecutor**: Trait for running `samba-tool` once and capturing its output
// - **parser**: Extracts a record from the free-text `dns query` listing
// - **normalize**: Per-type value strategies (comparison, delete encoding, listing reshaping)
// - **RecordSynchronizer**: Idempotent create/query/delete/update over one executor
// - **RecordResource**: Host-facing lifecycle (create + read-back, import, lookup)
//
// ## Design Principles
//
// 1. **One process per operation**: no sessions, pooling or caching
// 2. **Fail loudly on unknown output**: the parser recognizes known shapes only
// 3. **Idempotency from the server**: every decision re-derives state by querying
// 4. **Non-atomic update is explicit**: a failed create after delete is reported as such

pub mod config;
pub mod error;
pub mod failure;
pub mod normalize;
pub mod parser;
pub mod record;
pub mod resource;
pub mod sync;
pub mod traits;

// Re-export core types for convenience
pub use config::{Credentials, SambaDnsConfig};
pub use error::{Error, Result, UpdatePhase, Verb};
pub use failure::FailureKind;
pub use record::{DEFAULT_TTL, DnsRecord, RecordId, RecordType};
pub use resource::{RecordResource, RecordSpec, ResourceState, suppress_value_diff};
pub use sync::{CreateOutcome, DeleteOutcome, RecordSynchronizer, UpdateOutcome};
pub use traits::CommandExecutor;
