//! Test doubles and common utilities for record core contract tests
//!
//! [`FakeSambaTool`] is an in-memory stand-in for a DNS server reached
//! through `samba-tool`. It speaks the tool's text: listings in the
//! `Name=..., Records=...` shape, and the tool's failure markers on stderr.

#![allow(dead_code)]

use sambadns_core::error::{Error, Result};
use sambadns_core::CommandExecutor;
use std::collections::{HashMap, VecDeque};
use std::net::Ipv6Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// `(zone, name, TYPE)`
type Key = (String, String, String);

/// A fake samba-tool backed by a map of stored values
pub struct FakeSambaTool {
    /// Stored values, in the encoding they were added with
    records: Arc<Mutex<HashMap<Key, String>>>,
    /// Every argument vector received, in order
    calls: Arc<Mutex<Vec<Vec<String>>>>,
    /// Number of invocations (one per spawned process in the real tool)
    call_count: Arc<AtomicUsize>,
    /// Injected failures per subcommand, consumed in order
    failures: Arc<Mutex<HashMap<String, VecDeque<String>>>>,
    /// Canned stdout for the next queries, consumed in order
    canned_listings: Arc<Mutex<VecDeque<String>>>,
    /// TTL printed in listings; `None` omits the field
    ttl: Option<u32>,
}

impl FakeSambaTool {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            failures: Arc::new(Mutex::new(HashMap::new())),
            canned_listings: Arc::new(Mutex::new(VecDeque::new())),
            ttl: Some(3600),
        }
    }

    /// Print `ttl` in listings
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Leave `ttl=` out of listings
    pub fn without_ttl(mut self) -> Self {
        self.ttl = None;
        self
    }

    /// Create a new FakeSambaTool that shares state with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            records: Arc::clone(&other.records),
            calls: Arc::clone(&other.calls),
            call_count: Arc::clone(&other.call_count),
            failures: Arc::clone(&other.failures),
            canned_listings: Arc::clone(&other.canned_listings),
            ttl: other.ttl,
        }
    }

    /// Put a record on the server without going through the executor
    pub fn seed(&self, zone: &str, name: &str, record_type: &str, value: &str) {
        self.records
            .lock()
            .unwrap()
            .insert(key(zone, name, record_type), value.to_string());
    }

    /// The stored value for a key, if any
    pub fn stored(&self, zone: &str, name: &str, record_type: &str) -> Option<String> {
        self.records
            .lock()
            .unwrap()
            .get(&key(zone, name, record_type))
            .cloned()
    }

    /// Make the next `dns <subcommand>` fail with `stderr`
    pub fn fail_next(&self, subcommand: &str, stderr: &str) {
        self.failures
            .lock()
            .unwrap()
            .entry(subcommand.to_string())
            .or_default()
            .push_back(stderr.to_string());
    }

    /// Answer the next successful query with `stdout` verbatim
    pub fn respond_next_query_with(&self, stdout: &str) {
        self.canned_listings
            .lock()
            .unwrap()
            .push_back(stdout.to_string());
    }

    /// Get the number of invocations
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get every argument vector received
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// The subcommands received, in order (`add`, `query`, `delete`)
    pub fn subcommands(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|args| args.get(1).cloned())
            .collect()
    }

    fn handle(&self, args: &[String]) -> Result<String> {
        let [dns, subcommand, _server, zone, name, record_type, rest @ ..] = args else {
            return Err(tool_failure("ERROR: missing arguments"));
        };
        assert_eq!(dns, "dns", "fake only understands `dns` subcommands");

        if let Some(stderr) = self
            .failures
            .lock()
            .unwrap()
            .get_mut(subcommand.as_str())
            .and_then(VecDeque::pop_front)
        {
            return Err(tool_failure(&stderr));
        }

        let k = key(zone, name, record_type);
        let mut records = self.records.lock().unwrap();

        match (subcommand.as_str(), rest) {
            ("add", [value]) => {
                if records.contains_key(&k) {
                    return Err(tool_failure(
                        "ERROR(runtime): Record already exists: WERR_DNS_ERROR_RECORD_ALREADY_EXISTS",
                    ));
                }
                records.insert(k, value.clone());
                Ok("Record added successfully\n".to_string())
            }
            ("query", []) => {
                if let Some(canned) = self.canned_listings.lock().unwrap().pop_front() {
                    return Ok(canned);
                }
                let has_name = records.keys().any(|(z, n, _)| z == zone && n == name);
                if !has_name {
                    return Err(tool_failure(
                        "ERROR: WERR_DNS_ERROR_NAME_DOES_NOT_EXIST",
                    ));
                }
                let Some(value) = records.get(&k) else {
                    return Err(tool_failure(
                        "ERROR: WERR_DNS_ERROR_RECORD_DOES_NOT_EXIST",
                    ));
                };
                Ok(self.listing(name, record_type, value))
            }
            ("delete", [value]) => match records.get(&k) {
                Some(stored) if same_wire_value(record_type, stored, value) => {
                    records.remove(&k);
                    Ok("Record deleted successfully\n".to_string())
                }
                _ => Err(tool_failure(
                    "ERROR: Record does not exist: WERR_DNS_ERROR_RECORD_DOES_NOT_EXIST",
                )),
            },
            _ => Err(tool_failure("ERROR: unsupported invocation")),
        }
    }

    /// Render a listing the way samba-tool prints it
    fn listing(&self, name: &str, record_type: &str, value: &str) -> String {
        let shown = match record_type {
            "MX" => {
                let (host, priority) = value.rsplit_once(' ').unwrap_or((value, "0"));
                format!("{}. ({})", host.trim_end_matches('.'), priority)
            }
            "CNAME" | "PTR" | "NS" => format!("{}.", value.trim_end_matches('.')),
            _ => value.to_string(),
        };
        let ttl = self
            .ttl
            .map(|ttl| format!(", ttl={ttl}"))
            .unwrap_or_default();

        format!(
            "  Name={name}, Records=1, Children=0\n    {record_type}: {shown} (flags=f0, serial=110{ttl})\n"
        )
    }
}

impl Default for FakeSambaTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CommandExecutor for FakeSambaTool {
    async fn run(&self, args: Vec<String>) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(args.clone());
        self.handle(&args)
    }

    fn program(&self) -> &str {
        "fake-samba-tool"
    }
}

fn key(zone: &str, name: &str, record_type: &str) -> Key {
    (zone.to_string(), name.to_string(), record_type.to_string())
}

fn tool_failure(stderr: &str) -> Error {
    Error::tool("exit status: 255", stderr)
}

/// Whether a delete argument addresses the stored value, the way the
/// server matches them
fn same_wire_value(record_type: &str, stored: &str, given: &str) -> bool {
    match record_type {
        "AAAA" => match (stored.parse::<Ipv6Addr>(), given.parse::<Ipv6Addr>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => stored == given,
        },
        "CNAME" | "PTR" | "NS" => stored.trim_end_matches('.') == given.trim_end_matches('.'),
        "MX" => {
            let split = |v: &str| {
                v.rsplit_once(' ')
                    .map(|(host, prio)| (host.trim_end_matches('.').to_string(), prio.to_string()))
            };
            split(stored) == split(given)
        }
        // Multi-segment TXT is listed as "a","b" but must be deleted as 'a' 'b'
        "TXT" if stored.contains(',') => txt_segments_for_delete(stored) == given,
        _ => stored == given,
    }
}

fn txt_segments_for_delete(stored: &str) -> String {
    stored
        .split(',')
        .map(|s| format!("'{}'", s.trim().trim_matches('"')))
        .collect::<Vec<_>>()
        .join(" ")
}
