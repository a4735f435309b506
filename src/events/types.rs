/*!
 * Event Kinds
 * Event categories, attribute keys and metric identifiers
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Client command category an event records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum EventType {
    Unspecified = 0,
    Init,
    Status,
    Add,
    Reset,
    Commit,
    Sql,
    SqlServer,
    Log,
    Diff,
    Merge,
    Branch,
    Checkout,
    Remote,
    Push,
    Pull,
    Fetch,
    Clone,
    Login,
    Version,
    Config,
}

impl EventType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventType::Unspecified => "unspecified",
            EventType::Init => "init",
            EventType::Status => "status",
            EventType::Add => "add",
            EventType::Reset => "reset",
            EventType::Commit => "commit",
            EventType::Sql => "sql",
            EventType::SqlServer => "sql_server",
            EventType::Log => "log",
            EventType::Diff => "diff",
            EventType::Merge => "merge",
            EventType::Branch => "branch",
            EventType::Checkout => "checkout",
            EventType::Remote => "remote",
            EventType::Push => "push",
            EventType::Pull => "pull",
            EventType::Fetch => "fetch",
            EventType::Clone => "clone",
            EventType::Login => "login",
            EventType::Version => "version",
            EventType::Config => "config",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute key attached to an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AttributeId {
    Unspecified = 0,
    RemoteUrlScheme,
    RemoteUrlHost,
    OutputFormat,
    ServerMode,
}

/// Metric identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MetricId {
    Unspecified = 0,
    BytesDownloaded,
    DownloadMsElapsed,
    RemoteApiRpcError,
}
