//! Property identifiers (PID parameter) and client PID maps (RFC 6350 §5.5, §6.7.7).

use std::fmt;
use std::str::FromStr;

/// A PID parameter value: a local identifier optionally scoped by a
/// CLIENTPIDMAP source id (`1` or `1.2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid {
    /// Identifier local to the vCard.
    pub local_id: u32,
    /// Source id of the CLIENTPIDMAP this PID belongs to.
    pub client_pid_map_ref: Option<u32>,
}

impl Pid {
    #[must_use]
    pub const fn new(local_id: u32) -> Self {
        Self {
            local_id,
            client_pid_map_ref: None,
        }
    }

    #[must_use]
    pub const fn with_map_ref(local_id: u32, client_pid_map_ref: u32) -> Self {
        Self {
            local_id,
            client_pid_map_ref: Some(client_pid_map_ref),
        }
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.client_pid_map_ref {
            Some(map_ref) => write!(f, "{}.{map_ref}", self.local_id),
            None => write!(f, "{}", self.local_id),
        }
    }
}

/// Error returned when a PID value does not match `\d+(\.\d+)?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPid;

impl FromStr for Pid {
    type Err = InvalidPid;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (local, map_ref) = match s.split_once('.') {
            Some((local, map_ref)) => (local, Some(map_ref)),
            None => (s, None),
        };

        let parse_digits = |part: &str| {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(InvalidPid);
            }
            part.parse::<u32>().map_err(|_err| InvalidPid)
        };

        Ok(Self {
            local_id: parse_digits(local)?,
            client_pid_map_ref: map_ref.map(parse_digits).transpose()?,
        })
    }
}

/// Client PID map (CLIENTPIDMAP property, RFC 6350 §6.7.7).
///
/// Binds a source id referenced from PID parameters to a globally unique URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientPidMap {
    /// Source identifier referenced from PID parameters.
    pub source_id: u32,
    /// Globally unique URI of the client.
    pub uri: String,
}

impl ClientPidMap {
    #[must_use]
    pub fn new(source_id: u32, uri: impl Into<String>) -> Self {
        Self {
            source_id,
            uri: uri.into(),
        }
    }

    /// Creates a map entry bound to a random `urn:uuid:` URI.
    #[must_use]
    pub fn random(source_id: u32) -> Self {
        Self {
            source_id,
            uri: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
        }
    }
}
