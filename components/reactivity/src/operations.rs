//! Kinds of tracked reads and triggered writes

use std::fmt;

/// Pseudo-key tracked when an object's keys are enumerated
pub const ITERATE_KEY: &str = "Symbol(iterate)";

/// Read operations reported to `track`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackOpTypes {
    /// Property read
    Get,
    /// `key in target`
    Has,
    /// Key enumeration
    Iterate,
}

/// Write operations reported to `trigger`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerOpTypes {
    /// Existing key changed value
    Set,
    /// New key added
    Add,
    /// Key removed
    Delete,
    /// Collection emptied
    Clear,
}

impl TrackOpTypes {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            TrackOpTypes::Get => "get",
            TrackOpTypes::Has => "has",
            TrackOpTypes::Iterate => "iterate",
        }
    }
}

impl TriggerOpTypes {
    /// Lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerOpTypes::Set => "set",
            TriggerOpTypes::Add => "add",
            TriggerOpTypes::Delete => "delete",
            TriggerOpTypes::Clear => "clear",
        }
    }
}

impl fmt::Display for TrackOpTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl fmt::Display for TriggerOpTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
