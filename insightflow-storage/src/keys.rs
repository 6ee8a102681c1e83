//! Logical keys of the durable store
//!
//! Each key maps to one snapshot file holding the full serialized
//! collection (or session value), never incremental deltas.

use std::fmt;
use std::path::Path;

/// One logical collection in the durable store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Institutions,
    Departments,
    Forms,
    Responses,
    Analyses,
    Session,
}

impl StoreKey {
    /// All keys, in hydration order
    pub const ALL: [StoreKey; 6] = [
        StoreKey::Institutions,
        StoreKey::Departments,
        StoreKey::Forms,
        StoreKey::Responses,
        StoreKey::Analyses,
        StoreKey::Session,
    ];

    /// Snapshot file name for this key
    pub fn file_name(&self) -> &'static str {
        match self {
            StoreKey::Institutions => "institutions.json",
            StoreKey::Departments => "departments.json",
            StoreKey::Forms => "forms.json",
            StoreKey::Responses => "responses.json",
            StoreKey::Analyses => "analyses.json",
            StoreKey::Session => "session.json",
        }
    }

    /// Resolve a snapshot path back to its key, if it is one of ours
    pub fn from_path(path: &Path) -> Option<StoreKey> {
        let name = path.file_name()?.to_str()?;
        Self::ALL.iter().copied().find(|k| k.file_name() == name)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name().trim_end_matches(".json"))
    }
}
