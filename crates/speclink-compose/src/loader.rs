//! Document loader trait and its filesystem and in-memory implementations.
//!
//! The resolver caches by location, so a loader must be idempotent:
//! repeated loads of one location return equivalent documents.

use std::collections::HashMap;
use std::sync::Mutex;

use speclink_model::{DocumentFormat, SpecDocument};

use crate::error::LoadError;
use crate::location::Location;

/// Loads a parsed document from a normalized location.
pub trait DocumentLoader {
    fn load(&self, location: &Location) -> Result<SpecDocument, LoadError>;
}

/// Loads documents from the local filesystem.
///
/// The format is chosen from the file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DocumentLoader for FsLoader {
    fn load(&self, location: &Location) -> Result<SpecDocument, LoadError> {
        let path = location.as_path();
        if !path.is_file() {
            return Err(LoadError::NotFound {
                location: location.to_string(),
            });
        }

        let format = DocumentFormat::from_path(path).map_err(|e| LoadError::Parse {
            location: location.to_string(),
            source: e,
        })?;
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        SpecDocument::parse(&text, format).map_err(|e| LoadError::Parse {
            location: location.to_string(),
            source: e,
        })
    }
}

/// A loader over documents held in memory.
///
/// Records every location it is asked for, which lets callers observe
/// cache behaviour.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    documents: HashMap<Location, SpecDocument>,
    calls: Mutex<Vec<Location>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document at a location.
    pub fn insert(&mut self, location: impl Into<String>, document: SpecDocument) {
        self.documents.insert(Location::new(location), document);
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, location: impl Into<String>, document: SpecDocument) -> Self {
        self.insert(location, document);
        self
    }

    /// Locations requested so far, in call order.
    pub fn calls(&self) -> Vec<Location> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Number of load calls made for one location.
    pub fn call_count(&self, location: &str) -> usize {
        self.calls()
            .iter()
            .filter(|l| l.as_str() == location)
            .count()
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, location: &Location) -> Result<SpecDocument, LoadError> {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(location.clone()),
            Err(poisoned) => poisoned.into_inner().push(location.clone()),
        }
        self.documents
            .get(location)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                location: location.to_string(),
            })
    }
}
