//! Parallel regions per method, as consumed by the kernel compiler
//!
//! ```json
//! {
//!   "<Main: void kernel(int[],int)>": [ { "start": 7, "length": 14, "slot": 2 } ]
//! }
//! ```

use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Extent of a parallel loop in the method's instruction stream, and the
/// local slot of its induction variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParallelRegion {
    pub start: u32,
    pub length: u32,
    pub slot: u32,
}

/// Method signature -> parallel regions, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationMap {
    methods: BTreeMap<String, Vec<ParallelRegion>>,
}

impl AnnotationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_annotation(&mut self, signature: impl Into<String>, region: ParallelRegion) {
        self.methods.entry(signature.into()).or_default().push(region);
    }

    pub fn regions_of(&self, signature: &str) -> &[ParallelRegion] {
        self.methods.get(signature).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ParallelRegion])> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn region_count(&self) -> usize {
        self.methods.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut json = self.to_json()?;
        json.push('\n');
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
