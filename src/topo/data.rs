//! Input model of a build and its JSON loading logic.
//!
//! This module does not have performance critical code. Validation is allowed!

use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::tree::PointIdx;

/// `(min_idx, max_idx)` key of a base partition.
pub type PartitionKey = (PointIdx, PointIdx);
/// Base partition: extremum pair -> owned point indices.
pub type BasePartition = BTreeMap<PartitionKey, Vec<PointIdx>>;
/// Merge hierarchy: absorbed extremum -> `(raw level, surviving extremum)`.
pub type Hierarchy = BTreeMap<PointIdx, (f64, PointIdx)>;

/// One base partition as stored on disk.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PartitionRecord {
    pub min: PointIdx,
    pub max: PointIdx,
    pub points: Vec<PointIdx>,
}

/// One hierarchy entry as stored on disk.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HierarchyRecord {
    pub extremum: PointIdx,
    pub level: f64,
    pub dest: PointIdx,
}

/// Everything a build consumes: the value table, the base partition and the
/// merge hierarchy, typically produced by a Morse-Smale complex computation.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct MsComplex {
    /// `values[i]` is the scalar field at point `i`.
    pub values: Vec<f64>,
    pub partitions: Vec<PartitionRecord>,
    pub hierarchy: Vec<HierarchyRecord>,
}

impl MsComplex {
    pub fn base(&self) -> BasePartition {
        self.partitions.iter().map(|p| ((p.min, p.max), p.points.clone())).collect()
    }

    pub fn hierarchy(&self) -> Hierarchy {
        self.hierarchy.iter().map(|h| (h.extremum, (h.level, h.dest))).collect()
    }

    /// Rejects inputs whose records would silently overwrite each other once
    /// turned into maps.
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let mut keys = BTreeSet::new();
        for p in &self.partitions {
            if !keys.insert((p.min, p.max)) {
                return Err(format!("Duplicated partition ({}, {})", p.min, p.max).into());
            }
        }
        let mut sources = BTreeSet::new();
        for h in &self.hierarchy {
            if !sources.insert(h.extremum) {
                return Err(format!("Extremum {} is merged more than once", h.extremum).into());
            }
            if !h.level.is_finite() {
                return Err(format!("Extremum {} has a non-finite merge level", h.extremum).into());
            }
            if h.level < 0.0 {
                return Err(format!("Extremum {} has a negative merge level {}", h.extremum, h.level).into());
            }
        }
        Ok(())
    }
}

/// Parses and validates an `MsComplex` from a JSON string.
pub fn parse_msc(json: &str) -> Result<MsComplex, Box<dyn Error>> {
    let msc: MsComplex = serde_json::from_str(json).map_err(|e| format!("Failed to parse complex: {}", e))?;
    msc.validate()?;
    Ok(msc)
}

/// Loads an `MsComplex` from a JSON file.
///
/// # Returns
/// A `Result` containing the validated complex or a `Box<dyn Error>` naming the file.
pub fn load_msc<P: AsRef<Path>>(filename: P) -> Result<MsComplex, Box<dyn Error>> {
    let filename_ref = filename.as_ref();

    let file_content = fs::read_to_string(filename_ref)
        .map_err(|e| format!("Failed to read file {:?}: {}", filename_ref, e))?;

    let msc = parse_msc(&file_content).map_err(|e| format!("{:?}: {}", filename_ref, e))?;
    Ok(msc)
}
