use std::collections::HashMap;

use crate::error::{BuildError, Result};
use crate::records::CableRecord;

/// Candidate prefixes of a catalog key, tried in priority order.
pub const CABLE_ID_PREFIXES: [&str; 3] = ["S", "A", "Câble"];

/// Electrical parameters of one cable type, per kilometre.
#[derive(Debug, Clone, PartialEq)]
pub struct CableType {
    /// Composite key "prefix-section-core-insulation-insulationVoltage".
    pub cable_type: String,
    /// Resistance (ohm/km).
    pub r1: f64,
    /// Reactance (ohm/km).
    pub x1: f64,
    /// Shunt capacitance (uF/km).
    pub c1: f64,
    /// Maximum current (A).
    pub i_max: f64,
}

/// Cable catalog keyed by the exact composite type string.
#[derive(Debug, Clone, Default)]
pub struct CableCatalog {
    cables: HashMap<String, CableType>,
}

impl CableCatalog {
    /// Reads all catalog rows once. A duplicate key silently overwrites the
    /// earlier entry (last wins); the input data is trusted on this point and
    /// not validated.
    pub fn from_records(records: &[CableRecord]) -> Self {
        let mut cables = HashMap::with_capacity(records.len());
        for rec in records {
            cables.insert(
                rec.cable_type.clone(),
                CableType {
                    cable_type: rec.cable_type.clone(),
                    r1: rec.r1,
                    x1: rec.x1,
                    c1: rec.c1,
                    i_max: rec.i_max,
                },
            );
        }
        Self { cables }
    }

    pub fn len(&self) -> usize {
        self.cables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cables.is_empty()
    }

    pub fn get(&self, cable_type: &str) -> Option<&CableType> {
        self.cables.get(cable_type)
    }

    /// Matches a cable from its characteristics, trying each candidate prefix
    /// in order. `line` only labels the error when nothing matches.
    pub fn lookup(
        &self,
        prefixes: &[&str],
        line: usize,
        section: &str,
        core: &str,
        insulation: &str,
        insulation_voltage: &str,
    ) -> Result<&CableType> {
        for prefix in prefixes {
            let key = format!(
                "{}-{}-{}-{}-{}",
                prefix, section, core, insulation, insulation_voltage
            );
            if let Some(cable) = self.cables.get(&key) {
                return Ok(cable);
            }
        }
        Err(BuildError::CableNotFound {
            line,
            section: section.to_string(),
            core: core.to_string(),
            insulation: insulation.to_string(),
            insulation_voltage: insulation_voltage.to_string(),
        })
    }
}
