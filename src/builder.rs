use std::collections::{BTreeSet, HashMap};

use log::warn;

use crate::cables::{CableCatalog, CABLE_ID_PREFIXES};
use crate::error::Result;
use crate::network::{Branch, Load, Network, Transformer};
use crate::records::NetworkRecords;
use crate::reduce::{fold_segment, scale_segment, segment_capacity, PiParams};
use crate::registry::BusRegistry;

/// Non-fatal findings of one build pass. All sets are sorted so reports are
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    /// External bus ids referenced by segments but never registered.
    pub unknown_buses: BTreeSet<usize>,

    /// External line ids dropped because an endpoint bus is unknown.
    pub unknown_bus_lines: BTreeSet<usize>,

    /// External line ids whose branch resolved open.
    pub open_lines: BTreeSet<usize>,

    /// External bus ids referenced by transformer records but never registered.
    pub unknown_transformer_buses: BTreeSet<usize>,

    /// External bus ids referenced by load records but never registered.
    pub unknown_load_buses: BTreeSet<usize>,

    /// External bus ids with more than one load of different types.
    pub duplicate_loads: BTreeSet<usize>,
}

impl BuildReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_buses.is_empty()
            && self.unknown_bus_lines.is_empty()
            && self.open_lines.is_empty()
            && self.unknown_transformer_buses.is_empty()
            && self.unknown_load_buses.is_empty()
            && self.duplicate_loads.is_empty()
    }
}

impl std::fmt::Display for BuildReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn line(
            f: &mut std::fmt::Formatter<'_>,
            what: &str,
            set: &BTreeSet<usize>,
        ) -> std::fmt::Result {
            if !set.is_empty() {
                writeln!(f, "{} {}: {:?}", set.len(), what, set)?;
            }
            Ok(())
        }
        line(f, "unknown buses in the lines table", &self.unknown_buses)?;
        line(f, "lines dropped on unknown buses", &self.unknown_bus_lines)?;
        line(f, "open lines", &self.open_lines)?;
        line(
            f,
            "unknown buses in the transformers table",
            &self.unknown_transformer_buses,
        )?;
        line(f, "unknown buses in the loads table", &self.unknown_load_buses)?;
        line(f, "buses with duplicate loads", &self.duplicate_loads)?;
        Ok(())
    }
}

/// Per (line id, bus pair) fold state of the segment reducer.
///
/// An explicit entry rather than a branch-exists check, so a key that was
/// dropped on an unknown bus stays dropped for its remaining segments.
enum Fold {
    /// Folding into this branch arena slot.
    Branch(usize),
    /// Endpoint bus unknown; all segments of this key are discarded.
    Dropped,
}

/// Runs the whole single-threaded build pass: buses, cable catalog, one
/// streaming pass over the line segments, then transformers and loads.
///
/// Fatal errors (unmatched cable, malformed segment) abort with no partial
/// network; everything advisory lands in the returned report.
pub fn build_network(records: &NetworkRecords) -> Result<(Network, BuildReport)> {
    let mut registry = BusRegistry::new();
    for rec in &records.buses {
        registry.register(rec.bus, rec.base_kv, (rec.panel, rec.cell), rec.closed);
    }

    let catalog = CableCatalog::from_records(&records.cables);

    let mut report = BuildReport::default();
    let mut branch: Vec<Branch> = Vec::new();
    let mut folds: HashMap<(usize, (usize, usize)), Fold> = HashMap::new();

    for seg in &records.segments {
        // Self-loops carry no electrical meaning in a bus-branch model.
        if seg.f_bus == seg.t_bus {
            continue;
        }

        let pair = if seg.f_bus <= seg.t_bus {
            (seg.f_bus, seg.t_bus)
        } else {
            (seg.t_bus, seg.f_bus)
        };
        let key = (seg.line, pair);

        if let Some(Fold::Dropped) = folds.get(&key) {
            continue;
        }

        let (fi, ti) = match (registry.index(seg.f_bus), registry.index(seg.t_bus)) {
            (Some(fi), Some(ti)) => (fi, ti),
            (fi, ti) => {
                if fi.is_none() {
                    report.unknown_buses.insert(seg.f_bus);
                }
                if ti.is_none() {
                    report.unknown_buses.insert(seg.t_bus);
                }
                report.unknown_bus_lines.insert(seg.line);
                folds.insert(key, Fold::Dropped);
                continue;
            }
        };

        let cable = catalog.lookup(
            &CABLE_ID_PREFIXES,
            seg.line,
            &seg.section,
            &seg.core,
            &seg.insulation,
            &seg.insulation_voltage,
        )?;
        let params = scale_segment(cable, seg.line, seg.length)?;
        let p_max = segment_capacity(cable, seg.voltage);

        // A segment is energized only if both its terminal cells are closed;
        // a cell missing from the bus table reads as open.
        let closed = registry.switch_closed(seg.f_bus, seg.f_panel, seg.f_cell)
            && registry.switch_closed(seg.t_bus, seg.t_panel, seg.t_cell);

        let slot = match folds.get(&key) {
            Some(&Fold::Branch(slot)) => Some(slot),
            _ => None,
        };
        match slot {
            Some(slot) => {
                let br = &mut branch[slot];
                let acc = PiParams {
                    r: br.br_r,
                    x: br.br_x,
                    c: br.br_c,
                };
                let merged = fold_segment(seg.line, &acc, &params)?;
                br.br_r = merged.r;
                br.br_x = merged.x;
                br.br_c = merged.c;
                br.p_max = br.p_max.min(p_max);
                br.closed = br.closed && closed;
                br.segments += 1;
            }
            None => {
                let slot = branch.len();
                branch.push(Branch {
                    i: slot,
                    line_i: seg.line,
                    f_bus: fi,
                    t_bus: ti,
                    br_r: params.r,
                    br_x: params.x,
                    br_c: params.c,
                    p_max,
                    closed,
                    segments: 1,
                });
                folds.insert(key, Fold::Branch(slot));
            }
        }
    }

    // Open branches are kept so the graph still shows the all-switches
    // topology; their line ids are reported.
    for br in &branch {
        if !br.closed {
            report.open_lines.insert(br.line_i);
        }
    }

    let mut transformer_count = 0;
    for rec in &records.transformers {
        match registry.index(rec.bus) {
            Some(i) => {
                registry.bus_mut(i).transformers.push(Transformer {
                    i: transformer_count,
                    tr_i: rec.transformer,
                    bus: i,
                    p_max: rec.p_max,
                });
                transformer_count += 1;
            }
            None => {
                report.unknown_transformer_buses.insert(rec.bus);
            }
        }
    }

    let mut load_count = 0;
    for rec in &records.loads {
        let i = match registry.index(rec.bus) {
            Some(i) => i,
            None => {
                report.unknown_load_buses.insert(rec.bus);
                continue;
            }
        };
        let bus = registry.bus_mut(i);
        match bus.load.as_mut() {
            None => {
                let mut load = Load {
                    i: load_count,
                    bus: i,
                    load_type: rec.load_type.clone(),
                    ref_powers: Default::default(),
                    active_profiles: Default::default(),
                    reactive_profiles: Default::default(),
                };
                if rec.magnitude != 0.0 {
                    load.ref_powers.insert(rec.label.clone(), rec.magnitude);
                }
                bus.load = Some(load);
                load_count += 1;
            }
            Some(load) if load.load_type == rec.load_type => {
                if rec.magnitude != 0.0 {
                    load.ref_powers.insert(rec.label.clone(), rec.magnitude);
                }
            }
            Some(_) => {
                report.duplicate_loads.insert(rec.bus);
            }
        }
    }

    if !report.unknown_buses.is_empty() {
        warn!(
            "{} unknown buses in the lines table: {:?}",
            report.unknown_buses.len(),
            report.unknown_buses
        );
    }
    if !report.open_lines.is_empty() {
        warn!(
            "{} open lines: {:?}",
            report.open_lines.len(),
            report.open_lines
        );
    }
    if !report.unknown_transformer_buses.is_empty() {
        warn!(
            "{} unknown buses in the transformers table: {:?}",
            report.unknown_transformer_buses.len(),
            report.unknown_transformer_buses
        );
    }
    if !report.unknown_load_buses.is_empty() {
        warn!(
            "{} unknown buses in the loads table: {:?}",
            report.unknown_load_buses.len(),
            report.unknown_load_buses
        );
    }
    if !report.duplicate_loads.is_empty() {
        warn!(
            "{} buses with duplicate loads: {:?}",
            report.duplicate_loads.len(),
            report.duplicate_loads
        );
    }

    let network = Network {
        bus: registry.into_buses(),
        branch,
    };
    Ok((network, report))
}
