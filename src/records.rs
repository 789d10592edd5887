use serde::Deserialize;

/// One switch cell of a bus.
///
/// A bus appears once per cell in the bus table; re-registrations of the same
/// bus id merge into its switch-state table.
#[derive(Debug, Clone, Deserialize)]
pub struct BusRecord {
    /// External bus id.
    pub bus: usize,
    /// Base voltage (kV).
    pub base_kv: f64,
    /// Bus bar / panel the cell belongs to.
    pub panel: usize,
    /// Cell on the panel.
    pub cell: usize,
    /// Whether the disconnector in this cell is closed.
    pub closed: bool,
}

/// Cable catalog row with per-kilometre parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CableRecord {
    /// Composite type key, e.g. "S-95-Alu-PRC-12".
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

/// One physical cable segment of a logical line.
///
/// Segments sharing the same line id and bus pair are assumed to be listed in
/// physical adjacency order; the reducer folds them into a single branch.
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentRecord {
    /// External line id.
    pub line: usize,
    pub f_bus: usize,
    pub t_bus: usize,
    pub f_panel: usize,
    pub f_cell: usize,
    pub t_panel: usize,
    pub t_cell: usize,
    /// Segment length (km).
    pub length: f64,
    /// Nominal operating voltage (V).
    pub voltage: f64,
    /// Cable characteristics used to match a catalog entry.
    pub section: String,
    pub core: String,
    pub insulation: String,
    pub insulation_voltage: String,
}

/// MV-LV transformer attached to a bus.
#[derive(Debug, Clone, Deserialize)]
pub struct TransformerRecord {
    pub bus: usize,
    /// External transformer id.
    pub transformer: usize,
    /// Maximum power (VA).
    pub p_max: f64,
}

/// Load (consumption and/or production) attached to a bus.
///
/// One row per reference power label; rows for the same bus merge into one
/// load. A second load of a different type on the same bus is reported as a
/// duplicate and skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadRecord {
    pub bus: usize,
    /// Load type tag, e.g. "R", "I1", "HP".
    pub load_type: String,
    /// Reference power label, e.g. "load", "inhab", "PV".
    pub label: String,
    /// Reference magnitude; zero magnitudes are not retained.
    pub magnitude: f64,
}

/// All input tables of one build, in the order the build consumes them.
#[derive(Debug, Clone, Default)]
pub struct NetworkRecords {
    pub buses: Vec<BusRecord>,
    pub cables: Vec<CableRecord>,
    pub segments: Vec<SegmentRecord>,
    pub transformers: Vec<TransformerRecord>,
    pub loads: Vec<LoadRecord>,
}
