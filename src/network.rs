use std::collections::{BTreeMap, HashMap};

/// Bus is a node of the distribution network.
///
/// Internal indices are dense, 0-based and assigned in first-seen order by the
/// registry; they stay stable for the whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct Bus {
    /// Internal index.
    pub i: usize,

    /// External bus id.
    pub bus_i: usize,

    /// Base voltage (kV).
    pub base_kv: f64,

    /// Number of times the bus appeared in the bus table (one row per cell).
    pub count: usize,

    /// Switch state per (panel, cell): true when the disconnector is closed.
    pub switches: HashMap<(usize, usize), bool>,

    /// Transformers attached to this bus.
    pub transformers: Vec<Transformer>,

    /// Load attached to this bus, at most one.
    pub load: Option<Load>,
}

/// Branch is the reduced electrical equivalent of one or more physical cable
/// segments between two buses.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    /// Internal branch id.
    pub i: usize,

    /// External id of the line the first folded segment belongs to.
    pub line_i: usize,

    /// "From" bus internal index.
    pub f_bus: usize,

    /// "To" bus internal index.
    pub t_bus: usize,

    /// Series resistance (ohm, absolute).
    pub br_r: f64,

    /// Series reactance (ohm, absolute).
    pub br_x: f64,

    /// Total shunt capacitance (uF, absolute).
    pub br_c: f64,

    /// Maximum apparent power (VA), minimum across the folded segments.
    pub p_max: f64,

    /// True only if every folded segment's two terminal switch cells are
    /// closed.
    pub closed: bool,

    /// Number of physical segments folded into this branch.
    pub segments: usize,
}

impl Branch {
    /// Unordered endpoint pair, smaller internal index first.
    pub fn key(&self) -> (usize, usize) {
        if self.f_bus <= self.t_bus {
            (self.f_bus, self.t_bus)
        } else {
            (self.t_bus, self.f_bus)
        }
    }
}

/// MV-LV transformer attached to a bus.
#[derive(Debug, Clone, PartialEq)]
pub struct Transformer {
    /// Internal transformer id.
    pub i: usize,

    /// External transformer id.
    pub tr_i: usize,

    /// Owning bus internal index.
    pub bus: usize,

    /// Maximum power (VA).
    pub p_max: f64,
}

/// Load attached to a bus. May be consumption, production or both.
///
/// The per-period profiles are left empty by the builder; a downstream
/// collaborator fills them from the reference powers.
#[derive(Debug, Clone, PartialEq)]
pub struct Load {
    /// Internal load id.
    pub i: usize,

    /// Owning bus internal index.
    pub bus: usize,

    /// Load type tag, e.g. "R", "I1", "HP".
    pub load_type: String,

    /// Reference powers by label. Zero magnitudes are not stored.
    pub ref_powers: BTreeMap<String, f64>,

    /// Active power profiles by label, productions positive.
    pub active_profiles: BTreeMap<String, Vec<f64>>,

    /// Reactive power profiles by label.
    pub reactive_profiles: BTreeMap<String, Vec<f64>>,
}

/// The assembled network topology: bus and branch arenas addressed by dense
/// internal indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    pub bus: Vec<Bus>,
    pub branch: Vec<Branch>,
}

impl Network {
    /// Buses in internal index order.
    pub fn buses(&self) -> impl Iterator<Item = &Bus> {
        self.bus.iter()
    }

    /// Branches in creation order.
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.branch.iter()
    }

    /// Looks up the internal index of an external bus id.
    pub fn ext_index(&self, bus_i: usize) -> Option<usize> {
        self.bus.iter().position(|b| b.bus_i == bus_i)
    }

    /// True if any branch connects the two buses, in either direction.
    pub fn has_branch(&self, a: usize, b: usize) -> bool {
        self.branches_between(a, b).next().is_some()
    }

    /// All branches between two buses, in either direction.
    pub fn branches_between(&self, a: usize, b: usize) -> impl Iterator<Item = &Branch> {
        let key = if a <= b { (a, b) } else { (b, a) };
        self.branch.iter().filter(move |br| br.key() == key)
    }

    /// Internal indices of the buses adjacent to `i`, in branch creation
    /// order, without duplicates.
    pub fn neighbors(&self, i: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for br in &self.branch {
            let other = if br.f_bus == i {
                br.t_bus
            } else if br.t_bus == i {
                br.f_bus
            } else {
                continue;
            };
            if other != i && !out.contains(&other) {
                out.push(other);
            }
        }
        out
    }

    /// Degree of bus `i` counting parallel branches separately.
    pub fn degree(&self, i: usize) -> usize {
        self.branch
            .iter()
            .filter(|br| br.f_bus == i || br.t_bus == i)
            .count()
    }

    /// Reduces the multigraph to a simple graph: for every unordered bus pair
    /// only the highest-capacity branch survives. On equal capacity the
    /// first-encountered branch is kept. Branch ids are renumbered densely in
    /// kept order.
    pub fn to_simple(&self) -> Network {
        let mut kept: Vec<Branch> = Vec::new();
        let mut by_pair: HashMap<(usize, usize), usize> = HashMap::new();

        for br in &self.branch {
            match by_pair.get(&br.key()) {
                Some(&slot) => {
                    if kept[slot].p_max < br.p_max {
                        let i = kept[slot].i;
                        kept[slot] = br.clone();
                        kept[slot].i = i;
                    }
                }
                None => {
                    let mut br = br.clone();
                    br.i = kept.len();
                    by_pair.insert(br.key(), kept.len());
                    kept.push(br);
                }
            }
        }

        Network {
            bus: self.bus.clone(),
            branch: kept,
        }
    }

    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            num_buses: self.bus.len(),
            num_branches: self.branch.len(),
            num_open_branches: self.branch.iter().filter(|br| !br.closed).count(),
            num_transformers: self.bus.iter().map(|b| b.transformers.len()).sum(),
            num_loads: self.bus.iter().filter(|b| b.load.is_some()).count(),
        }
    }
}

/// Size summary of a network.
#[derive(Debug, Clone, Default)]
pub struct NetworkStats {
    pub num_buses: usize,
    pub num_branches: usize,
    pub num_open_branches: usize,
    pub num_transformers: usize,
    pub num_loads: usize,
}

impl std::fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} buses, {} branches ({} open), {} transformers, {} loads",
            self.num_buses,
            self.num_branches,
            self.num_open_branches,
            self.num_transformers,
            self.num_loads
        )
    }
}
