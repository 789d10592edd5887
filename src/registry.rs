use std::collections::HashMap;

use crate::error::{BuildError, Result};
use crate::network::Bus;

/// Registry assigning dense internal indices to external bus ids.
///
/// The first registration of an id creates the bus with internal index equal
/// to the current registry size; indices are therefore 0-based, dense and in
/// first-seen order. Later registrations of the same id only merge the switch
/// cell into the bus's switch table and bump its registration count.
#[derive(Debug, Clone, Default)]
pub struct BusRegistry {
    buses: Vec<Bus>,
    e2i: HashMap<usize, usize>,
}

impl BusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    pub fn register(&mut self, bus_i: usize, base_kv: f64, panel_cell: (usize, usize), closed: bool) {
        match self.e2i.get(&bus_i) {
            Some(&i) => {
                let bus = &mut self.buses[i];
                bus.count += 1;
                bus.switches.insert(panel_cell, closed);
            }
            None => {
                let i = self.buses.len();
                let mut switches = HashMap::new();
                switches.insert(panel_cell, closed);
                self.buses.push(Bus {
                    i,
                    bus_i,
                    base_kv,
                    count: 1,
                    switches,
                    transformers: Vec::new(),
                    load: None,
                });
                self.e2i.insert(bus_i, i);
            }
        }
    }

    /// Internal index of an external id, if registered.
    pub fn index(&self, bus_i: usize) -> Option<usize> {
        self.e2i.get(&bus_i).copied()
    }

    /// Resolves an external id or fails with `UnknownBus`.
    pub fn resolve(&self, bus_i: usize) -> Result<&Bus> {
        self.index(bus_i)
            .map(|i| &self.buses[i])
            .ok_or(BuildError::UnknownBus(bus_i))
    }

    /// Switch state of a cell. A missing bus or a missing (panel, cell) entry
    /// reads as open: callers must assume disconnected, never fail.
    pub fn switch_closed(&self, bus_i: usize, panel: usize, cell: usize) -> bool {
        self.index(bus_i)
            .and_then(|i| self.buses[i].switches.get(&(panel, cell)))
            .copied()
            .unwrap_or(false)
    }

    pub fn bus_mut(&mut self, i: usize) -> &mut Bus {
        &mut self.buses[i]
    }

    /// Hands the bus arena over to the network, consuming the registry.
    pub fn into_buses(self) -> Vec<Bus> {
        self.buses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_dense_and_first_seen() {
        let mut reg = BusRegistry::new();
        reg.register(700, 10.0, (1, 1), true);
        reg.register(300, 10.0, (1, 2), true);
        reg.register(500, 10.0, (2, 1), false);

        assert_eq!(reg.len(), 3);
        assert_eq!(reg.index(700), Some(0));
        assert_eq!(reg.index(300), Some(1));
        assert_eq!(reg.index(500), Some(2));
    }

    #[test]
    fn reregistration_merges_switch_table() {
        let mut reg = BusRegistry::new();
        reg.register(700, 10.0, (1, 1), true);
        reg.register(700, 10.0, (1, 2), false);

        assert_eq!(reg.len(), 1);
        let bus = reg.resolve(700).unwrap();
        assert_eq!(bus.count, 2);
        assert_eq!(bus.switches[&(1, 1)], true);
        assert_eq!(bus.switches[&(1, 2)], false);
    }

    #[test]
    fn resolve_unknown_bus_fails() {
        let reg = BusRegistry::new();
        let err = reg.resolve(42).unwrap_err();
        assert!(err.to_string().contains("unknown bus 42"));
    }

    #[test]
    fn missing_switch_cell_reads_open() {
        let mut reg = BusRegistry::new();
        reg.register(700, 10.0, (1, 1), true);

        assert!(reg.switch_closed(700, 1, 1));
        assert!(!reg.switch_closed(700, 1, 2)); // cell never declared
        assert!(!reg.switch_closed(999, 1, 1)); // bus never registered
    }
}
