//! Record constructors shared by the builder, network and diagnostics tests.
//!
//! Defaults describe one consistent 10 kV feeder: every switch cell is
//! (panel 1, cell 1) and the only cable type is "S-95-Alu-PRC-12".

use crate::records::{
    BusRecord, CableRecord, LoadRecord, NetworkRecords, SegmentRecord, TransformerRecord,
};

pub(crate) fn bus_record(bus: usize, panel: usize, cell: usize, closed: bool) -> BusRecord {
    BusRecord {
        bus,
        base_kv: 10.0,
        panel,
        cell,
        closed,
    }
}

pub(crate) fn cable_record(cable_type: &str, r1: f64, x1: f64, c1: f64, i_max: f64) -> CableRecord {
    CableRecord {
        cable_type: cable_type.to_string(),
        r1,
        x1,
        c1,
        i_max,
    }
}

pub(crate) fn segment_record(line: usize, f_bus: usize, t_bus: usize, length: f64) -> SegmentRecord {
    segment_record_with_cable(line, f_bus, t_bus, length, "95", "Alu")
}

pub(crate) fn segment_record_with_cable(
    line: usize,
    f_bus: usize,
    t_bus: usize,
    length: f64,
    section: &str,
    core: &str,
) -> SegmentRecord {
    SegmentRecord {
        line,
        f_bus,
        t_bus,
        f_panel: 1,
        f_cell: 1,
        t_panel: 1,
        t_cell: 1,
        length,
        voltage: 10_000.0,
        section: section.to_string(),
        core: core.to_string(),
        insulation: "PRC".to_string(),
        insulation_voltage: "12".to_string(),
    }
}

pub(crate) fn transformer_record(bus: usize, transformer: usize, p_max: f64) -> TransformerRecord {
    TransformerRecord {
        bus,
        transformer,
        p_max,
    }
}

pub(crate) fn load_record(bus: usize, load_type: &str, label: &str, magnitude: f64) -> LoadRecord {
    LoadRecord {
        bus,
        load_type: load_type.to_string(),
        label: label.to_string(),
        magnitude,
    }
}

/// A small but complete network: four buses, a split line, a spur, one
/// transformer and one load.
pub(crate) fn small_network_records() -> NetworkRecords {
    NetworkRecords {
        buses: vec![
            bus_record(100, 1, 1, true),
            bus_record(100, 1, 2, true),
            bus_record(200, 1, 1, true),
            bus_record(200, 2, 1, true),
            bus_record(300, 1, 1, true),
            bus_record(400, 1, 1, false),
        ],
        cables: vec![
            cable_record("S-95-Alu-PRC-12", 0.1, 0.05, 1.0, 100.0),
            cable_record("A-50-Cu-PRC-12", 0.3, 0.08, 0.0, 60.0),
        ],
        segments: vec![
            segment_record(1, 100, 200, 1.0),
            segment_record(1, 100, 200, 1.0),
            {
                let mut seg = segment_record_with_cable(2, 200, 300, 0.5, "50", "Cu");
                seg.f_panel = 2;
                seg
            },
            segment_record(3, 300, 400, 0.25),
        ],
        transformers: vec![transformer_record(200, 11, 250_000.0)],
        loads: vec![load_record(300, "I1", "load", 55.0)],
    }
}
