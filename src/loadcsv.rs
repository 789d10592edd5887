use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::records::NetworkRecords;

/// Reads a directory of CSV tables into one record bundle.
///
/// Expected files: `buses.csv`, `cables.csv`, `lines.csv` (required) and
/// `transformers.csv`, `loads.csv` (optional, read as empty when absent).
/// Headers must match the record field names.
pub fn load_network_dir(dir: &Path) -> Result<NetworkRecords> {
    Ok(NetworkRecords {
        buses: read_table(&dir.join("buses.csv"))?,
        cables: read_table(&dir.join("cables.csv"))?,
        segments: read_table(&dir.join("lines.csv"))?,
        transformers: read_optional_table(&dir.join("transformers.csv"))?,
        loads: read_optional_table(&dir.join("loads.csv"))?,
    })
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

fn read_optional_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_table(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_tables(dir: &Path) {
        fs::write(
            dir.join("buses.csv"),
            "bus,base_kv,panel,cell,closed\n\
             100,10.0,1,1,true\n\
             200,10.0,1,1,true\n",
        )
        .unwrap();
        fs::write(
            dir.join("cables.csv"),
            "cable_type,r1,x1,c1,i_max\n\
             S-95-Alu-PRC-12,0.1,0.05,0.0,100.0\n",
        )
        .unwrap();
        fs::write(
            dir.join("lines.csv"),
            "line,f_bus,t_bus,f_panel,f_cell,t_panel,t_cell,length,voltage,section,core,insulation,insulation_voltage\n\
             1,100,200,1,1,1,1,2.0,10000.0,95,Alu,PRC,12\n",
        )
        .unwrap();
    }

    #[test]
    fn reads_required_tables_and_tolerates_missing_optional() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());

        let records = load_network_dir(dir.path()).unwrap();
        assert_eq!(records.buses.len(), 2);
        assert_eq!(records.cables.len(), 1);
        assert_eq!(records.segments.len(), 1);
        assert!(records.transformers.is_empty());
        assert!(records.loads.is_empty());

        let seg = &records.segments[0];
        assert_eq!(seg.line, 1);
        assert_eq!(seg.length, 2.0);
        assert_eq!(seg.section, "95");
    }

    #[test]
    fn missing_required_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_network_dir(dir.path()).is_err());
    }

    #[test]
    fn loaded_tables_build_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_tables(dir.path());
        fs::write(
            dir.path().join("loads.csv"),
            "bus,load_type,label,magnitude\n200,I1,load,55.0\n",
        )
        .unwrap();

        let records = load_network_dir(dir.path()).unwrap();
        let (net, report) = crate::builder::build_network(&records).unwrap();
        assert!(report.is_clean());
        assert_eq!(net.bus.len(), 2);
        assert_eq!(net.branch.len(), 1);
        assert!(net.bus[1].load.is_some());
    }
}
