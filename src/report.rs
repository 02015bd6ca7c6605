
use std::io::{self, Write};

use serde::Serialize;

use crate::device::Device;
use crate::entity::BitstreamEntity;


#[derive(Debug, Serialize)]
pub struct PortReport {
    pub port: &'static str,
    /// Description of the upstream driver, or `None` when unconnected.
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EntityReport {
    pub kind: &'static str,
    pub description: String,
    pub matrix: usize,
    pub ibase: usize,
    pub oword: usize,
    pub config_len: usize,
    pub inputs: Vec<PortReport>,
    pub outputs: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct NetlistReport {
    pub part: &'static str,
    pub total_bits: usize,
    pub entities: Vec<EntityReport>,
}


fn source_description(device: &Device, entity: &BitstreamEntity, port: &str) -> Option<String> {
    match entity.input_connection(port) {
        Some(Some(source)) => device.get(source).map(|driver| driver.description()),
        _ => None,
    }
}

/// Builds the serializable netlist view of a device from each entity's
/// self-description. Callers hand it to serde_json for emission.
pub fn netlist_report(device: &Device) -> NetlistReport {
    let entities = device.entities().map(|(_, entity)| {
        let placement = entity.placement();
        let inputs = entity.input_ports().iter()
            .map(|&port| PortReport {
                port,
                source: source_description(device, entity, port),
            })
            .collect();
        EntityReport {
            kind: entity.kind(),
            description: entity.description(),
            matrix: placement.matrix,
            ibase: placement.ibase,
            oword: placement.oword,
            config_len: entity.config_len(),
            inputs,
            outputs: entity.output_ports().to_vec(),
        }
    }).collect();

    NetlistReport {
        part: device.part().name(),
        total_bits: device.topology().total_bits(),
        entities,
    }
}

/// Writes the diagnostic dump: one block per entity with placement,
/// config length, and input wiring.
pub fn dump_human_readable(device: &Device, writer: &mut impl Write) -> io::Result<()> {
    writeln!(writer, "{} configuration", device.part().name())?;
    writeln!(writer, "total config bits: {}", device.topology().total_bits())?;
    writeln!(writer, "entities: {}", device.len())?;

    for (_, entity) in device.entities() {
        let placement = entity.placement();
        writeln!(writer)?;
        writeln!(writer, "{}", entity.description())?;
        writeln!(
            writer,
            "  matrix {} / base bit {} / output word {}",
            placement.matrix, placement.ibase, placement.oword,
        )?;
        writeln!(writer, "  config bits: {}", entity.config_len())?;
        for &port in entity.input_ports() {
            match source_description(device, entity, port) {
                Some(source) => writeln!(writer, "  {} <- {}", port, source)?,
                None => writeln!(writer, "  {} <- (unconnected)", port)?,
            }
        }
    }
    Ok(())
}
