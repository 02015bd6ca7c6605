
use crate::bitstream::{Bitstream, BitstreamError};
use crate::primitives::{Counter, Flipflop, Inverter, Lut, PowerRail};
use crate::wiring::WiringError;


/// Index of an entity in its device's arena. Entities refer to each
/// other through these, never through owning references; the device
/// outlives every connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}


/// Placement coordinates handed to an entity at construction and fixed
/// for its lifetime: which matrix fabric it sits in, where its
/// configuration bits start in the shared image, and which output word
/// it drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub matrix: usize,
    pub ibase: usize,
    pub oword: usize,
}


/// One hardware primitive's contribution to the bitstream.
///
/// The set of primitive kinds is closed; every operation dispatches with
/// an exhaustive match so that adding a kind forces every site to handle
/// it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitstreamEntity {
    Inverter(Inverter),
    Lut(Lut),
    Flipflop(Flipflop),
    Counter(Counter),
    PowerRail(PowerRail),
}

impl BitstreamEntity {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Inverter(_) => "inverter",
            Self::Lut(_) => "lut",
            Self::Flipflop(_) => "flipflop",
            Self::Counter(_) => "counter",
            Self::PowerRail(_) => "power_rail",
        }
    }

    pub fn placement(&self) -> Placement {
        match self {
            Self::Inverter(inverter) => inverter.placement(),
            Self::Lut(lut) => lut.placement(),
            Self::Flipflop(ff) => ff.placement(),
            Self::Counter(counter) => counter.placement(),
            Self::PowerRail(rail) => rail.placement(),
        }
    }

    /// Number of bits this entity occupies in the shared image. Fixed
    /// once the entity is constructed; zero is valid.
    pub fn config_len(&self) -> usize {
        match self {
            Self::Inverter(inverter) => inverter.config_len(),
            Self::Lut(lut) => lut.config_len(),
            Self::Flipflop(ff) => ff.config_len(),
            Self::Counter(counter) => counter.config_len(),
            Self::PowerRail(rail) => rail.config_len(),
        }
    }

    /// Writes this entity's configuration into its own range of the
    /// image and nowhere else.
    pub fn save(&self, bits: &mut Bitstream) -> Result<(), BitstreamError> {
        match self {
            Self::Inverter(inverter) => inverter.save(bits),
            Self::Lut(lut) => lut.save(bits),
            Self::Flipflop(ff) => ff.save(bits),
            Self::Counter(counter) => counter.save(bits),
            Self::PowerRail(rail) => rail.save(bits),
        }
    }

    /// Reads this entity's range back and reconstructs its state; the
    /// exact inverse of `save` for every state `save` accepts.
    pub fn load(&mut self, bits: &Bitstream) -> Result<(), BitstreamError> {
        match self {
            Self::Inverter(inverter) => inverter.load(bits),
            Self::Lut(lut) => lut.load(bits),
            Self::Flipflop(ff) => ff.load(bits),
            Self::Counter(counter) => counter.load(bits),
            Self::PowerRail(rail) => rail.load(bits),
        }
    }

    /// Short human-readable summary, kind plus placement, for logs and
    /// error messages.
    pub fn description(&self) -> String {
        match self {
            Self::Inverter(inverter) => inverter.description(),
            Self::Lut(lut) => lut.description(),
            Self::Flipflop(ff) => ff.description(),
            Self::Counter(counter) => counter.description(),
            Self::PowerRail(rail) => rail.description(),
        }
    }

    /// Named input ports in their fixed, variant-specific order. The
    /// netlist layer resolves wiring against these names.
    pub fn input_ports(&self) -> &'static [&'static str] {
        match self {
            Self::Inverter(_) => Inverter::INPUTS,
            Self::Lut(lut) => lut.input_ports(),
            Self::Flipflop(_) => Flipflop::INPUTS,
            Self::Counter(_) => Counter::INPUTS,
            Self::PowerRail(_) => PowerRail::INPUTS,
        }
    }

    pub fn output_ports(&self) -> &'static [&'static str] {
        match self {
            Self::Inverter(_) => Inverter::OUTPUTS,
            Self::Lut(_) => Lut::OUTPUTS,
            Self::Flipflop(_) => Flipflop::OUTPUTS,
            Self::Counter(_) => Counter::OUTPUTS,
            Self::PowerRail(_) => PowerRail::OUTPUTS,
        }
    }

    /// Wires an input port by name, overwriting any previous connection.
    /// `None` disconnects. No type compatibility is checked here; that
    /// belongs to the netlist layer.
    pub fn connect_input(&mut self, port: &str, source: Option<EntityId>) -> Result<(), WiringError> {
        let connected = match self {
            Self::Inverter(inverter) => inverter.connect_input(port, source),
            Self::Lut(lut) => lut.connect_input(port, source),
            Self::Flipflop(ff) => ff.connect_input(port, source),
            Self::Counter(counter) => counter.connect_input(port, source),
            Self::PowerRail(rail) => rail.connect_input(port, source),
        };
        if connected {
            Ok(())
        }
        else {
            Err(WiringError::UnknownPort {
                entity: self.description(),
                port: port.to_string(),
            })
        }
    }

    /// The connection state of a named input port: `None` if the port
    /// does not exist, `Some(None)` if it exists but is unconnected.
    pub fn input_connection(&self, port: &str) -> Option<Option<EntityId>> {
        match self {
            Self::Inverter(inverter) => inverter.input_connection(port),
            Self::Lut(lut) => lut.input_connection(port),
            Self::Flipflop(ff) => ff.input_connection(port),
            Self::Counter(counter) => counter.input_connection(port),
            Self::PowerRail(rail) => rail.input_connection(port),
        }
    }
}
