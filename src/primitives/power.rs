
use crate::bitstream::{Bitstream, BitstreamError};
use crate::entity::{EntityId, Placement};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailLevel {
    High,
    Low,
}


/// A constant-level driver: the fabric's always-high or always-low
/// source. No inputs, no configuration bits; the level is part of the
/// entity's identity, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerRail {
    placement: Placement,
    level: RailLevel,
}

impl PowerRail {
    pub const INPUTS: &'static [&'static str] = &[];
    pub const OUTPUTS: &'static [&'static str] = &["OUT"];

    pub fn new(placement: Placement, level: RailLevel) -> Self {
        Self { placement, level }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn level(&self) -> RailLevel {
        self.level
    }

    pub fn config_len(&self) -> usize {
        0
    }

    pub fn save(&self, bits: &mut Bitstream) -> Result<(), BitstreamError> {
        bits.check_range(self.placement.ibase, 0)
    }

    pub fn load(&mut self, bits: &Bitstream) -> Result<(), BitstreamError> {
        bits.check_range(self.placement.ibase, 0)
    }

    pub fn description(&self) -> String {
        let kind = match self.level {
            RailLevel::High => "vdd",
            RailLevel::Low => "gnd",
        };
        format!("${}[{},{}]", kind, self.placement.matrix, self.placement.ibase)
    }

    pub fn connect_input(&mut self, _port: &str, _source: Option<EntityId>) -> bool {
        false
    }

    pub fn input_connection(&self, _port: &str) -> Option<Option<EntityId>> {
        None
    }
}
