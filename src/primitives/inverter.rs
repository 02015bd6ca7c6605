
use crate::bitstream::{Bitstream, BitstreamError};
use crate::entity::{EntityId, Placement};


/// A combinational inverter.
///
/// Its behavior is fixed, so it contributes no configuration bits of its
/// own. It still holds a slot in the shared addressing scheme: a
/// zero-length range at its base bit, which save and load touch only to
/// bounds-check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inverter {
    placement: Placement,
    input: Option<EntityId>,
}

impl Inverter {
    pub const INPUTS: &'static [&'static str] = &["IN"];
    pub const OUTPUTS: &'static [&'static str] = &["OUT"];

    pub fn new(placement: Placement) -> Self {
        Self { placement, input: None }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn config_len(&self) -> usize {
        0
    }

    /// Records the upstream source feeding the single input port,
    /// overwriting any previous connection. `None` marks the input as
    /// unconnected; the wiring layer reports it.
    pub fn set_input(&mut self, source: Option<EntityId>) {
        self.input = source;
    }

    pub fn input(&self) -> Option<EntityId> {
        self.input
    }

    pub fn save(&self, bits: &mut Bitstream) -> Result<(), BitstreamError> {
        // Nothing to write, but a placement past the end of the image is
        // still rejected here rather than silently accepted.
        bits.check_range(self.placement.ibase, 0)
    }

    pub fn load(&mut self, bits: &Bitstream) -> Result<(), BitstreamError> {
        bits.check_range(self.placement.ibase, 0)
    }

    pub fn description(&self) -> String {
        format!("$inv[{},{}]", self.placement.matrix, self.placement.ibase)
    }

    pub fn connect_input(&mut self, port: &str, source: Option<EntityId>) -> bool {
        if port == "IN" {
            self.input = source;
            true
        }
        else {
            false
        }
    }

    pub fn input_connection(&self, port: &str) -> Option<Option<EntityId>> {
        if port == "IN" {
            Some(self.input)
        }
        else {
            None
        }
    }
}
