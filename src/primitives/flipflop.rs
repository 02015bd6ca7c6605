
use crate::bitstream::{Bitstream, BitstreamError};
use crate::entity::{EntityId, Placement};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipflopTrigger {
    RisingEdge,
    FallingEdge,
}


/// A D flip-flop. Two configuration bits: the power-on state of the
/// register and the clock edge that loads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flipflop {
    placement: Placement,
    trigger: FlipflopTrigger,
    init_state: bool,
    data: Option<EntityId>,
    clock: Option<EntityId>,
}

impl Flipflop {
    pub const INPUTS: &'static [&'static str] = &["D", "CLK"];
    pub const OUTPUTS: &'static [&'static str] = &["Q"];
    pub const CONFIG_BITS: usize = 2;

    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            trigger: FlipflopTrigger::RisingEdge,
            init_state: false,
            data: None,
            clock: None,
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn trigger(&self) -> FlipflopTrigger {
        self.trigger
    }

    pub fn set_trigger(&mut self, trigger: FlipflopTrigger) {
        self.trigger = trigger;
    }

    pub fn init_state(&self) -> bool {
        self.init_state
    }

    pub fn set_init_state(&mut self, init_state: bool) {
        self.init_state = init_state;
    }

    pub fn config_len(&self) -> usize {
        Self::CONFIG_BITS
    }

    pub fn save(&self, bits: &mut Bitstream) -> Result<(), BitstreamError> {
        let falling = matches!(self.trigger, FlipflopTrigger::FallingEdge);
        let encoded = self.init_state as u32 | (falling as u32) << 1;
        bits.write_field(self.placement.ibase, Self::CONFIG_BITS, encoded)
    }

    pub fn load(&mut self, bits: &Bitstream) -> Result<(), BitstreamError> {
        let raw = bits.read_field(self.placement.ibase, Self::CONFIG_BITS)?;
        self.init_state = raw & 0b01 != 0;
        self.trigger = if raw & 0b10 != 0 {
            FlipflopTrigger::FallingEdge
        }
        else {
            FlipflopTrigger::RisingEdge
        };
        Ok(())
    }

    pub fn description(&self) -> String {
        format!("$dff[{},{}]", self.placement.matrix, self.placement.ibase)
    }

    pub fn connect_input(&mut self, port: &str, source: Option<EntityId>) -> bool {
        match port {
            "D" => {
                self.data = source;
                true
            },
            "CLK" => {
                self.clock = source;
                true
            },
            _ => false,
        }
    }

    pub fn input_connection(&self, port: &str) -> Option<Option<EntityId>> {
        match port {
            "D" => Some(self.data),
            "CLK" => Some(self.clock),
            _ => None,
        }
    }
}
