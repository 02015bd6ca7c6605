
use crate::bitstream::{Bitstream, BitstreamError};
use crate::entity::{EntityId, Placement};


pub const TERMINAL_COUNT_BITS: usize = 14;

const CLOCK_SOURCE_BITS: usize = 2;


/// Which on-chip clock drives a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    LfOsc,
    RingOsc,
    External,
}

impl ClockSource {
    fn encode(self) -> u32 {
        match self {
            Self::LfOsc => 0b00,
            Self::RingOsc => 0b01,
            Self::External => 0b10,
        }
    }

    fn decode(raw: u32) -> Option<Self> {
        match raw {
            0b00 => Some(Self::LfOsc),
            0b01 => Some(Self::RingOsc),
            0b10 => Some(Self::External),
            _ => None,
        }
    }
}


/// A down-counter. Sixteen configuration bits: a 14-bit terminal count
/// followed by a 2-bit clock source selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    placement: Placement,
    terminal_count: u32,
    clock: ClockSource,
    reset: Option<EntityId>,
}

impl Counter {
    pub const INPUTS: &'static [&'static str] = &["RST"];
    pub const OUTPUTS: &'static [&'static str] = &["OUT"];
    pub const CONFIG_BITS: usize = 16;

    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            terminal_count: 0,
            clock: ClockSource::LfOsc,
            reset: None,
        }
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn terminal_count(&self) -> u32 {
        self.terminal_count
    }

    /// Sets the value the counter reloads from. Values that do not fit
    /// in the wire field are caught at save time.
    pub fn set_terminal_count(&mut self, terminal_count: u32) {
        self.terminal_count = terminal_count;
    }

    pub fn clock(&self) -> ClockSource {
        self.clock
    }

    pub fn set_clock(&mut self, clock: ClockSource) {
        self.clock = clock;
    }

    pub fn config_len(&self) -> usize {
        Self::CONFIG_BITS
    }

    pub fn save(&self, bits: &mut Bitstream) -> Result<(), BitstreamError> {
        let base = self.placement.ibase;
        bits.write_field(base, TERMINAL_COUNT_BITS, self.terminal_count)?;
        bits.write_field(base + TERMINAL_COUNT_BITS, CLOCK_SOURCE_BITS, self.clock.encode())
    }

    pub fn load(&mut self, bits: &Bitstream) -> Result<(), BitstreamError> {
        let base = self.placement.ibase;
        let terminal_count = bits.read_field(base, TERMINAL_COUNT_BITS)?;
        let raw = bits.read_field(base + TERMINAL_COUNT_BITS, CLOCK_SOURCE_BITS)?;
        let clock = ClockSource::decode(raw)
            .ok_or(BitstreamError::BadFieldValue { field: "counter clock source", raw })?;

        // Both fields decoded; commit.
        self.terminal_count = terminal_count;
        self.clock = clock;
        Ok(())
    }

    pub fn description(&self) -> String {
        format!("$cnt[{},{}]", self.placement.matrix, self.placement.ibase)
    }

    pub fn connect_input(&mut self, port: &str, source: Option<EntityId>) -> bool {
        if port == "RST" {
            self.reset = source;
            true
        }
        else {
            false
        }
    }

    pub fn input_connection(&self, port: &str) -> Option<Option<EntityId>> {
        if port == "RST" {
            Some(self.reset)
        }
        else {
            None
        }
    }
}
