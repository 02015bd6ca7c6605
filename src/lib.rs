
//! Bit-accurate configuration packing for the MS-series mixed-signal
//! programmable devices.
//!
//! The device is programmed by a flat image of configuration bits.
//! Every hardware primitive placed on it implements one contract
//! against that image: report how many bits it occupies, save its state
//! into its own range, load the state back out, and describe itself for
//! diagnostics. The [`Device`] composer owns the placed entities and
//! runs whole-image compose and decompose passes over them; the wiring
//! and report modules give the netlist layer a view of the result.

mod bitstream;
pub use bitstream::{Bitstream, BitstreamError};

mod topology;
pub use topology::{DeviceTopology, OutputSlot, Part};

mod entity;
pub use entity::{BitstreamEntity, EntityId, Placement};

mod primitives;
pub use primitives::{
    ClockSource, Counter, Flipflop, FlipflopTrigger, Inverter, Lut, LutMask, PowerRail,
    RailLevel, MAX_LUT_INPUTS, TERMINAL_COUNT_BITS,
};

mod device;
pub use device::{Device, DeviceError};

mod wiring;
pub use wiring::{unconnected_inputs, wiring_graph, NodeIndexMap, PortEdge, WiringError, WiringGraph};

mod report;
pub use report::{dump_human_readable, netlist_report, EntityReport, NetlistReport, PortReport};
