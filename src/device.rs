
use itertools::Itertools;
use log::debug;
use thiserror::Error;

use crate::bitstream::{Bitstream, BitstreamError};
use crate::entity::{BitstreamEntity, EntityId};
use crate::topology::{DeviceTopology, OutputSlot, Part};
use crate::wiring::WiringError;


#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("{entity} is placed at {slot}, outside the {part} fabric")]
    BadPlacement { entity: String, slot: String, part: &'static str },

    #[error("{entity} and {other} both drive {slot}")]
    OutputCollision { entity: String, other: String, slot: String },

    #[error("config ranges of {a} and {b} overlap")]
    RangeOverlap { a: String, b: String },

    #[error("image has {actual} bits, {part} expects {expected}")]
    WrongImageLength { part: &'static str, expected: usize, actual: usize },

    #[error(transparent)]
    Bitstream(#[from] BitstreamError),
}


/// The device model: a part's topology plus the arena of placed
/// entities. The arena owns every entity; everything else refers to
/// them by `EntityId`.
#[derive(Debug)]
pub struct Device {
    topology: DeviceTopology,
    entities: Vec<BitstreamEntity>,
}

impl Device {
    pub fn new(part: Part) -> Self {
        Self {
            topology: DeviceTopology::new(part),
            entities: Vec::new(),
        }
    }

    pub fn part(&self) -> Part {
        self.topology.part()
    }

    pub fn topology(&self) -> &DeviceTopology {
        &self.topology
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> Option<&BitstreamEntity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut BitstreamEntity> {
        self.entities.get_mut(id.index())
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &BitstreamEntity)> {
        self.entities.iter().enumerate()
            .map(|(i, entity)| (EntityId(i as u32), entity))
    }

    /// Adds a placed entity to the arena. The placement must name a slot
    /// the part actually has, and no other entity may already drive it.
    pub fn add(&mut self, entity: BitstreamEntity) -> Result<EntityId, DeviceError> {
        let placement = entity.placement();
        let slot = OutputSlot { matrix: placement.matrix, oword: placement.oword };

        if ! self.topology.has_slot(slot) {
            return Err(DeviceError::BadPlacement {
                entity: entity.description(),
                slot: slot.name(),
                part: self.part().name(),
            });
        }

        let occupant = self.entities.iter().find(|other| {
            let p = other.placement();
            p.matrix == slot.matrix && p.oword == slot.oword
        });
        if let Some(other) = occupant {
            return Err(DeviceError::OutputCollision {
                entity: entity.description(),
                other: other.description(),
                slot: slot.name(),
            });
        }

        self.entities.push(entity);
        Ok(EntityId((self.entities.len() - 1) as u32))
    }

    /// Wires `source`'s output to the named input port of `sink`.
    /// `None` disconnects the port.
    pub fn connect(&mut self, sink: EntityId, port: &str, source: Option<EntityId>) -> Result<(), WiringError> {
        if sink.index() >= self.entities.len() {
            return Err(WiringError::DanglingId(sink));
        }
        if let Some(source) = source {
            if source.index() >= self.entities.len() {
                return Err(WiringError::DanglingId(source));
            }
        }
        self.entities[sink.index()].connect_input(port, source)
    }

    /// Checks the non-overlap invariant: every entity's
    /// `[ibase, ibase+config_len)` range lies inside the image and no
    /// two ranges intersect. Zero-length entities cannot collide and
    /// are skipped.
    fn validate_ranges(&self) -> Result<(), DeviceError> {
        let total = self.topology.total_bits();

        let mut ranges: Vec<(usize, usize, usize)> = self.entities.iter().enumerate()
            .filter(|(_, entity)| entity.config_len() > 0)
            .map(|(i, entity)| (entity.placement().ibase, entity.config_len(), i))
            .collect();

        for &(base, len, _) in &ranges {
            if base + len > total {
                return Err(BitstreamError::OutOfRange { base, len, total }.into());
            }
        }

        ranges.sort();
        for ((base_a, len_a, a), (base_b, _, b)) in ranges.into_iter().tuple_windows() {
            if base_a + len_a > base_b {
                return Err(DeviceError::RangeOverlap {
                    a: self.entities[a].description(),
                    b: self.entities[b].description(),
                });
            }
        }
        Ok(())
    }

    /// The compose pass: validates placement, sizes an all-false image,
    /// and has every entity save into its own range. Any failure aborts
    /// the pass; no partially-written image escapes.
    pub fn compose(&self) -> Result<Bitstream, DeviceError> {
        self.validate_ranges()?;

        let total = self.topology.total_bits();
        debug!("composing {} entities into a {} bit image", self.entities.len(), total);

        let mut bits = Bitstream::all_false(total);
        for entity in &self.entities {
            entity.save(&mut bits)?;
        }
        Ok(bits)
    }

    /// The decompose pass: the dual of `compose`. Reads every entity's
    /// state back out of an image of exactly the part's length.
    pub fn decompose(&mut self, bits: &Bitstream) -> Result<(), DeviceError> {
        let expected = self.topology.total_bits();
        if bits.len() != expected {
            return Err(DeviceError::WrongImageLength {
                part: self.part().name(),
                expected,
                actual: bits.len(),
            });
        }
        self.validate_ranges()?;

        debug!("decomposing a {} bit image into {} entities", expected, self.entities.len());
        for entity in &mut self.entities {
            entity.load(bits)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Placement;
    use crate::primitives::{
        ClockSource, Counter, Flipflop, FlipflopTrigger, Inverter, Lut, LutMask, PowerRail,
        RailLevel, TERMINAL_COUNT_BITS,
    };

    fn place(matrix: usize, ibase: usize, oword: usize) -> Placement {
        Placement { matrix, ibase, oword }
    }

    // A device with one of everything at disjoint offsets.
    fn build(part: Part) -> (Device, EntityId, EntityId, EntityId, EntityId) {
        let mut device = Device::new(part);
        let lut = device.add(BitstreamEntity::Lut(Lut::new(place(0, 0, 0), 4))).unwrap();
        let counter = device.add(BitstreamEntity::Counter(Counter::new(place(0, 16, 1)))).unwrap();
        let ff = device.add(BitstreamEntity::Flipflop(Flipflop::new(place(0, 32, 2)))).unwrap();
        let inverter = device.add(BitstreamEntity::Inverter(Inverter::new(place(0, 34, 3)))).unwrap();
        (device, lut, counter, ff, inverter)
    }

    #[test]
    fn compose_decompose_round_trip() {
        let (mut device, lut, counter, ff, _) = build(Part::Ms20);

        match device.get_mut(lut).unwrap() {
            BitstreamEntity::Lut(lut) => lut.set_mask(LutMask::new(0xbeef)),
            _ => unreachable!(),
        }
        match device.get_mut(counter).unwrap() {
            BitstreamEntity::Counter(counter) => {
                counter.set_terminal_count(12345);
                counter.set_clock(ClockSource::External);
            },
            _ => unreachable!(),
        }
        match device.get_mut(ff).unwrap() {
            BitstreamEntity::Flipflop(ff) => ff.set_trigger(FlipflopTrigger::FallingEdge),
            _ => unreachable!(),
        }

        let image = device.compose().unwrap();
        assert_eq!(image.len(), Part::Ms20.total_bits());

        // Load the image into a freshly built twin and compare states.
        let (mut twin, lut2, counter2, ff2, _) = build(Part::Ms20);
        twin.decompose(&image).unwrap();

        match twin.get(lut2).unwrap() {
            BitstreamEntity::Lut(lut) => assert_eq!(lut.mask(), LutMask::new(0xbeef)),
            _ => unreachable!(),
        }
        match twin.get(counter2).unwrap() {
            BitstreamEntity::Counter(counter) => {
                assert_eq!(counter.terminal_count(), 12345);
                assert_eq!(counter.clock(), ClockSource::External);
            },
            _ => unreachable!(),
        }
        match twin.get(ff2).unwrap() {
            BitstreamEntity::Flipflop(ff) => {
                assert_eq!(ff.trigger(), FlipflopTrigger::FallingEdge);
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn adjacent_ranges_do_not_cross_write() {
        let mut device = Device::new(Part::Ms20);
        let a = device.add(BitstreamEntity::Flipflop(Flipflop::new(place(0, 10, 0)))).unwrap();
        device.add(BitstreamEntity::Flipflop(Flipflop::new(place(0, 12, 1)))).unwrap();

        match device.get_mut(a).unwrap() {
            BitstreamEntity::Flipflop(ff) => {
                ff.set_init_state(true);
                ff.set_trigger(FlipflopTrigger::FallingEdge);
            },
            _ => unreachable!(),
        }

        let image = device.compose().unwrap();
        assert_eq!(image.bit(10).unwrap(), true);
        assert_eq!(image.bit(11).unwrap(), true);
        // The neighbor starting at bit 12 stayed all zero.
        assert_eq!(image.bit(12).unwrap(), false);
        assert_eq!(image.bit(13).unwrap(), false);
    }

    #[test]
    fn overlapping_ranges_are_rejected_before_any_write() {
        let mut device = Device::new(Part::Ms20);
        device.add(BitstreamEntity::Flipflop(Flipflop::new(place(0, 10, 0)))).unwrap();
        device.add(BitstreamEntity::Flipflop(Flipflop::new(place(0, 11, 1)))).unwrap();

        match device.compose() {
            Err(DeviceError::RangeOverlap { a, b }) => {
                assert_eq!(a, "$dff[0,10]");
                assert_eq!(b, "$dff[0,11]");
            },
            other => panic!("expected an overlap error, got {:?}", other),
        }

        let image = Bitstream::all_false(Part::Ms20.total_bits());
        assert!(matches!(device.decompose(&image), Err(DeviceError::RangeOverlap { .. })));
    }

    #[test]
    fn range_escaping_the_image_is_rejected() {
        let mut device = Device::new(Part::Ms20);
        let base = Part::Ms20.total_bits() - 8;
        device.add(BitstreamEntity::Counter(Counter::new(place(0, base, 0)))).unwrap();
        assert!(matches!(
            device.compose(),
            Err(DeviceError::Bitstream(BitstreamError::OutOfRange { .. })),
        ));
    }

    #[test]
    fn placement_outside_the_fabric_is_rejected() {
        let mut device = Device::new(Part::Ms20);
        let err = device.add(BitstreamEntity::Inverter(Inverter::new(place(1, 0, 0)))).unwrap_err();
        assert!(matches!(err, DeviceError::BadPlacement { .. }));

        let err = device.add(BitstreamEntity::Inverter(Inverter::new(place(0, 0, 32)))).unwrap_err();
        assert!(matches!(err, DeviceError::BadPlacement { .. }));
    }

    #[test]
    fn output_word_collisions_are_rejected() {
        let mut device = Device::new(Part::Ms20);
        device.add(BitstreamEntity::PowerRail(PowerRail::new(place(0, 0, 5), RailLevel::High))).unwrap();
        let err = device.add(BitstreamEntity::Inverter(Inverter::new(place(0, 10, 5)))).unwrap_err();
        match err {
            DeviceError::OutputCollision { entity, other, slot } => {
                assert_eq!(entity, "$inv[0,10]");
                assert_eq!(other, "$vdd[0,0]");
                assert_eq!(slot, "$slot[0,5]");
            },
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn wrong_image_length_is_rejected() {
        let (mut device, ..) = build(Part::Ms20);
        let image = Bitstream::all_false(100);
        assert_eq!(
            device.decompose(&image),
            Err(DeviceError::WrongImageLength {
                part: "MS20",
                expected: 1024,
                actual: 100,
            }),
        );
    }

    #[test]
    fn randomized_round_trips() {
        use rand::prelude::*;
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let width = rng.gen_range(2, 5);
            let (mut device, lut, counter, ff, _) = {
                let mut device = Device::new(Part::Ms40);
                let lut = device.add(BitstreamEntity::Lut(Lut::new(place(0, 0, 0), width))).unwrap();
                let counter = device.add(BitstreamEntity::Counter(Counter::new(place(0, 16, 1)))).unwrap();
                let ff = device.add(BitstreamEntity::Flipflop(Flipflop::new(place(1, 32, 2)))).unwrap();
                let inverter = device.add(BitstreamEntity::Inverter(Inverter::new(place(1, 34, 3)))).unwrap();
                (device, lut, counter, ff, inverter)
            };

            let mask = LutMask::new(rng.gen_range(0, 1u32 << (1 << width)) as u16);
            let terminal_count = rng.gen_range(0, 1u32 << TERMINAL_COUNT_BITS);
            let clock = *[ClockSource::LfOsc, ClockSource::RingOsc, ClockSource::External]
                .choose(&mut rng).unwrap();
            let trigger = *[FlipflopTrigger::RisingEdge, FlipflopTrigger::FallingEdge]
                .choose(&mut rng).unwrap();
            let init_state = rng.gen::<bool>();

            match device.get_mut(lut).unwrap() {
                BitstreamEntity::Lut(lut) => lut.set_mask(mask),
                _ => unreachable!(),
            }
            match device.get_mut(counter).unwrap() {
                BitstreamEntity::Counter(c) => {
                    c.set_terminal_count(terminal_count);
                    c.set_clock(clock);
                },
                _ => unreachable!(),
            }
            match device.get_mut(ff).unwrap() {
                BitstreamEntity::Flipflop(f) => {
                    f.set_trigger(trigger);
                    f.set_init_state(init_state);
                },
                _ => unreachable!(),
            }

            let image = device.compose().unwrap();
            device.decompose(&image).unwrap();

            match device.get(lut).unwrap() {
                BitstreamEntity::Lut(lut) => assert_eq!(lut.mask(), mask),
                _ => unreachable!(),
            }
            match device.get(counter).unwrap() {
                BitstreamEntity::Counter(c) => {
                    assert_eq!(c.terminal_count(), terminal_count);
                    assert_eq!(c.clock(), clock);
                },
                _ => unreachable!(),
            }
            match device.get(ff).unwrap() {
                BitstreamEntity::Flipflop(f) => {
                    assert_eq!(f.trigger(), trigger);
                    assert_eq!(f.init_state(), init_state);
                },
                _ => unreachable!(),
            }
        }
    }
}
