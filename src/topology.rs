
use itertools::iproduct;


/// Device parts this library can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    Ms20,
    Ms40,
}

impl Part {
    pub fn name(self) -> &'static str {
        match self {
            Self::Ms20 => "MS20",
            Self::Ms40 => "MS40",
        }
    }

    /// Total length of the configuration image, in bits.
    pub fn total_bits(self) -> usize {
        match self {
            Self::Ms20 => 1024,
            Self::Ms40 => 2048,
        }
    }

    pub fn matrix_count(self) -> usize {
        match self {
            Self::Ms20 => 1,
            Self::Ms40 => 2,
        }
    }

    /// Number of output words each matrix provides.
    pub fn output_words_per_matrix(self) -> usize {
        32
    }
}


/// One output slot of a matrix fabric. At most one entity drives a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OutputSlot {
    pub matrix: usize,
    pub oword: usize,
}

impl OutputSlot {
    pub fn name(self) -> String {
        format!("$slot[{},{}]", self.matrix, self.oword)
    }
}


/// The fixed geometry of a device part: how many matrix fabrics it has,
/// how many output words each provides, and how long the image is.
#[derive(Debug, Clone, Copy)]
pub struct DeviceTopology {
    part: Part,
}

impl DeviceTopology {
    pub fn new(part: Part) -> Self {
        Self { part }
    }

    pub fn part(&self) -> Part {
        self.part
    }

    pub fn total_bits(&self) -> usize {
        self.part.total_bits()
    }

    pub fn matrix_count(&self) -> usize {
        self.part.matrix_count()
    }

    pub fn output_words_per_matrix(&self) -> usize {
        self.part.output_words_per_matrix()
    }

    pub fn has_slot(&self, slot: OutputSlot) -> bool {
        slot.matrix < self.matrix_count() && slot.oword < self.output_words_per_matrix()
    }

    pub fn iter_output_slots(&self) -> impl Iterator<Item = OutputSlot> {
        iproduct!(0..self.matrix_count(), 0..self.output_words_per_matrix())
            .map(|(matrix, oword)| OutputSlot { matrix, oword })
    }
}
