use crate::constants::DEFAULT_INSTRUCTIONS_PER_SECOND;

/// # Quirks
/// Behaviours that differ between historical Chip-8 interpreters.
///
/// Every quirk defaults to off, which gives the behaviour most modern ROMs expect:
/// - `8XY6`/`8XYE` shift Vx in place
/// - `FX55`/`FX65` leave I untouched
/// - `FX1E` leaves VF untouched
/// - addresses past 0xFFF halt the machine
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `8XY6`/`8XYE` read their operand from Vy rather than Vx (COSMAC VIP)
    pub shift_uses_vy: bool,
    /// `FX55`/`FX65` leave I pointing one past the last register copied
    pub load_store_increments_i: bool,
    /// `FX1E` sets VF when I leaves the 12-bit address space
    pub add_i_sets_vf: bool,
    /// Out of range addresses are masked into memory instead of halting
    pub wrap_addresses: bool,
}

/// Settings for a single Chip-8 machine
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub instructions_per_second: u32,
    pub quirks: Quirks,
    /// Seed for `CXNN`; `None` seeds from the operating system
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            quirks: Quirks::default(),
            seed: None,
        }
    }
}
