//! Amplifier-to-channel label mapping
//!
//! Fixed vendor channel codes for the 16 amplifiers of a detector, in
//! traversal order: amps 1-8 map to the `C1x` row left to right, amps
//! 9-16 to the `C0x` row right to left.

use thiserror::Error;

/// Number of channels per detector.
pub const NUM_CHANNELS: usize = 16;

const CHANNEL_CODES: [&str; NUM_CHANNELS] = [
    "C10", "C11", "C12", "C13", "C14", "C15", "C16", "C17", //
    "C07", "C06", "C05", "C04", "C03", "C02", "C01", "C00",
];

/// Amplifier index outside the fixed 1..=16 channel table.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("amplifier index {0} outside 1..=16")]
pub struct ChannelError(pub u32);

/// Vendor channel code for a 1-based amplifier index.
pub fn channel_label(amp: u32) -> Result<&'static str, ChannelError> {
    if amp == 0 || amp as usize > NUM_CHANNELS {
        return Err(ChannelError(amp));
    }
    Ok(CHANNEL_CODES[amp as usize - 1])
}
