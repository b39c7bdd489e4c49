/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: OSL-3.0
 */

//! Decodes BCD playback times and converts frame counts into milliseconds.


/// Decodes a byte holding two BCD digits.
///
/// No validation is done on the digits themselves.
pub fn decode_bcd(byte: u8) -> u32 {
    ((byte >> 4) as u32) * 10 + (byte & 0x0F) as u32
}

/// Returns the frame rate flagged by bits 6 and 7 of a playback time's frame byte.
///
/// A value of `01` denotes 25 FPS (PAL) while everything else is taken as 30 FPS (NTSC).
pub fn frame_rate_of(frame_byte: u8) -> u32 {
    if (frame_byte & 0xC0) >> 6 == 1 {
        25
    } else {
        30
    }
}

/// Converts a frame count into milliseconds.
///
/// At 30 FPS, the result is scaled by 1001/1000 to reflect the actual NTSC rate of 29.97 FPS.
/// A frame rate of zero is treated as one.
pub fn frames_to_ms(total_frames: u64, fps: u32) -> u64 {

    let factor = if fps == 30 { 1001 } else { 1000 };

    total_frames * factor / fps.max(1) as u64
}

/// Renders a millisecond timestamp as `HH:MM:SS.mmm`.
pub fn format_timestamp(timestamp_ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        timestamp_ms / 3_600_000,
        (timestamp_ms / 60_000) % 60,
        (timestamp_ms / 1_000) % 60,
        timestamp_ms % 1_000,
    )
}

/// A playback time as stored on disc: hours, minutes, seconds, and frames, each in BCD.
///
/// The upper two bits of the frame byte carry the frame rate flag.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PlaybackTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl PlaybackTime {

    pub fn hours(&self) -> u32 {
        decode_bcd(self.hour)
    }

    pub fn minutes(&self) -> u32 {
        decode_bcd(self.minute)
    }

    pub fn seconds(&self) -> u32 {
        decode_bcd(self.second)
    }

    /// The frame count within the current second, taken from the lower six bits.
    pub fn frames(&self) -> u32 {
        decode_bcd(self.frame & 0x3F)
    }

    pub fn frame_rate(&self) -> u32 {
        frame_rate_of(self.frame)
    }

    /// The whole duration expressed in frames at this time's own frame rate.
    pub fn total_frames(&self) -> u64 {

        let whole_seconds = (self.hours() * 3600 + self.minutes() * 60 + self.seconds()) as u64;

        whole_seconds * self.frame_rate() as u64 + self.frames() as u64
    }
}
