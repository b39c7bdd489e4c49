/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: OSL-3.0
 */

//! Models the IFO tables needed to locate chapters.
//!
//! # Overview
//!
//! Only a small portion of each IFO file is relevant to chapter extraction:
//!
//! 1. Title Search Pointer Table (TT_SRPT), from the Video Manager
//! 2. Part-of-Title Search Pointer Table (VTS_PTT_SRPT), from a Video Title Set
//! 3. Program Chain Information Table (VTS_PGCIT), from a Video Title Set
//!
//! Menus, stream attributes, and navigation commands are skipped entirely.
//!
//! ## Title Search Pointer Table (TT_SRPT)
//!
//! Lists every title on the disc. Each entry names the title set the title lives in, the
//! title's number within that set, and how many chapters (parts of title) it has.
//!
//! ## Part-of-Title Search Pointer Table (VTS_PTT_SRPT)
//!
//! For each title within the set, lists its chapters. Each chapter is a pointer to a program
//! number within a program chain.
//!
//! ## Program Chain Information Table (VTS_PGCIT)
//!
//! Holds the program chains themselves. A program chain maps program numbers to entry cell
//! numbers and lists the cells in playback order, each with its own playback time.

#[cfg(test)]
mod tests;

#[cfg(test)]
pub(crate) mod testimage;

mod tableread;

pub use tableread::*;

use super::time::PlaybackTime;

/// Size of one logical sector; table pointers within IFO files are given in sectors.
pub const SECTOR_SIZE: u64 = 2048;

/// Represents the Video Manager (`VIDEO_TS.IFO`).
#[derive(Clone, Debug, Default, Hash, PartialEq)]
pub struct VideoManager {
    /// The disc's title table (TT_SRPT), in title order.
    pub titles: Vec<Title>,
}

/// Represents a single TT_SRPT entry.
///
/// Only the chapter count and the title set references drive chapter computation; the
/// remaining fields are carried for inspection.
#[derive(Clone, Debug, Default, Hash, PartialEq)]
pub struct Title {
    pub playback_type: u8,
    pub angle_count: u8,
    /// The number of parts of title (chapters) this title has.
    pub chapter_count: u16,
    pub parental_id_mask: u16,
    /// The title set holding this title; this selects `VTS_nn_0.IFO`.
    pub title_set_number: u8,
    /// The 1-based number of this title within its title set (VTS_TTN).
    pub title_number_in_set: u8,
    pub title_set_sector: u32,
}

/// Represents a Video Title Set (`VTS_nn_0.IFO`).
#[derive(Clone, Debug, Default, Hash, PartialEq)]
pub struct VideoTitleSet {
    /// One chapter list per title in the set, indexed by VTS_TTN - 1.
    pub parts_of_title: Vec<Vec<PartOfTitle>>,
    /// The program chains, indexed by PGCN - 1.
    pub program_chains: Vec<ProgramChain>,
}

/// Points a chapter at a program within a program chain.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PartOfTitle {
    /// The 1-based program chain number (PGCN).
    pub program_chain_number: u16,
    /// The 1-based program number (PGN) within the program chain.
    pub program_number: u16,
}

/// Represents a program chain (PGC) from the VTS_PGCIT.
#[derive(Clone, Debug, Default, Hash, PartialEq)]
pub struct ProgramChain {
    /// Total playback time of the chain; informational only, chapter times come from the cells.
    pub playback_time: PlaybackTime,
    /// The 1-based entry cell number of each program, indexed by PGN - 1.
    pub program_map: Vec<u8>,
    pub cells: Vec<Cell>,
}

/// Represents a cell playback entry.
///
/// Only the playback time is used for chapter computation; the category and sector bounds
/// are informational.
#[derive(Clone, Debug, Default, Hash, PartialEq)]
pub struct Cell {
    pub category: u32,
    pub playback_time: PlaybackTime,
    pub first_sector: u32,
    pub last_sector: u32,
}
