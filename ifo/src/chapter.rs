/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: OSL-3.0
 */

//! Computes chapter start times for a title.
//!
//! # Overview
//!
//! Each chapter of a title is a part of title (PTT) pointing at a program within a program
//! chain. The program map of that chain gives the cell each program starts at, so a chapter
//! spans from its own entry cell up to the cell before the next chapter's entry cell. Summing
//! the playback times of those cells gives the chapter's length.
//!
//! Lengths are accumulated in frames and only converted into milliseconds when a chapter mark
//! is emitted, so NTSC rounding never compounds from one chapter to the next.
//!
//! The resulting marks are pushed into a [`ChapterSink`] as a stream of events:
//!
//! 1. Title start
//! 2. Chapter boundary, once per chapter, starting at zero
//! 3. Title end


use super::{
    disc::{DiscError, OpenTitleSet},
    table::{ProgramChain, VideoManager, VideoTitleSet},
    time::frames_to_ms,
};
use std::io::{Error as IoError, Result as IoResult};
use log::debug;
use thiserror::Error as ThisError;

/// A specialized [`Result`](std::result::Result) type for chapter operations.
pub type ChapterResult<T> = Result<T, ChapterError>;

/// The error type for chapter computation.
///
/// Apart from the disc and sink variants, these all indicate navigation tables that refer to
/// entries which do not exist.
#[derive(ThisError, Debug)]
pub enum ChapterError {
    #[error("title set could not be opened")]
    DiscError {
        #[from]
        source: DiscError,
    },
    #[error("title {index} does not exist")]
    NoSuchTitle {
        index: usize,
    },
    #[error("title set has no title number {number}")]
    NoSuchTitleNumberInSet {
        number: u8,
    },
    #[error("title has no part of title {index}")]
    NoSuchPartOfTitle {
        index: usize,
    },
    #[error("title set has no program chain {number}")]
    NoSuchProgramChain {
        number: u16,
    },
    #[error("program chain has no program {number}")]
    NoSuchProgram {
        number: u16,
    },
    #[error("program map refers to cell zero")]
    InvalidCellNumber,
    #[error("program chain has no cell {index}")]
    CellOutOfRange {
        index: usize,
    },
    #[error("chapter sink error")]
    SinkError {
        #[from]
        source: IoError,
    },
}

/// Receives chapter marks as they are computed.
pub trait ChapterSink {
    /// Signals the start of a title's chapters.
    fn title_start(&mut self) -> IoResult<()>;
    /// Delivers a chapter mark. `ordinal` is zero-based within the title.
    fn chapter_boundary(&mut self, ordinal: u32, timestamp_ms: u64) -> IoResult<()>;
    /// Signals that the title has no more chapters.
    fn title_end(&mut self) -> IoResult<()>;
}

/// A single event delivered to a [`ChapterSink`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ChapterEvent {
    TitleStart,
    ChapterBoundary {
        ordinal: u32,
        timestamp_ms: u64,
    },
    TitleEnd,
}

impl ChapterEvent {

    /// Delivers this event to `sink`, so recorded events can be replayed in order.
    pub fn send_to<S: ChapterSink + ?Sized>(&self, sink: &mut S) -> IoResult<()> {
        match *self {
            ChapterEvent::TitleStart => sink.title_start(),
            ChapterEvent::ChapterBoundary { ordinal, timestamp_ms } => {
                sink.chapter_boundary(ordinal, timestamp_ms)
            }
            ChapterEvent::TitleEnd => sink.title_end(),
        }
    }
}

/// Records events in order.
impl ChapterSink for Vec<ChapterEvent> {

    fn title_start(&mut self) -> IoResult<()> {
        self.push(ChapterEvent::TitleStart);
        Ok(())
    }

    fn chapter_boundary(&mut self, ordinal: u32, timestamp_ms: u64) -> IoResult<()> {
        self.push(ChapterEvent::ChapterBoundary { ordinal, timestamp_ms });
        Ok(())
    }

    fn title_end(&mut self) -> IoResult<()> {
        self.push(ChapterEvent::TitleEnd);
        Ok(())
    }
}

/// A zero-based, inclusive range of cells within a program chain.
///
/// The range is empty when `start_cell` exceeds `end_cell`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CellRange {
    pub start_cell: i32,
    pub end_cell: i32,
}

impl CellRange {

    pub fn is_empty(&self) -> bool {
        self.start_cell > self.end_cell
    }

    /// The cell indices in playback order.
    pub fn cells(&self) -> impl Iterator<Item = usize> {
        (self.start_cell.max(0)..=self.end_cell).map(|cell| cell as usize)
    }
}

/// A chapter's cells along with the program chain they belong to.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedChapter<'a> {
    pub program_chain: &'a ProgramChain,
    pub cells: CellRange,
}

/// Determines which cells make up `chapter` by looking ahead to `next_chapter`.
///
/// Both chapters are zero-based indices into the part-of-title list of the title numbered
/// `title_number_in_set`. The chapter runs from its own entry cell up to, but not including,
/// the entry cell of `next_chapter`. Cells are taken from `next_chapter`'s program chain,
/// which is the same chain for titles with a single default program chain.
///
/// No check is made that the resulting range is non-empty.
pub fn resolve_chapter_cells(
    title_set: &VideoTitleSet,
    title_number_in_set: u8,
    chapter: usize,
    next_chapter: usize,
) -> ChapterResult<ResolvedChapter> {

    let (_, start_cell) = entry_cell(title_set, title_number_in_set, chapter)?;
    let (program_chain, next_start_cell) = entry_cell(
        title_set,
        title_number_in_set,
        next_chapter,
    )?;

    Ok(
        ResolvedChapter {
            program_chain,
            cells: CellRange {
                start_cell: start_cell - 1,
                end_cell: next_start_cell - 2,
            },
        }
    )
}

/// Finds a chapter's program chain and its 1-based entry cell number.
fn entry_cell(
    title_set: &VideoTitleSet,
    title_number_in_set: u8,
    chapter: usize,
) -> ChapterResult<(&ProgramChain, i32)> {

    let parts = (title_number_in_set as usize)
        .checked_sub(1)
        .and_then(|index| title_set.parts_of_title.get(index))
        .ok_or(ChapterError::NoSuchTitleNumberInSet { number: title_number_in_set })?;
    let part = parts.get(chapter).ok_or(ChapterError::NoSuchPartOfTitle { index: chapter })?;
    let program_chain = (part.program_chain_number as usize)
        .checked_sub(1)
        .and_then(|index| title_set.program_chains.get(index))
        .ok_or(ChapterError::NoSuchProgramChain { number: part.program_chain_number })?;
    let cell = (part.program_number as usize)
        .checked_sub(1)
        .and_then(|index| program_chain.program_map.get(index))
        .copied()
        .ok_or(ChapterError::NoSuchProgram { number: part.program_number })?;

    if cell == 0 {
        return Err(ChapterError::InvalidCellNumber)
    }

    Ok((program_chain, cell as i32))
}

/// Computes the chapter marks of the title at zero-based `title` and feeds them to `sink`.
///
/// The title's title set is opened through `title_sets` and dropped before returning. If it
/// cannot be opened, nothing is sent to `sink`.
pub fn read_title_chapters<T, S>(
    title_sets: &T,
    video_manager: &VideoManager,
    title: usize,
    sink: &mut S,
) -> ChapterResult<()>
where
    T: OpenTitleSet + ?Sized,
    S: ChapterSink + ?Sized,
{
    let info = video_manager.titles.get(title).ok_or(ChapterError::NoSuchTitle { index: title })?;
    let title_set = title_sets.open_title_set(info.title_set_number)?;

    debug!(
        "Title {} is title {} of title set {} with {} chapters",
        title + 1,
        info.title_number_in_set,
        info.title_set_number,
        info.chapter_count,
    );

    sink.title_start()?;
    sink.chapter_boundary(0, 0)?;

    let mut overall_frames = 0u64;
    // DVDs are either NTSC or PAL throughout, so the last cell's rate stands for all of them.
    let mut fps = 0u32;

    for chapter in 0..(info.chapter_count as usize).saturating_sub(1) {

        let resolved = resolve_chapter_cells(
            &title_set,
            info.title_number_in_set,
            chapter,
            chapter + 1,
        )?;
        let mut chapter_frames = 0u64;

        for index in resolved.cells.cells() {

            let cell = resolved.program_chain
                .cells
                .get(index)
                .ok_or(ChapterError::CellOutOfRange { index })?;

            fps = cell.playback_time.frame_rate();
            chapter_frames += cell.playback_time.total_frames();
        }

        overall_frames += chapter_frames;
        sink.chapter_boundary(chapter as u32 + 1, frames_to_ms(overall_frames, fps))?;
    }

    sink.title_end()?;

    Ok(())
}
