/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: OSL-3.0
 */

//! Writes chapters as Matroska chapter XML, as accepted by `mkvmerge --chapters`.
//!
//! Each title becomes its own edition. Editions and chapter atoms are given unique IDs drawn
//! from a [`UidSource`].


use super::{chapter::ChapterSink, time::format_timestamp};
use std::io::{Result as IoResult, Write};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Supplies the IDs given to editions and chapter atoms.
///
/// Matroska reserves zero, so implementations must never return it.
pub trait UidSource {
    fn next_uid(&mut self) -> u64;
}

/// Draws IDs at random, the way `mkvmerge` does.
pub struct RandomUids {
    rng: StdRng,
}

impl RandomUids {

    pub fn new() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    /// Creates a reproducible sequence of IDs.
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomUids {
    fn default() -> Self { Self::new() }
}

impl UidSource for RandomUids {
    fn next_uid(&mut self) -> u64 {
        self.rng.gen_range(1..=u64::MAX)
    }
}

/// Counts IDs up from a starting value, skipping zero on wraparound.
pub struct SequentialUids {
    next: u64,
}

impl SequentialUids {
    pub fn new(first: u64) -> Self {
        Self { next: first.max(1) }
    }
}

impl Default for SequentialUids {
    fn default() -> Self { Self::new(1) }
}

impl UidSource for SequentialUids {
    fn next_uid(&mut self) -> u64 {
        let uid = self.next;
        self.next = self.next.checked_add(1).unwrap_or(1);
        uid
    }
}

/// A [`ChapterSink`] producing a Matroska chapter XML document.
///
/// The document is opened by [`begin`](Self::begin) and must be closed by
/// [`finish`](Self::finish).
pub struct MatroskaChapterWriter<W: Write, U: UidSource> {
    output: W,
    uids: U,
}

impl<W: Write, U: UidSource> MatroskaChapterWriter<W, U> {

    /// Writes the document header to `output`.
    pub fn begin(mut output: W, uids: U) -> IoResult<Self> {

        output.write_all(
            b"<?xml version=\"1.0\"?>\n\
            <!-- <!DOCTYPE Chapters SYSTEM \"matroskachapters.dtd\"> -->\n\
            <Chapters>\n",
        )?;

        Ok(Self { output, uids })
    }

    /// Closes the document and hands back the underlying writer.
    pub fn finish(mut self) -> IoResult<W> {

        self.output.write_all(b"</Chapters>\n")?;
        self.output.flush()?;

        Ok(self.output)
    }
}

impl<W: Write, U: UidSource> ChapterSink for MatroskaChapterWriter<W, U> {

    fn title_start(&mut self) -> IoResult<()> {
        write!(
            self.output,
            "  <EditionEntry>\n\
            \x20   <EditionFlagHidden>0</EditionFlagHidden>\n\
            \x20   <EditionFlagDefault>0</EditionFlagDefault>\n\
            \x20   <EditionFlagOrdered>0</EditionFlagOrdered>\n\
            \x20   <EditionUID>{}</EditionUID>\n",
            self.uids.next_uid(),
        )
    }

    fn chapter_boundary(&mut self, ordinal: u32, timestamp_ms: u64) -> IoResult<()> {
        write!(
            self.output,
            "    <ChapterAtom>\n\
            \x20     <ChapterUID>{}</ChapterUID>\n\
            \x20     <ChapterTimeStart>{}</ChapterTimeStart>\n\
            \x20     <ChapterDisplay>\n\
            \x20       <ChapterString>Chapter {:02}</ChapterString>\n\
            \x20       <ChapterLanguage>und</ChapterLanguage>\n\
            \x20       <ChapLanguageIETF>und</ChapLanguageIETF>\n\
            \x20     </ChapterDisplay>\n\
            \x20   </ChapterAtom>\n",
            self.uids.next_uid(),
            format_timestamp(timestamp_ms),
            ordinal + 1,
        )
    }

    fn title_end(&mut self) -> IoResult<()> {
        self.output.write_all(b"  </EditionEntry>\n")
    }
}
