/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: OSL-3.0
 */

use super::{
    Cell,
    PartOfTitle,
    ProgramChain,
    Title,
    VideoManager,
    VideoTitleSet,
    SECTOR_SIZE,
    super::time::PlaybackTime,
};
use std::io::{Cursor, Error as IoError, ErrorKind, Read};
use byteorder::{BigEndian, ReadBytesExt};
use log::{debug, warn};
use thiserror::Error as ThisError;

/// A specialized [`Result`](std::result::Result) type for IFO-reading operations.
pub type ReadResult<T> = Result<T, ReadError>;

/// The error type for [ReadIfoExt].
#[derive(ThisError, Debug)]
pub enum ReadError {
    #[error("IFO IO error")]
    IoError {
        #[from]
        source: IoError,
    },
    #[error("IFO has unrecognized magic number")]
    UnrecognizedMagicNumber,
    #[error("{table} lies outside of the IFO file")]
    TableOutOfBounds {
        table: &'static str,
    },
    #[error("{table} is truncated")]
    TruncatedTable {
        table: &'static str,
    },
}

const VMG_MAGIC: &[u8; 12] = b"DVDVIDEO-VMG";
const VTS_MAGIC: &[u8; 12] = b"DVDVIDEO-VTS";

const TT_SRPT_ENTRY_SIZE: u64 = 12;
const PTT_ENTRY_SIZE: u64 = 4;
const PGCI_SRP_SIZE: u64 = 8;
const CELL_PLAYBACK_SIZE: u64 = 24;

/// Allows reading IFO files from a source.
pub trait ReadIfoExt {
    /// Reads the Video Manager from a `VIDEO_TS.IFO` source.
    fn read_video_manager(&mut self) -> ReadResult<VideoManager>;
    /// Reads the chapter and program chain tables from a `VTS_nn_0.IFO` source.
    fn read_video_title_set(&mut self) -> ReadResult<VideoTitleSet>;
}

impl<T: Read> ReadIfoExt for T {

    fn read_video_manager(&mut self) -> ReadResult<VideoManager> {

        let mut data = vec![];
        self.read_to_end(&mut data)?;

        let mut input = Cursor::new(data.as_slice());

        check_magic(&mut input, VMG_MAGIC)?;

        let tt_srpt_sector = read_pointer(&mut input, 0xC4, "VMG header")?;
        let titles = in_table("TT_SRPT", parse_tt_srpt(&mut input, tt_srpt_sector))?;

        debug!("Video manager lists {} titles", titles.len());

        Ok(VideoManager { titles })
    }

    fn read_video_title_set(&mut self) -> ReadResult<VideoTitleSet> {

        let mut data = vec![];
        self.read_to_end(&mut data)?;

        let mut input = Cursor::new(data.as_slice());

        check_magic(&mut input, VTS_MAGIC)?;

        let ptt_srpt_sector = read_pointer(&mut input, 0xC8, "VTS header")?;
        let pgcit_sector = read_pointer(&mut input, 0xCC, "VTS header")?;
        let parts_of_title = in_table(
            "VTS_PTT_SRPT",
            parse_ptt_srpt(&mut input, ptt_srpt_sector),
        )?;
        let program_chains = in_table("VTS_PGCIT", parse_pgcit(&mut input, pgcit_sector))?;

        debug!(
            "Video title set has {} titles and {} program chains",
            parts_of_title.len(),
            program_chains.len(),
        );

        Ok(
            VideoTitleSet {
                parts_of_title,
                program_chains,
            }
        )
    }
}

fn check_magic(input: &mut Cursor<&[u8]>, magic: &[u8; 12]) -> ReadResult<()> {

    let mut found = [0u8; 12];

    input.set_position(0);
    input.read_exact(&mut found).map_err(|_| ReadError::UnrecognizedMagicNumber)?;

    if &found != magic {
        return Err(ReadError::UnrecognizedMagicNumber)
    }

    Ok(())
}

fn read_pointer(input: &mut Cursor<&[u8]>, at: u64, table: &'static str) -> ReadResult<u64> {
    seek(input, at, table)?;
    in_table(table, input.read_u32::<BigEndian>().map_err(ReadError::from))
        .map(|sector| sector as u64 * SECTOR_SIZE)
}

fn seek(input: &mut Cursor<&[u8]>, position: u64, table: &'static str) -> ReadResult<()> {

    if position >= input.get_ref().len() as u64 {
        return Err(ReadError::TableOutOfBounds { table })
    }

    input.set_position(position);

    Ok(())
}

/// Reports running off the end of the data as a truncated table rather than a bare IO error.
fn in_table<T>(table: &'static str, result: ReadResult<T>) -> ReadResult<T> {
    result.map_err(|err| match err {
        ReadError::IoError { source } if source.kind() == ErrorKind::UnexpectedEof => {
            ReadError::TruncatedTable { table }
        }
        other => other,
    })
}

fn read_playback_time(input: &mut Cursor<&[u8]>) -> ReadResult<PlaybackTime> {
    Ok(
        PlaybackTime {
            hour: input.read_u8()?,
            minute: input.read_u8()?,
            second: input.read_u8()?,
            frame: input.read_u8()?,
        }
    )
}

fn parse_tt_srpt(input: &mut Cursor<&[u8]>, start: u64) -> ReadResult<Vec<Title>> {

    seek(input, start, "TT_SRPT")?;

    let mut count = input.read_u16::<BigEndian>()? as u64;
    input.read_u16::<BigEndian>()?;
    let last_byte = input.read_u32::<BigEndian>()? as u64;
    let capacity = (last_byte + 1).saturating_sub(8) / TT_SRPT_ENTRY_SIZE;

    if count > capacity {
        warn!(
            "TT_SRPT declares {} titles but only has room for {}; ignoring the rest",
            count,
            capacity,
        );
        count = capacity;
    }

    let mut titles = Vec::new();

    for _ in 0..count {

        let playback_type = input.read_u8()?;
        let angle_count = input.read_u8()?;
        let chapter_count = input.read_u16::<BigEndian>()?;
        let parental_id_mask = input.read_u16::<BigEndian>()?;
        let title_set_number = input.read_u8()?;
        let title_number_in_set = input.read_u8()?;
        let title_set_sector = input.read_u32::<BigEndian>()?;

        titles.push(
            Title {
                playback_type,
                angle_count,
                chapter_count,
                parental_id_mask,
                title_set_number,
                title_number_in_set,
                title_set_sector,
            }
        );
    }

    Ok(titles)
}

fn parse_ptt_srpt(input: &mut Cursor<&[u8]>, start: u64) -> ReadResult<Vec<Vec<PartOfTitle>>> {

    seek(input, start, "VTS_PTT_SRPT")?;

    let count = input.read_u16::<BigEndian>()? as usize;
    input.read_u16::<BigEndian>()?;
    let end = input.read_u32::<BigEndian>()? as u64 + 1;

    // The table's last byte is checked before it sizes anything.
    if start + end > input.get_ref().len() as u64 {
        return Err(ReadError::TruncatedTable { table: "VTS_PTT_SRPT" })
    }

    let mut offsets = Vec::with_capacity(count);

    for _ in 0..count {
        offsets.push(input.read_u32::<BigEndian>()? as u64);
    }

    let mut parts_of_title = Vec::with_capacity(count);

    for (index, &offset) in offsets.iter().enumerate() {

        let next = offsets.get(index + 1).copied().unwrap_or(end);

        if next < offset {
            return Err(ReadError::TableOutOfBounds { table: "VTS_PTT_SRPT" })
        }

        let count = (next - offset) / PTT_ENTRY_SIZE;
        let mut parts = Vec::with_capacity(count as usize);

        if count > 0 {
            seek(input, start + offset, "VTS_PTT_SRPT")?;
        }

        for _ in 0..count {
            parts.push(
                PartOfTitle {
                    program_chain_number: input.read_u16::<BigEndian>()?,
                    program_number: input.read_u16::<BigEndian>()?,
                }
            );
        }

        parts_of_title.push(parts);
    }

    Ok(parts_of_title)
}

fn parse_pgcit(input: &mut Cursor<&[u8]>, start: u64) -> ReadResult<Vec<ProgramChain>> {

    seek(input, start, "VTS_PGCIT")?;

    let count = input.read_u16::<BigEndian>()? as u64;
    input.read_u16::<BigEndian>()?;
    input.read_u32::<BigEndian>()?;

    let mut offsets = Vec::with_capacity(count as usize);

    for index in 0..count {
        seek(input, start + 8 + index * PGCI_SRP_SIZE + 4, "VTS_PGCIT")?;
        offsets.push(input.read_u32::<BigEndian>()? as u64);
    }

    let mut program_chains = Vec::with_capacity(offsets.len());

    for offset in offsets {
        program_chains.push(parse_pgc(input, start + offset)?);
    }

    Ok(program_chains)
}

fn parse_pgc(input: &mut Cursor<&[u8]>, start: u64) -> ReadResult<ProgramChain> {

    seek(input, start + 2, "PGC")?;

    let program_count = input.read_u8()? as u64;
    let cell_count = input.read_u8()? as u64;
    let playback_time = read_playback_time(input)?;

    seek(input, start + 0xE6, "PGC")?;

    let program_map_offset = input.read_u16::<BigEndian>()? as u64;
    let cell_playback_offset = input.read_u16::<BigEndian>()? as u64;
    let mut program_map = vec![0u8; program_count as usize];
    let mut cells = Vec::with_capacity(cell_count as usize);

    if program_count > 0 {
        seek(input, start + program_map_offset, "PGC program map")?;
        input.read_exact(&mut program_map)?;
    }

    for index in 0..cell_count {

        seek(
            input,
            start + cell_playback_offset + index * CELL_PLAYBACK_SIZE,
            "PGC cell playback table",
        )?;

        let category = input.read_u32::<BigEndian>()?;
        let playback_time = read_playback_time(input)?;
        let first_sector = input.read_u32::<BigEndian>()?;
        input.read_u32::<BigEndian>()?;
        input.read_u32::<BigEndian>()?;
        let last_sector = input.read_u32::<BigEndian>()?;

        cells.push(
            Cell {
                category,
                playback_time,
                first_sector,
                last_sector,
            }
        );
    }

    if let Some(cell) = program_map.iter().find(|&&cell| cell as u64 > cell_count) {
        debug!("PGC program map refers to cell {} of only {}", cell, cell_count);
    }

    Ok(
        ProgramChain {
            playback_time,
            program_map,
            cells,
        }
    )
}
