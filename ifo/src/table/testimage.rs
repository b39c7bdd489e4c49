/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: CC0-1.0
 */

//! Builds synthetic IFO images for tests.

use super::{PartOfTitle, ProgramChain, Title, SECTOR_SIZE, super::time::PlaybackTime};
use byteorder::{BigEndian, WriteBytesExt};

const PGC_HEADER_SIZE: usize = 0xEC;

pub fn vmg_image(titles: &[Title]) -> Vec<u8> {

    let mut image = header(b"DVDVIDEO-VMG");

    put_u32(&mut image, 0xC4, 1);
    pad_to_sector(&mut image);

    image.write_u16::<BigEndian>(titles.len() as u16).unwrap();
    image.write_u16::<BigEndian>(0).unwrap();
    image.write_u32::<BigEndian>((8 + 12 * titles.len() - 1) as u32).unwrap();

    for title in titles {
        image.write_u8(title.playback_type).unwrap();
        image.write_u8(title.angle_count).unwrap();
        image.write_u16::<BigEndian>(title.chapter_count).unwrap();
        image.write_u16::<BigEndian>(title.parental_id_mask).unwrap();
        image.write_u8(title.title_set_number).unwrap();
        image.write_u8(title.title_number_in_set).unwrap();
        image.write_u32::<BigEndian>(title.title_set_sector).unwrap();
    }

    image
}

pub fn vts_image(parts_of_title: &[Vec<PartOfTitle>], program_chains: &[ProgramChain]) -> Vec<u8> {

    let mut image = header(b"DVDVIDEO-VTS");

    pad_to_sector(&mut image);

    let ptt_srpt = ptt_srpt_table(parts_of_title);
    let ptt_srpt_sector = image.len() as u64 / SECTOR_SIZE;

    image.extend_from_slice(&ptt_srpt);
    pad_to_sector(&mut image);

    let pgcit = pgcit_table(program_chains);
    let pgcit_sector = image.len() as u64 / SECTOR_SIZE;

    image.extend_from_slice(&pgcit);

    put_u32(&mut image, 0xC8, ptt_srpt_sector as u32);
    put_u32(&mut image, 0xCC, pgcit_sector as u32);

    image
}

pub fn time(hour: u8, minute: u8, second: u8, frame: u8) -> PlaybackTime {
    PlaybackTime { hour, minute, second, frame }
}

fn header(magic: &[u8; 12]) -> Vec<u8> {

    let mut image = vec![0u8; 0x100];

    image[..12].copy_from_slice(magic);

    image
}

fn pad_to_sector(image: &mut Vec<u8>) {
    let sectors = (image.len() as u64 + SECTOR_SIZE - 1) / SECTOR_SIZE;
    image.resize((sectors * SECTOR_SIZE) as usize, 0);
}

fn put_u32(image: &mut [u8], at: usize, value: u32) {
    image[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

fn ptt_srpt_table(parts_of_title: &[Vec<PartOfTitle>]) -> Vec<u8> {

    let mut table = vec![];
    let mut offset = 8 + 4 * parts_of_title.len();
    let size = offset + parts_of_title.iter().map(|parts| 4 * parts.len()).sum::<usize>();

    table.write_u16::<BigEndian>(parts_of_title.len() as u16).unwrap();
    table.write_u16::<BigEndian>(0).unwrap();
    table.write_u32::<BigEndian>((size - 1) as u32).unwrap();

    for parts in parts_of_title {
        table.write_u32::<BigEndian>(offset as u32).unwrap();
        offset += 4 * parts.len();
    }

    for part in parts_of_title.iter().flatten() {
        table.write_u16::<BigEndian>(part.program_chain_number).unwrap();
        table.write_u16::<BigEndian>(part.program_number).unwrap();
    }

    table
}

fn pgcit_table(program_chains: &[ProgramChain]) -> Vec<u8> {

    let pgcs: Vec<Vec<u8>> = program_chains.iter().map(pgc).collect();
    let mut table = vec![];
    let mut offset = 8 + 8 * pgcs.len();
    let size = offset + pgcs.iter().map(Vec::len).sum::<usize>();

    table.write_u16::<BigEndian>(pgcs.len() as u16).unwrap();
    table.write_u16::<BigEndian>(0).unwrap();
    table.write_u32::<BigEndian>((size - 1) as u32).unwrap();

    for (index, pgc) in pgcs.iter().enumerate() {
        table.write_u8(0x80 | (index as u8 + 1)).unwrap();
        table.write_u8(0).unwrap();
        table.write_u16::<BigEndian>(0).unwrap();
        table.write_u32::<BigEndian>(offset as u32).unwrap();
        offset += pgc.len();
    }

    for pgc in pgcs {
        table.extend_from_slice(&pgc);
    }

    table
}

fn pgc(program_chain: &ProgramChain) -> Vec<u8> {

    let mut pgc = vec![0u8; PGC_HEADER_SIZE];
    let program_map_size = (program_chain.program_map.len() + 1) & !1;
    let cell_playback_offset = PGC_HEADER_SIZE + program_map_size;
    let time = &program_chain.playback_time;

    pgc[2] = program_chain.program_map.len() as u8;
    pgc[3] = program_chain.cells.len() as u8;
    pgc[4..8].copy_from_slice(&[time.hour, time.minute, time.second, time.frame]);

    if !program_chain.program_map.is_empty() {
        pgc[0xE6..0xE8].copy_from_slice(&(PGC_HEADER_SIZE as u16).to_be_bytes());
    }
    if !program_chain.cells.is_empty() {
        pgc[0xE8..0xEA].copy_from_slice(&(cell_playback_offset as u16).to_be_bytes());
    }

    pgc.extend_from_slice(&program_chain.program_map);
    pgc.resize(cell_playback_offset, 0);

    for cell in &program_chain.cells {
        let time = &cell.playback_time;
        pgc.write_u32::<BigEndian>(cell.category).unwrap();
        pgc.extend_from_slice(&[time.hour, time.minute, time.second, time.frame]);
        pgc.write_u32::<BigEndian>(cell.first_sector).unwrap();
        pgc.write_u32::<BigEndian>(0).unwrap();
        pgc.write_u32::<BigEndian>(0).unwrap();
        pgc.write_u32::<BigEndian>(cell.last_sector).unwrap();
    }

    pgc
}
