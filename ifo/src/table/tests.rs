/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: CC0-1.0
 */

use super::{
    *,
    testimage::{time, vmg_image, vts_image},
    tableread::ReadIfoExt,
};
use std::io::Cursor;
use rand::{thread_rng, Rng};

fn random_title() -> Title {

    let mut rng = thread_rng();

    Title {
        playback_type: rng.gen(),
        angle_count: rng.gen(),
        chapter_count: rng.gen(),
        parental_id_mask: rng.gen(),
        title_set_number: rng.gen(),
        title_number_in_set: rng.gen(),
        title_set_sector: rng.gen(),
    }
}

fn random_cell() -> Cell {

    let mut rng = thread_rng();

    Cell {
        category: rng.gen(),
        playback_time: time(rng.gen(), rng.gen(), rng.gen(), rng.gen()),
        first_sector: rng.gen(),
        last_sector: rng.gen(),
    }
}

#[test]
fn test_vmg_no_titles() {

    let image = vmg_image(&[]);
    let vmg = Cursor::new(image).read_video_manager().unwrap();

    assert!(vmg.titles.is_empty());
}

#[test]
fn test_vmg_titles() {

    let titles = vec![random_title(), random_title(), random_title()];
    let image = vmg_image(&titles);
    let vmg = Cursor::new(image).read_video_manager().unwrap();

    assert_eq!(vmg.titles, titles);
}

#[test]
fn test_vmg_title_count_capped_by_table_size() {

    let titles = vec![random_title(), random_title()];
    let mut image = vmg_image(&titles);

    // Claim a third title that the table has no room for.
    image[SECTOR_SIZE as usize + 1] = 3;

    let vmg = Cursor::new(image).read_video_manager().unwrap();

    assert_eq!(vmg.titles, titles);
}

#[test]
fn test_vmg_rejects_vts_magic() {

    let image = vts_image(&[], &[]);

    assert!(matches!(
        Cursor::new(image).read_video_manager(),
        Err(ReadError::UnrecognizedMagicNumber),
    ));
}

#[test]
fn test_vts_rejects_vmg_magic() {

    let image = vmg_image(&[]);

    assert!(matches!(
        Cursor::new(image).read_video_title_set(),
        Err(ReadError::UnrecognizedMagicNumber),
    ));
}

#[test]
fn test_empty_source() {
    assert!(matches!(
        Cursor::new(Vec::<u8>::new()).read_video_manager(),
        Err(ReadError::UnrecognizedMagicNumber),
    ));
}

#[test]
fn test_vmg_pointer_past_end() {

    let mut image = vmg_image(&[random_title()]);

    image[0xC4..0xC8].copy_from_slice(&100u32.to_be_bytes());

    assert!(matches!(
        Cursor::new(image).read_video_manager(),
        Err(ReadError::TableOutOfBounds { table: "TT_SRPT" }),
    ));
}

#[test]
fn test_vmg_truncated() {

    let mut image = vmg_image(&[random_title(), random_title()]);

    image.truncate(image.len() - 6);

    assert!(matches!(
        Cursor::new(image).read_video_manager(),
        Err(ReadError::TruncatedTable { table: "TT_SRPT" }),
    ));
}

#[test]
fn test_vts_tables() {

    let parts_of_title = vec![
        vec![
            PartOfTitle { program_chain_number: 1, program_number: 1 },
            PartOfTitle { program_chain_number: 1, program_number: 2 },
            PartOfTitle { program_chain_number: 1, program_number: 3 },
        ],
        vec![],
        vec![
            PartOfTitle { program_chain_number: 2, program_number: 1 },
        ],
    ];
    let program_chains = vec![
        ProgramChain {
            playback_time: time(0x01, 0x30, 0x00, 0xC0),
            program_map: vec![1, 3, 4],
            cells: vec![random_cell(), random_cell(), random_cell(), random_cell()],
        },
        ProgramChain {
            playback_time: time(0x00, 0x02, 0x00, 0x40),
            program_map: vec![1],
            cells: vec![random_cell()],
        },
        ProgramChain::default(),
    ];
    let image = vts_image(&parts_of_title, &program_chains);
    let vts = Cursor::new(image).read_video_title_set().unwrap();

    assert_eq!(vts.parts_of_title, parts_of_title);
    assert_eq!(vts.program_chains, program_chains);
}

#[test]
fn test_vts_truncated_pgc() {

    let program_chains = vec![
        ProgramChain {
            playback_time: time(0x00, 0x00, 0x05, 0xC0),
            program_map: vec![1, 2],
            cells: vec![random_cell(), random_cell()],
        },
    ];
    let mut image = vts_image(&[vec![]], &program_chains);

    image.truncate(image.len() - 10);

    assert!(matches!(
        Cursor::new(image).read_video_title_set(),
        Err(ReadError::TruncatedTable { table: "VTS_PGCIT" }),
    ));
}

#[test]
fn test_vts_inverted_ptt_offsets() {

    let parts_of_title = vec![
        vec![PartOfTitle { program_chain_number: 1, program_number: 1 }],
        vec![PartOfTitle { program_chain_number: 1, program_number: 2 }],
    ];
    let mut image = vts_image(&parts_of_title, &[]);
    let offsets = SECTOR_SIZE as usize + 8;

    // Swap the two title offsets so the first run would end before it starts.
    let first: [u8; 4] = image[offsets..offsets + 4].try_into().unwrap();
    let second: [u8; 4] = image[offsets + 4..offsets + 8].try_into().unwrap();
    image[offsets..offsets + 4].copy_from_slice(&second);
    image[offsets + 4..offsets + 8].copy_from_slice(&first);

    assert!(matches!(
        Cursor::new(image).read_video_title_set(),
        Err(ReadError::TableOutOfBounds { table: "VTS_PTT_SRPT" }),
    ));
}

#[test]
fn test_vts_ptt_last_byte_past_end() {

    let parts_of_title = vec![
        vec![PartOfTitle { program_chain_number: 1, program_number: 1 }],
    ];
    let mut image = vts_image(&parts_of_title, &[]);
    let last_byte = SECTOR_SIZE as usize + 4;

    image[last_byte..last_byte + 4].copy_from_slice(&u32::MAX.to_be_bytes());

    assert!(matches!(
        Cursor::new(image).read_video_title_set(),
        Err(ReadError::TruncatedTable { table: "VTS_PTT_SRPT" }),
    ));
}
