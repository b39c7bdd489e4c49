/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: OSL-3.0
 */

//! Opens a DVD-Video file structure and its title sets.
//!
//! A disc may be given either as the directory containing `VIDEO_TS` or as the `VIDEO_TS`
//! directory itself. File names are matched without regard to case, as discs copied from
//! some filesystems end up with lowercase names.
//!
//! Should an IFO file fail to read, its `.BUP` backup copy is tried instead.


use super::table::{ReadError, ReadIfoExt, ReadResult, VideoManager, VideoTitleSet};
use std::{
    fs::{read_dir, File},
    io::BufReader,
    path::{Path, PathBuf},
};
use log::{debug, info, warn};
use thiserror::Error as ThisError;

/// A specialized [`Result`](std::result::Result) type for disc-opening operations.
pub type DiscResult<T> = Result<T, DiscError>;

/// The error type for opening a disc or one of its title sets.
#[derive(ThisError, Debug)]
pub enum DiscError {
    /// Neither the path nor a `VIDEO_TS` directory beneath it holds `VIDEO_TS.IFO`.
    #[error("no DVD structure found under {}", .path.display())]
    MissingVideoTs {
        path: PathBuf,
    },
    /// The Video Manager could not be read from either `VIDEO_TS.IFO` or `VIDEO_TS.BUP`.
    #[error("failed to open DVD structure under {}", .path.display())]
    OpenVideoManager {
        path: PathBuf,
        source: ReadError,
    },
    /// Title sets are numbered from 1 through 99.
    #[error("title set number {number} is invalid")]
    InvalidTitleSetNumber {
        number: u8,
    },
    /// The title set could not be read from either its IFO file or its backup.
    #[error("failed to open IFO for title set {number}")]
    OpenTitleSet {
        number: u8,
        source: ReadError,
    },
}

/// Provides title sets on demand.
///
/// Each call produces a fresh, fully-read title set that the caller owns and drops when done.
pub trait OpenTitleSet {
    fn open_title_set(&self, number: u8) -> DiscResult<VideoTitleSet>;
}

/// An opened DVD-Video file structure.
#[derive(Debug)]
pub struct Dvd {
    video_ts: PathBuf,
    video_manager: VideoManager,
}

impl Dvd {

    /// Opens the disc at `path`, reading its Video Manager.
    pub fn open<P: AsRef<Path>>(path: P) -> DiscResult<Self> {

        let path = path.as_ref();
        let video_ts = locate_video_ts(path)
            .ok_or_else(|| DiscError::MissingVideoTs { path: path.to_path_buf() })?;

        info!("Opening DVD structure under {}", video_ts.display());

        let video_manager = read_ifo(&video_ts, "VIDEO_TS", |input| input.read_video_manager())
            .map_err(|source| DiscError::OpenVideoManager { path: path.to_path_buf(), source })?;

        Ok(
            Dvd {
                video_ts,
                video_manager,
            }
        )
    }

    /// The `VIDEO_TS` directory holding this disc's IFO files.
    pub fn path(&self) -> &Path {
        &self.video_ts
    }

    pub fn video_manager(&self) -> &VideoManager {
        &self.video_manager
    }
}

impl OpenTitleSet for Dvd {

    fn open_title_set(&self, number: u8) -> DiscResult<VideoTitleSet> {

        if number == 0 || number > 99 {
            return Err(DiscError::InvalidTitleSetNumber { number })
        }

        read_ifo(&self.video_ts, &format!("VTS_{:02}_0", number), |input| {
            input.read_video_title_set()
        })
        .map_err(|source| DiscError::OpenTitleSet { number, source })
    }
}

fn locate_video_ts(path: &Path) -> Option<PathBuf> {

    if let Some(video_ts) = find_entry(path, "VIDEO_TS") {
        if video_ts.is_dir() && find_entry(&video_ts, "VIDEO_TS.IFO").is_some() {
            return Some(video_ts)
        }
    }

    find_entry(path, "VIDEO_TS.IFO").map(|_| path.to_path_buf())
}

/// Looks for `name` within `directory`, ignoring ASCII case.
fn find_entry(directory: &Path, name: &str) -> Option<PathBuf> {

    let exact = directory.join(name);

    if exact.exists() {
        return Some(exact)
    }

    read_dir(directory)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|candidate| {
            candidate
                .file_name()
                .and_then(|file_name| file_name.to_str())
                .map_or(false, |file_name| file_name.eq_ignore_ascii_case(name))
        })
}

/// Reads `<stem>.IFO` from `video_ts`, falling back to `<stem>.BUP`.
///
/// If both fail, the error from the IFO file is returned.
fn read_ifo<T, F>(video_ts: &Path, stem: &str, read: F) -> ReadResult<T>
where
    F: Fn(&mut BufReader<File>) -> ReadResult<T>,
{
    let ifo_name = format!("{}.IFO", stem);
    let bup_name = format!("{}.BUP", stem);

    let ifo_err = match read_file(video_ts, &ifo_name, &read) {
        Ok(table) => return Ok(table),
        Err(err) => err,
    };

    warn!("Could not read {}: {}; trying {}", ifo_name, ifo_err, bup_name);

    read_file(video_ts, &bup_name, &read).map_err(|bup_err| {
        warn!("Could not read {}: {}", bup_name, bup_err);
        ifo_err
    })
}

fn read_file<T, F>(video_ts: &Path, name: &str, read: &F) -> ReadResult<T>
where
    F: Fn(&mut BufReader<File>) -> ReadResult<T>,
{
    let path = find_entry(video_ts, name).unwrap_or_else(|| video_ts.join(name));

    debug!("Reading {}", path.display());

    read(&mut BufReader::new(File::open(&path)?))
}
