/*
 * Copyright 2021 William Swartzendruber
 *
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a
 * copy of the MPL was not distributed with this file, You can obtain one at
 * https://mozilla.org/MPL/2.0/.
 *
 * SPDX-License-Identifier: MPL-2.0
 */


mod diagnostics;

use diagnostics::Diagnostics;
use ifo::{
    chapter::{read_title_chapters, ChapterError, ChapterEvent},
    disc::{DiscError, Dvd, OpenTitleSet},
    matroska::{MatroskaChapterWriter, RandomUids, UidSource},
    table::VideoManager,
};
use std::{
    error::Error,
    io::{stderr, stdout, BufWriter, Error as IoError, Write},
    process::exit,
};
use clap::{
    app_from_crate,
    crate_authors,
    crate_description,
    crate_name,
    crate_version,
    App,
    Arg,
    ArgMatches,
};
use log::LevelFilter;
use thiserror::Error as ThisError;

static DIAGNOSTICS: Diagnostics = Diagnostics::new();

#[derive(ThisError, Debug)]
enum RunError {
    #[error("could not open DVD")]
    DiscError {
        #[from]
        source: DiscError,
    },
    #[error("Title {requested} requested, but DVD has {count} titles.")]
    TitleOutOfRange {
        requested: usize,
        count: usize,
    },
    #[error("could not compute chapters")]
    ChapterError {
        #[from]
        source: ChapterError,
    },
    #[error("could not write chapters")]
    OutputError {
        #[from]
        source: IoError,
    },
}

fn main() {

    let matches = app().get_matches();
    let input_value = matches.value_of("input").unwrap();
    let title = title_of(&matches);

    if log::set_logger(&DIAGNOSTICS).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }

    if let Err(err) = run(input_value, title) {
        eprintln!("{}", describe(&err));
        if let Err(report_err) = DIAGNOSTICS.report(&mut stderr()) {
            eprintln!("Could not report diagnostic messages: {}", report_err);
        }
        exit(1)
    }
}

fn app() -> App<'static, 'static> {
    app_from_crate!()
        .arg(Arg::with_name("input")
            .index(1)
            .value_name("DVD-PATH")
            .help("DVD root or VIDEO_TS directory")
            .required(true)
        )
        .arg(Arg::with_name("title")
            .index(2)
            .value_name("TITLE")
            .help("Title to output chapters for; 0 or omitted for every title")
            .required(false)
            .validator(|value| {
                if value.parse::<usize>().is_ok() {
                    Ok(())
                } else {
                    Err("must be an unsigned integer".to_string())
                }
            })
        )
        .after_help(concat!("This utility will extract the chapters of DVD titles from their \
            IFO files and write them to STDOUT as Matroska chapter XML, ready for mkvmerge. \
            Each title becomes its own edition. Nothing is written if any title fails.\n\n\
            Copyright © 2021 William Swartzendruber\n\
            Licensed under the Mozilla Public License 2.0\n\
            <", env!("CARGO_PKG_REPOSITORY"), ">"))
}

/// The requested title number; zero when none was given.
fn title_of(matches: &ArgMatches) -> usize {
    matches.value_of("title")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0)
}

fn run(input: &str, title: usize) -> Result<(), RunError> {

    let dvd = Dvd::open(input)?;
    let titles = select_titles(title, dvd.video_manager().titles.len())?;
    let stdout = stdout();

    write_chapters(
        &dvd,
        dvd.video_manager(),
        &titles,
        BufWriter::new(stdout.lock()),
        RandomUids::new(),
    )?;

    Ok(())
}

/// Computes the chapters of every selected title, then writes them out as one document.
///
/// Nothing reaches `output` unless every title succeeds.
fn write_chapters<T, W, U>(
    title_sets: &T,
    video_manager: &VideoManager,
    titles: &[usize],
    output: W,
    uids: U,
) -> Result<W, RunError>
where
    T: OpenTitleSet + ?Sized,
    W: Write,
    U: UidSource,
{
    let mut events: Vec<ChapterEvent> = vec![];

    for &index in titles {
        read_title_chapters(title_sets, video_manager, index, &mut events)?;
    }

    let mut writer = MatroskaChapterWriter::begin(output, uids)?;

    for event in &events {
        event.send_to(&mut writer)?;
    }

    Ok(writer.finish()?)
}

/// Maps a title number from the command line onto zero-based title indices.
///
/// Zero selects every title on the disc.
fn select_titles(requested: usize, count: usize) -> Result<Vec<usize>, RunError> {
    match requested {
        0 => Ok((0..count).collect()),
        requested if requested <= count => Ok(vec![requested - 1]),
        requested => Err(RunError::TitleOutOfRange { requested, count }),
    }
}

fn describe(err: &RunError) -> String {
    match err {
        RunError::TitleOutOfRange { .. } => err.to_string(),
        RunError::DiscError { source }
        | RunError::ChapterError { source: ChapterError::DiscError { source } } => {
            format!("DVD read error : {}", error_chain(source))
        }
        _ => format!("Fatal error : {}", error_chain(err)),
    }
}

fn error_chain(err: &dyn Error) -> String {

    let mut text = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }

    text
}
