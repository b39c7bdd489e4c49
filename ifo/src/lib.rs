/*
 * SPDX-FileCopyrightText: 2021 William Swartzendruber <wswartzendruber@gmail.com>
 *
 * SPDX-License-Identifier: OSL-3.0
 */

//! Reads chapter information from DVD-Video navigation data.
//!
//! # Overview
//!
//! A DVD-Video disc keeps its navigation data in IFO files under the `VIDEO_TS` directory.
//! `VIDEO_TS.IFO` holds the Video Manager (VMG), which lists every title on the disc along
//! with the title set it belongs to. Each title set has its own `VTS_nn_0.IFO` holding the
//! part-of-title (chapter) table and the program chains that chapters point into.
//!
//! Chapter start times are not stored directly. Instead, each chapter points to a program
//! within a program chain, each program begins at a given cell, and each cell carries its own
//! BCD-encoded playback time. Summing those cell durations in order yields the chapter marks.
//!
//! The [`disc`] module opens a disc and its title sets, [`chapter`] computes chapter marks and
//! feeds them to a [`chapter::ChapterSink`], and [`matroska`] is a sink that produces Matroska
//! chapter XML.

pub mod chapter;
pub mod disc;
pub mod matroska;
pub mod table;
pub mod time;
