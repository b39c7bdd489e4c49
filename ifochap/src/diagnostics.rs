/*
 * Copyright 2021 William Swartzendruber
 *
 * This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a
 * copy of the MPL was not distributed with this file, You can obtain one at
 * https://mozilla.org/MPL/2.0/.
 *
 * SPDX-License-Identifier: MPL-2.0
 */


use std::{
    io::{Result as IoResult, Write},
    sync::{Mutex, PoisonError},
};
use log::{Level, Log, Metadata, Record};

/// Holds on to every log record so it can be shown if, and only if, the run fails.
pub struct Diagnostics {
    messages: Mutex<Vec<(Level, String)>>,
}

impl Diagnostics {

    pub const fn new() -> Self {
        Self { messages: Mutex::new(Vec::new()) }
    }

    pub fn messages(&self) -> Vec<(Level, String)> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Writes out the buffered messages, if there are any.
    pub fn report<W: Write>(&self, output: &mut W) -> IoResult<()> {

        let messages = self.messages();

        if messages.is_empty() {
            return Ok(())
        }

        writeln!(output, "Messages reported by the IFO reader :")?;

        for (level, message) in messages {
            writeln!(output, "[{}] {}", level_label(level), message)?;
        }

        Ok(())
    }
}

impl Log for Diagnostics {

    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {
    }
}

pub fn level_label(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug | Level::Trace => "DEBUG",
    }
}
