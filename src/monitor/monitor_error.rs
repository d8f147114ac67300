/*
 * Filename: /src/monitor/monitor_error.rs
 * Project: ks10mon
 * Created Date: 2021-09-03, 09:44:27
 * Author: valerino <xoanino@gmail.com>
 * Copyright (c) 2021 valerino
 *
 * MIT License
 *
 * Copyright (c) 2021 valerino
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy of
 * this software and associated documentation files (the "Software"), to deal in
 * the Software without restriction, including without limitation the rights to
 * use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies
 * of the Software, and to permit persons to whom the Software is furnished to do
 * so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use crate::utils::Addr;
use std::fmt;

/**
 * type of monitor error.
 */
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ErrorType {
    /// the operator interrupted the running command.
    Cancelled,
    /// bad command argument.
    InvalidArgument,
    /// non existent memory or device on the backplane.
    BusAccess,
    /// boot image could not be loaded.
    ImageLoad,
    /// local i/o (terminal, files).
    Io,
    /// a command code is registered twice.
    DuplicateCommand,
}
pub type MonitorErrorType = self::ErrorType;

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::Cancelled => write!(f, "Cancelled"),
            ErrorType::InvalidArgument => write!(f, "InvalidArgument"),
            ErrorType::BusAccess => write!(f, "BusAccess"),
            ErrorType::ImageLoad => write!(f, "ImageLoad"),
            ErrorType::Io => write!(f, "Io"),
            ErrorType::DuplicateCommand => write!(f, "DuplicateCommand"),
        }
    }
}

/**
 * to report errors within the whole crate
 */
#[derive(Debug)]
pub struct Error {
    pub t: ErrorType,
    address: Option<Addr>,
    msg: Option<String>,
}
pub type MonitorError = self::Error;

impl std::error::Error for MonitorError {}

impl std::fmt::Display for MonitorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        match (self.address, self.msg.as_ref()) {
            (Some(a), Some(m)) => write!(f, "Error ({}) at address={:08o}, {}", self.t, a, m),
            (Some(a), None) => write!(f, "Error ({}) at address={:08o}", self.t, a),
            (None, Some(m)) => write!(f, "Error ({}), msg={}", self.t, m),
            (None, None) => write!(f, "Error ({})", self.t),
        }
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        MonitorError {
            t: ErrorType::Io,
            address: None,
            msg: Some(err.to_string()),
        }
    }
}

impl MonitorError {
    /**
     * true if the operator aborted the command.
     */
    pub fn is_cancelled(&self) -> bool {
        self.t == ErrorType::Cancelled
    }
}

/**
 * creates a cancellation error, raised at checkpoint safe points.
 */
pub(crate) fn new_cancelled_error() -> MonitorError {
    MonitorError {
        t: ErrorType::Cancelled,
        address: None,
        msg: None,
    }
}

/**
 * creates an invalid argument error.
 */
pub(crate) fn new_invalid_argument(msg: &str) -> MonitorError {
    MonitorError {
        t: ErrorType::InvalidArgument,
        address: None,
        msg: Some(msg.to_string()),
    }
}

/**
 * creates a bus access (nxm/nxd) error.
 */
pub(crate) fn new_bus_access_error(address: Addr, msg: &str) -> MonitorError {
    MonitorError {
        t: ErrorType::BusAccess,
        address: Some(address),
        msg: Some(msg.to_string()),
    }
}

/**
 * creates an image load error.
 */
pub(crate) fn new_image_load_error(msg: &str) -> MonitorError {
    MonitorError {
        t: ErrorType::ImageLoad,
        address: None,
        msg: Some(msg.to_string()),
    }
}

/**
 * creates a duplicate command error.
 */
pub(crate) fn new_duplicate_command_error(code: &str) -> MonitorError {
    MonitorError {
        t: ErrorType::DuplicateCommand,
        address: None,
        msg: Some(format!("command \"{}\" already registered", code)),
    }
}
