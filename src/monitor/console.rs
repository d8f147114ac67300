/*
 * Filename: /src/monitor/console.rs
 * Project: ks10mon
 * Created Date: 2021-09-06, 10:48:36
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

use crate::bus::{Register, LP_ONLINE};
use crate::monitor::dasm;
use crate::monitor::monitor_error::MonitorError;
use crate::monitor::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::*;
use std::io::{self, Write};
use std::time::Duration;

/// ^E, detach the console from the target.
pub const CNTL_E: u8 = 0x05;

/// ^L, set the printer on-line.
pub const CNTL_L: u8 = 0x0c;

/// ^T, print pc and the current instruction.
pub const CNTL_T: u8 = 0x14;

/// escape, the next key is sent to the target as is.
pub const ESC: u8 = 0x1b;

/**
 * the operator's terminal.
 */
pub trait Terminal {
    /**
     * true if INTR/QUIT/SUSP keys generate signals (the normal, cooked behaviour).
     */
    fn signal_keys(&self) -> bool;

    /**
     * enables or disables signal generation for INTR/QUIT/SUSP keys.
     */
    fn set_signal_keys(&mut self, enabled: bool) -> io::Result<()>;

    /**
     * waits at most timeout for a key, returns its byte if any.
     */
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/**
 * the process' own tty, through crossterm. signal keys are turned off by switching to raw mode.
 */
#[derive(Debug)]
pub struct CrosstermTerminal {
    raw: bool,
}

impl CrosstermTerminal {
    pub fn new() -> CrosstermTerminal {
        CrosstermTerminal {
            raw: terminal::is_raw_mode_enabled().unwrap_or(false),
        }
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermTerminal {
    fn signal_keys(&self) -> bool {
        !self.raw
    }

    fn set_signal_keys(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            terminal::disable_raw_mode()?;
        } else {
            terminal::enable_raw_mode()?;
        }
        self.raw = !enabled;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let k = match event::read()? {
            Event::Key(k) => k,
            _ => return Ok(None),
        };
        if k.kind == KeyEventKind::Release {
            return Ok(None);
        }
        let b = match k.code {
            KeyCode::Char(c) if !c.is_ascii() => return Ok(None),
            KeyCode::Char(c) if k.modifiers.contains(KeyModifiers::CONTROL) => {
                (c.to_ascii_uppercase() as u8) & 0x1f
            }
            KeyCode::Char(c) => c as u8,
            KeyCode::Enter => b'\n',
            KeyCode::Tab => b'\t',
            KeyCode::Backspace => 0x7f,
            KeyCode::Esc => ESC,
            _ => return Ok(None),
        };
        Ok(Some(b))
    }
}

impl Context {
    /**
     * hands the terminal to the running target: keys go to the target console, target output is
     * printed, until ^E (detach) or the target halts.
     *
     * ^T prints pc and the current instruction, ^L sets the printer on-line. ESC makes the next key
     * go to the target as is (ESC ESC sends one ESC). a newline is sent as a carriage return.
     *
     * signal keys are off and interrupts ignored while attached, ^C is just a key for the target.
     * the terminal may be in raw mode (no output processing), so the monitor's own lines end in
     * \r\n. the terminal is put back as it was on every way out.
     *
     * returns true if the target is still running (detached).
     */
    pub fn attach_to_target(&mut self) -> Result<bool, MonitorError> {
        let prev = self.term.signal_keys();
        self.term.set_signal_keys(false)?;
        self.checkpoint.suspend();
        debug!("console attached");

        let res = self.multiplex();

        self.checkpoint.resume();
        let restored = self.term.set_signal_keys(prev);
        debug!("console detached");
        res?;
        restored?;
        Ok(!self.bus.halted())
    }

    fn multiplex(&mut self) -> Result<(), MonitorError> {
        let mut escape = false;
        loop {
            if let Some(ch) = self.term.poll_key(self.config.poll_interval)? {
                if !escape && ch == ESC {
                    escape = true;
                } else if !escape && ch == CNTL_E {
                    write!(self.out, "^E\r\n")?;
                    self.out.flush()?;
                    return Ok(());
                } else if !escape && ch == CNTL_T {
                    let pcir = self.bus.read_reg(Register::Pcir);
                    write!(self.out, "{}\r\n", dasm::format_pcir(self.dasm.as_ref(), pcir))?;
                } else if !escape && ch == CNTL_L {
                    let lpccr = self.bus.read_reg(Register::Lpccr);
                    self.bus.write_reg(Register::Lpccr, lpccr | LP_ONLINE);
                    debug!("printer on-line");
                } else {
                    // the target console wants a carriage return, not a newline
                    let c = if ch == b'\n' { b'\r' } else { ch };
                    self.bus.put_char(c);
                    escape = false;
                }
            }

            // target output
            let mut printed = false;
            while let Some(c) = self.bus.get_char() {
                self.out.write_all(&[c])?;
                printed = true;
            }
            if printed {
                self.out.flush()?;
            }

            if self.bus.halted() {
                return Ok(());
            }
        }
    }
}
