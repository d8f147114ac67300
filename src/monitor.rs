/*
 * Filename: /src/monitor.rs
 * Project: ks10mon
 * Created Date: 2021-09-03, 09:41:12
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

use crate::bus::{self, Bus};
use crate::utils::Word;
use checkpoint::Checkpoint;
use commands::Builtin;
use console::Terminal;
use dasm::Disassembler;
use log::*;
use std::io::Write;
use std::time::Duration;

pub mod breakpoints;
pub mod checkpoint;
pub(crate) mod commands;
pub mod console;
pub mod dasm;
pub mod loader;
pub mod monitor_error;

use monitor_error::MonitorError;

/**
 * monitor settings.
 */
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// prompt printed by the command loop.
    pub prompt: String,

    /// tokens kept per command, the rest is dropped.
    pub max_args: usize,

    /// keyboard polling delay while attached to the target.
    pub poll_interval: Duration,

    /// how long HA waits for the cpu to halt.
    pub halt_timeout: Duration,

    /// a truncated boot image fails the load instead of reading as zeroes.
    pub strict_image_load: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        MonitorConfig {
            prompt: String::from("KS10> "),
            max_args: 16,
            poll_interval: Duration::from_micros(100),
            halt_timeout: Duration::from_millis(100),
            strict_image_load: false,
        }
    }
}

/**
 * everything a command can touch: the backplane, the operator's terminal and output, and the
 * cancellation checkpoint.
 */
pub struct Context {
    /// the target backplane.
    pub bus: Box<dyn Bus>,

    /// the operator's terminal.
    pub term: Box<dyn Terminal>,

    /// where messages go.
    pub out: Box<dyn Write>,

    /// instruction disassembler, used by traces.
    pub dasm: Box<dyn Disassembler>,

    /// armed around every dispatched command.
    pub checkpoint: Checkpoint,

    /// settings.
    pub config: MonitorConfig,

    /// set by the QU command.
    pub quit: bool,
}

impl Context {
    /**
     * safe point for long running commands.
     */
    pub fn poll_cancel(&self) -> Result<(), MonitorError> {
        self.checkpoint.poll()
    }

    /**
     * initializes the console communications area in low memory.
     */
    pub fn recall_config(&mut self) -> Result<(), MonitorError> {
        let init: [(Word, Word); 9] = [
            (bus::SWITCH_ADDR, 0o400000400000),
            (bus::KASW_ADDR, 0o003740000000),
            (bus::CTYIN_ADDR, 0),
            (bus::CTYOUT_ADDR, 0),
            (bus::KLNIN_ADDR, 0),
            (bus::KLNOUT_ADDR, 0),
            (bus::RHBASE_ADDR, 0o000001776700),
            (bus::RHUNIT_ADDR, 0),
            (bus::MTPARM_ADDR, 0),
        ];
        for (addr, data) in init.iter() {
            self.bus.write_mem(*addr, *data);
            if self.bus.nxm_nxd() {
                writeln!(self.out, "KS10: can't initialize {:06o}. (NXM)", addr)?;
            }
        }
        Ok(())
    }
}

/**
 * a command implemented outside the monitor (device subcommands), registered in the command table.
 */
pub trait CommandHandler {
    /**
     * runs the command, args[0] is the command itself.
     *
     * returns true if the monitor should print the prompt again.
     */
    fn invoke(&mut self, ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError>;
}

/**
 * what a command code is bound to.
 */
enum Handler {
    Builtin(Builtin),
    External(Box<dyn CommandHandler>),
}

/**
 * the monitor: command table and dispatcher.
 */
pub struct Monitor {
    pub ctx: Context,
    table: Vec<(String, Handler)>,
}

impl Monitor {
    /**
     * creates a new monitor with the builtin commands.
     */
    pub fn new(
        bus: Box<dyn Bus>,
        term: Box<dyn Terminal>,
        out: Box<dyn Write>,
        config: MonitorConfig,
    ) -> Monitor {
        let table = commands::BUILTINS
            .iter()
            .map(|(code, b)| (code.to_string(), Handler::Builtin(*b)))
            .collect();
        Monitor {
            ctx: Context {
                bus,
                term,
                out,
                dasm: Box::new(dasm::FieldDasm),
                checkpoint: Checkpoint::new(),
                config,
                quit: false,
            },
            table,
        }
    }

    /**
     * replaces the disassembler used by traces.
     */
    pub fn set_disassembler(&mut self, d: Box<dyn Disassembler>) {
        self.ctx.dasm = d;
    }

    /**
     * binds a one or two characters command code to an external handler.
     */
    pub fn register(
        &mut self,
        code: &str,
        handler: Box<dyn CommandHandler>,
    ) -> Result<(), MonitorError> {
        let code = code.to_ascii_uppercase();
        if code.is_empty() || code.chars().count() > 2 {
            return Err(monitor_error::new_invalid_argument(&format!(
                "invalid command code \"{}\", must be 1 or 2 characters",
                code
            )));
        }
        if self.find(&code).is_some() {
            return Err(monitor_error::new_duplicate_command_error(&code));
        }
        debug!("registered command {}", code);
        self.table.push((code, Handler::External(handler)));
        Ok(())
    }

    /**
     * the checkpoint, to route interrupts to.
     */
    pub fn checkpoint(&self) -> Checkpoint {
        self.ctx.checkpoint.clone()
    }

    /**
     * true once QU has been executed.
     */
    pub fn quit_requested(&self) -> bool {
        self.ctx.quit
    }

    fn find(&self, key: &str) -> Option<usize> {
        self.table.iter().position(|(code, _)| code == key)
    }

    /**
     * runs a command line: one or more commands separated by ';', each made of space separated
     * tokens. commands are matched on the first two characters of the first token, case insensitive.
     *
     * an unknown command or an aborted one doesn't stop the rest of the line.
     *
     * returns the result of the last command run (true if none ran): true if the prompt should be
     * printed again.
     */
    pub fn execute(&mut self, line: &str) -> bool {
        let mut ret = true;
        for segment in line.split(';') {
            let args: Vec<&str> = segment
                .split(' ')
                .filter(|t| !t.is_empty())
                .take(self.ctx.config.max_args)
                .collect();
            if args.is_empty() {
                continue;
            }

            let key: String = args[0]
                .chars()
                .take(2)
                .map(|c| c.to_ascii_uppercase())
                .collect();
            let idx = match self.find(&key) {
                None => {
                    let _ = writeln!(self.ctx.out, "{}: Command not found.", args[0]);
                    continue;
                }
                Some(i) => i,
            };

            self.ctx.checkpoint.arm();
            let res = match &mut self.table[idx].1 {
                Handler::Builtin(b) => commands::invoke(*b, &mut self.ctx, &args),
                Handler::External(h) => h.invoke(&mut self.ctx, &args),
            };
            let tripped = self.ctx.checkpoint.is_tripped();
            self.ctx.checkpoint.disarm();

            ret = match res {
                Ok(_) if tripped => {
                    self.report_abort();
                    true
                }
                Ok(r) => r,
                Err(e) if e.is_cancelled() => {
                    self.report_abort();
                    true
                }
                Err(e) => {
                    warn!("{}: {}", args[0], e);
                    let _ = writeln!(self.ctx.out, "{}: {}", args[0], e);
                    true
                }
            };
        }
        self.ctx.checkpoint.disarm();
        let _ = self.ctx.out.flush();
        ret
    }

    fn report_abort(&mut self) {
        info!("command aborted");
        let _ = writeln!(self.ctx.out, "KS10: Command aborted. Caught SIGINT.");
    }
}
