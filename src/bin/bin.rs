/*
 * Filename: /src/bin/bin.rs
 * Project: ks10mon
 * Created Date: 2021-09-08, 12:18:22
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

use clap::Parser;
use ks10mon::bus;
use ks10mon::bus::Register;
use ks10mon::monitor::console::CrosstermTerminal;
use ks10mon::monitor::dasm;
use ks10mon::monitor::{Monitor, MonitorConfig};
use std::io::{self, BufRead, Write};

/// KS10 console monitor
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Enable logging
    #[arg(short, long)]
    log: bool,

    /// Target memory size, in words
    #[arg(short, long, default_value_t = 0o2000000)]
    mem_size: usize,

    /// Fail boot image loads on a truncated file
    #[arg(short, long)]
    strict: bool,

    /// Command line to run before the prompt (may be repeated)
    #[arg(short, long)]
    command: Vec<String>,
}

/**
 * tells the operator the target stopped, with where it stopped.
 */
fn report_halt(m: &mut Monitor) {
    let pcir = m.ctx.bus.read_reg(Register::Pcir);
    let line = dasm::format_pcir(m.ctx.dasm.as_ref(), pcir);
    let _ = writeln!(m.ctx.out, "KS10: CPU halted.\n{}", line);
}

/**
 * runs a line, returns false once the operator asked to quit.
 */
fn run_line(m: &mut Monitor, line: &str) -> bool {
    if !m.execute(line) && !m.quit_requested() {
        report_halt(m);
    }
    !m.quit_requested()
}

pub fn main() {
    let args = Args::parse();
    ks10mon::enable_logging(args.log);

    let config = MonitorConfig {
        strict_image_load: args.strict,
        ..MonitorConfig::default()
    };
    let prompt = config.prompt.clone();
    let mut m = Monitor::new(
        bus::new_default(args.mem_size),
        Box::new(CrosstermTerminal::new()),
        Box::new(io::stdout()),
        config,
    );
    if let Err(e) = m.checkpoint().install_signal_handler() {
        eprintln!("KS10: can't install the interrupt handler: {}", e);
        return;
    }
    if let Err(e) = m.ctx.recall_config() {
        eprintln!("KS10: {}", e);
    }

    for line in args.command.iter() {
        if !run_line(&mut m, line) {
            return;
        }
    }

    let stdin = io::stdin();
    loop {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let mut full_string = String::new();
        match stdin.lock().read_line(&mut full_string) {
            Err(_) | Ok(0) => break,
            Ok(_) => (),
        };
        if !run_line(&mut m, full_string.trim()) {
            break;
        }
    }
}
