/*
 * Filename: /src/monitor/commands.rs
 * Project: ks10mon
 * Created Date: 2021-09-07, 09:30:01
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

use crate::bus::{Bus, Register};
use crate::monitor::breakpoints::{BreakCondition, BreakUnit, IO_MASK};
use crate::monitor::dasm;
use crate::monitor::monitor_error::{self, MonitorError};
use crate::monitor::Context;
use crate::utils::{self, Word, HALF_MASK, OP_JRST};
use lazy_static::lazy_static;
use log::*;
use std::io::Write;
use std::time::{Duration, Instant};

/**
 * commands built into the monitor.
 */
#[derive(Debug, PartialEq, Clone, Copy)]
pub(crate) enum Builtin {
    Breakpoint,
    CacheEnable,
    Continue,
    Go,
    Halt,
    Help,
    Quit,
    Read,
    Step,
    Start,
    TimerEnable,
    TrapEnable,
    Write,
}

lazy_static! {
    /// builtin command codes.
    pub(crate) static ref BUILTINS: Vec<(&'static str, Builtin)> = vec![
        ("?", Builtin::Help),
        ("BR", Builtin::Breakpoint),
        ("CE", Builtin::CacheEnable),
        ("CO", Builtin::Continue),
        ("GO", Builtin::Go),
        ("HA", Builtin::Halt),
        ("HE", Builtin::Help),
        ("QU", Builtin::Quit),
        ("RD", Builtin::Read),
        ("SI", Builtin::Step),
        ("ST", Builtin::Start),
        ("TE", Builtin::TimerEnable),
        ("TP", Builtin::TrapEnable),
        ("WR", Builtin::Write),
    ];
}

/**
 * runs a builtin command.
 */
pub(crate) fn invoke(b: Builtin, ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    debug!("{:?}: {:?}", b, args);
    match b {
        Builtin::Breakpoint => cmd_breakpoint(ctx, args),
        Builtin::CacheEnable => cmd_enable(ctx, args, "ce", "cache", |b, e| b.cache_enable(e)),
        Builtin::Continue => cmd_continue(ctx, args),
        Builtin::Go => cmd_go(ctx, args),
        Builtin::Halt => cmd_halt(ctx, args),
        Builtin::Help => cmd_help(ctx),
        Builtin::Quit => {
            writeln!(ctx.out, "quit!")?;
            ctx.quit = true;
            Ok(true)
        }
        Builtin::Read => cmd_read(ctx, args),
        Builtin::Step => cmd_step(ctx, args),
        Builtin::Start => cmd_start(ctx, args),
        Builtin::TimerEnable => cmd_enable(ctx, args, "te", "timer", |b, e| b.timer_enable(e)),
        Builtin::TrapEnable => cmd_enable(ctx, args, "tp", "traps", |b, e| b.trap_enable(e)),
        Builtin::Write => cmd_write(ctx, args),
    }
}

/**
 * command line options: (name, value) pairs and positional arguments.
 */
struct Opts<'a> {
    opts: Vec<(&'a str, Option<&'a str>)>,
    positional: Vec<&'a str>,
}

impl<'a> Opts<'a> {
    fn has(&self, name: &str) -> bool {
        self.opts.iter().any(|(n, _)| *n == name)
    }
}

/**
 * splits args[1..] into options and positional arguments. options are `--name`, `--name=value`
 * or `--name value`; known lists (name, takes_value).
 */
fn getopt<'a>(args: &[&'a str], known: &[(&str, bool)]) -> Result<Opts<'a>, MonitorError> {
    let mut res = Opts {
        opts: Vec::new(),
        positional: Vec::new(),
    };
    let mut it = args.iter().skip(1);
    while let Some(&a) = it.next() {
        if !a.starts_with("--") {
            res.positional.push(a);
            continue;
        }
        let (name, inline) = match a[2..].split_once('=') {
            Some((n, v)) => (n, Some(v)),
            None => (&a[2..], None),
        };
        let takes_value = match known.iter().find(|(n, _)| *n == name) {
            None => {
                return Err(monitor_error::new_invalid_argument(&format!(
                    "unrecognized option: {}",
                    a
                )))
            }
            Some((_, t)) => *t,
        };
        let value = if takes_value {
            match inline {
                Some(v) => Some(v),
                None => match it.next() {
                    Some(v) => Some(*v),
                    None => {
                        return Err(monitor_error::new_invalid_argument(&format!(
                            "option --{} requires an argument",
                            name
                        )))
                    }
                },
            }
        } else {
            None
        };
        res.opts.push((name, value));
    }
    Ok(res)
}

/**
 * parses an address, checking it fits the given mask.
 */
fn parse_addr(s: &str, mask: Word) -> Result<Word, MonitorError> {
    let a = utils::parse_octal(s)?;
    if a & !mask != 0 {
        return Err(monitor_error::new_invalid_argument(&format!(
            "address {} out of range, valid addresses are 0-{:o}",
            s, mask
        )));
    }
    Ok(a)
}

const BR_USAGE: &str = "
The \"br#\" command controls the breakpoint hardware.

When a breakpoint condition is triggered, the breakpoint hardware halts the
processor at the completion of the current instruction. There are four
independent sets of breakpoint registers.

usage: br[#] [options] \"break_condition\"

  br  : all breakpoints
  br0 : breakpoint 0 ... br3 : breakpoint 3

Valid options are:

  --help          Print help message and exit.
  --disable       Disable the specified breakpoint(s) and exit.
  --mask=mask     Address bits asserted in the 22-bit mask are ignored when
                  matching. The default mask is 0.

One (and only one) of the following break conditions must be provided:

  --fetch=addr    Instruction fetch at addr.
  --mem=addr      Memory read or memory write at addr.
  --memrd=addr    Memory read at addr.
  --memwr=addr    Memory write at addr.
  --io=addr       IO read or IO write at addr.
  --iord=addr     IO read at addr.
  --iowr=addr     IO write at addr.
  --raw=brar,brmr Raw values for the breakpoint address and mask registers.

Numbers are octal. \"br\" with no options prints the status of all breakpoints.
";

/**
 * BR[#]: breakpoint status, arm and disarm.
 */
fn cmd_breakpoint(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    // "br" or "br#", nothing else
    let suffix: Vec<char> = args[0].chars().skip(2).collect();
    let unit = match suffix.as_slice() {
        [] => None,
        [c] if ('0'..='3').contains(c) => Some((*c as usize) - ('0' as usize)),
        _ => {
            return Err(monitor_error::new_invalid_argument(&format!(
                "invalid breakpoint unit \"{}\"",
                args[0]
            )))
        }
    };
    let sel = match unit {
        Some(n) => BreakUnit::Unit(n),
        None => BreakUnit::All,
    };

    // status
    if args.len() == 1 {
        let s = ctx.breakpoint_status(sel)?;
        write!(ctx.out, "{}", s)?;
        return Ok(true);
    }

    let o = getopt(
        args,
        &[
            ("help", false),
            ("disable", false),
            ("fetch", true),
            ("mem", true),
            ("memrd", true),
            ("memwr", true),
            ("io", true),
            ("iord", true),
            ("iowr", true),
            ("mask", true),
            ("raw", true),
        ],
    )?;
    if o.has("help") {
        write!(ctx.out, "{}", BR_USAGE)?;
        return Ok(true);
    }
    if o.has("disable") {
        ctx.disarm_breakpoint(sel)?;
        match unit {
            Some(n) => writeln!(ctx.out, "br{}: breakpoint disabled", n)?,
            None => writeln!(ctx.out, "br: all breakpoints disabled")?,
        }
        return Ok(true);
    }

    let mut mask = 0;
    let mut cond: Option<BreakCondition> = None;
    for (name, value) in o.opts.iter() {
        let v = value.unwrap_or_default();
        let c = match *name {
            "mask" => {
                mask = utils::parse_octal(v)? & IO_MASK;
                continue;
            }
            "fetch" => BreakCondition::Fetch(utils::parse_octal(v)?),
            "mem" => BreakCondition::Mem(utils::parse_octal(v)?),
            "memrd" => BreakCondition::MemRead(utils::parse_octal(v)?),
            "memwr" => BreakCondition::MemWrite(utils::parse_octal(v)?),
            "io" => BreakCondition::Io(utils::parse_octal(v)?),
            "iord" => BreakCondition::IoRead(utils::parse_octal(v)?),
            "iowr" => BreakCondition::IoWrite(utils::parse_octal(v)?),
            "raw" => match v.split_once(',') {
                Some((brar, brmr)) => {
                    BreakCondition::Raw(utils::parse_octal(brar)?, utils::parse_octal(brmr)?)
                }
                None => {
                    return Err(monitor_error::new_invalid_argument(
                        "--raw needs brar,brmr",
                    ))
                }
            },
            _ => continue,
        };
        if cond.is_some() {
            return Err(monitor_error::new_invalid_argument(
                "only one break condition can be given",
            ));
        }
        cond = Some(c);
    }
    if !o.positional.is_empty() {
        writeln!(ctx.out, "br: additional arguments ignored")?;
    }

    let cond = match cond {
        None => {
            return Err(monitor_error::new_invalid_argument(
                "a break condition is required",
            ))
        }
        Some(c) => c,
    };
    let n = match unit {
        None => {
            return Err(monitor_error::new_invalid_argument(
                "a breakpoint unit (br0-br3) is required",
            ))
        }
        Some(n) => n,
    };
    ctx.arm_breakpoint(n, &cond, mask)?;
    let s = ctx.breakpoint_status(BreakUnit::Unit(n))?;
    write!(ctx.out, "{}", s)?;
    Ok(true)
}

/**
 * CE/TE/TP: show or change one of the enables.
 */
fn cmd_enable(
    ctx: &mut Context,
    args: &[&str],
    cmd: &str,
    what: &str,
    f: fn(&mut dyn Bus, Option<bool>) -> bool,
) -> Result<bool, MonitorError> {
    let o = getopt(
        args,
        &[
            ("help", false),
            ("en", false),
            ("enable", false),
            ("dis", false),
            ("disable", false),
        ],
    )?;
    if o.has("help") {
        writeln!(
            ctx.out,
            "usage: {} [--en[able]] [--dis[able]], without options shows the {} status.",
            cmd, what
        )?;
        return Ok(true);
    }
    let enable = if o.has("en") || o.has("enable") {
        Some(true)
    } else if o.has("dis") || o.has("disable") {
        Some(false)
    } else {
        None
    };
    let state = f(ctx.bus.as_mut(), enable);
    match enable {
        None => writeln!(
            ctx.out,
            "{}: the {} is currently {}.",
            cmd,
            what,
            if state { "enabled" } else { "disabled" }
        )?,
        Some(_) => writeln!(
            ctx.out,
            "{}: the {} is {}",
            cmd,
            what,
            if state { "enabled" } else { "disabled" }
        )?,
    }
    Ok(true)
}

/**
 * CO: continue and attach the console.
 */
fn cmd_continue(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    let o = getopt(args, &[("help", false)])?;
    if o.has("help") {
        writeln!(ctx.out, "usage: co, continues the KS10 and attaches the console.")?;
        return Ok(true);
    }
    if !o.positional.is_empty() {
        writeln!(ctx.out, "co: additional arguments ignored")?;
    }
    ctx.bus.start_cont();
    ctx.attach_to_target()
}

/**
 * GO file.sav [addr]: load an executable, start it and attach the console.
 */
fn cmd_go(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    let o = getopt(args, &[("help", false)])?;
    if o.has("help") || o.positional.is_empty() {
        writeln!(
            ctx.out,
            "usage: go file.sav [addr], loads file.sav and starts it at addr (defaults to its starting address)."
        )?;
        return Ok(true);
    }
    let start = match o.positional.get(1) {
        Some(a) => Some(parse_addr(a, HALF_MASK)?),
        None => None,
    };
    let img = match ctx.load_file(o.positional[0])? {
        Some(img) => img,
        None => return Ok(true),
    };
    let entry = match start.or(img.entry) {
        Some(a) => a,
        None => {
            writeln!(ctx.out, "go: {} has no starting address", o.positional[0])?;
            return Ok(true);
        }
    };
    ctx.bus
        .write_reg(Register::Cir, utils::make_word(OP_JRST, entry));

    // programs expect the cache, traps and timer on
    ctx.bus.cache_enable(Some(true));
    ctx.bus.trap_enable(Some(true));
    ctx.bus.timer_enable(Some(true));
    ctx.bus.start_run();
    ctx.attach_to_target()
}

/**
 * HA: halt the cpu.
 */
fn cmd_halt(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    let o = getopt(args, &[("help", false)])?;
    if o.has("help") {
        writeln!(ctx.out, "usage: ha, halts the KS10.")?;
        return Ok(true);
    }
    if ctx.bus.halted() {
        writeln!(ctx.out, "ha: already halted")?;
        return Ok(true);
    }
    ctx.bus.run(false);
    let started = Instant::now();
    loop {
        if ctx.bus.halted() {
            return Ok(true);
        }
        if started.elapsed() >= ctx.config.halt_timeout {
            break;
        }
        ctx.poll_cancel()?;
        std::thread::sleep(Duration::from_millis(1));
    }
    writeln!(ctx.out, "ha: failed to halt the KS10")?;
    Ok(true)
}

/**
 * HE/?: list the commands.
 */
fn cmd_help(ctx: &mut Context) -> Result<bool, MonitorError> {
    writeln!(ctx.out, "monitor supported commands:")?;
    writeln!(ctx.out, "\t? ........................ this help.")?;
    writeln!(ctx.out, "\tbr[#] [options] .......... breakpoints, try 'br --help'.")?;
    writeln!(ctx.out, "\tce [--enable|--disable] .. cache enable.")?;
    writeln!(ctx.out, "\tco ....................... continue and attach the console.")?;
    writeln!(ctx.out, "\tgo <file.sav> [addr] ..... load an executable and start it.")?;
    writeln!(ctx.out, "\tha ....................... halt.")?;
    writeln!(ctx.out, "\the ....................... this help.")?;
    writeln!(ctx.out, "\tqu ....................... quit.")?;
    writeln!(ctx.out, "\trd <addr> [--io] ......... read a memory (or io) word.")?;
    writeln!(ctx.out, "\tsi [n] ................... step n instructions (default 1).")?;
    writeln!(ctx.out, "\tst <addr> ................ start at addr and attach the console.")?;
    writeln!(ctx.out, "\tte [--enable|--disable] .. timer enable.")?;
    writeln!(ctx.out, "\ttp [--enable|--disable] .. trap enable.")?;
    writeln!(ctx.out, "\twr <addr> <data> [--io] .. write a memory (or io) word.")?;
    writeln!(ctx.out, "while attached: ^E detaches, ^T traces, ^L sets the printer on-line, ESC sends the next key as is.")?;
    writeln!(ctx.out, "NOTE: all addresses/values are octal.")?;
    Ok(true)
}

/**
 * RD addr [--io]: read a word.
 */
fn cmd_read(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    let o = getopt(args, &[("help", false), ("io", false)])?;
    if o.has("help") || o.positional.is_empty() {
        writeln!(ctx.out, "usage: rd addr [--io], reads a memory (or io) word.")?;
        return Ok(true);
    }
    let io = o.has("io");
    let addr = parse_addr(o.positional[0], if io { IO_MASK } else { HALF_MASK })?;
    let data = if io {
        ctx.bus.read_io(addr)
    } else {
        ctx.bus.read_mem(addr)
    };
    if ctx.bus.nxm_nxd() {
        return Err(monitor_error::new_bus_access_error(
            addr,
            if io { "read failed. (NXD)" } else { "read failed. (NXM)" },
        ));
    }
    writeln!(ctx.out, "{:08o}: {:012o}", addr, data)?;
    Ok(true)
}

/**
 * WR addr data [--io]: write a word.
 */
fn cmd_write(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    let o = getopt(args, &[("help", false), ("io", false)])?;
    if o.has("help") || o.positional.len() < 2 {
        writeln!(ctx.out, "usage: wr addr data [--io], writes a memory (or io) word.")?;
        return Ok(true);
    }
    let io = o.has("io");
    let addr = parse_addr(o.positional[0], if io { IO_MASK } else { HALF_MASK })?;
    let data = utils::parse_octal(o.positional[1])?;
    if io {
        ctx.bus.write_io(addr, data);
    } else {
        ctx.bus.write_mem(addr, data);
    }
    if ctx.bus.nxm_nxd() {
        return Err(monitor_error::new_bus_access_error(
            addr,
            if io { "write failed. (NXD)" } else { "write failed. (NXM)" },
        ));
    }
    Ok(true)
}

/**
 * SI [n]: single step, printing pc and instruction after each step.
 */
fn cmd_step(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    let o = getopt(args, &[("help", false)])?;
    if o.has("help") {
        writeln!(ctx.out, "usage: si [n], steps n instructions (decimal, default 1).")?;
        return Ok(true);
    }
    let n = match o.positional.get(0) {
        None => 1,
        Some(s) => match s.parse::<usize>() {
            Ok(n) if n > 0 => n,
            _ => {
                return Err(monitor_error::new_invalid_argument(&format!(
                    "invalid step count \"{}\"",
                    s
                )))
            }
        },
    };
    if !ctx.bus.halted() {
        writeln!(ctx.out, "si: the KS10 is running, halt it first")?;
        return Ok(true);
    }
    for _ in 0..n {
        ctx.poll_cancel()?;
        ctx.bus.start_step();
        let pcir = ctx.bus.read_reg(Register::Pcir);
        let line = dasm::format_pcir(ctx.dasm.as_ref(), pcir);
        writeln!(ctx.out, "{}", line)?;
    }
    Ok(true)
}

/**
 * ST addr: start at addr and attach the console.
 */
fn cmd_start(ctx: &mut Context, args: &[&str]) -> Result<bool, MonitorError> {
    let o = getopt(args, &[("help", false)])?;
    if o.has("help") {
        writeln!(ctx.out, "usage: st addr, starts the KS10 at addr.")?;
        return Ok(true);
    }
    let addr = match o.positional.get(0) {
        None => {
            writeln!(ctx.out, "st: address argument required")?;
            return Ok(true);
        }
        Some(a) => parse_addr(a, HALF_MASK)?,
    };
    if o.positional.len() > 1 {
        writeln!(ctx.out, "st: additional arguments ignored")?;
    }
    ctx.bus
        .write_reg(Register::Cir, utils::make_word(OP_JRST, addr));
    ctx.bus.start_run();
    ctx.attach_to_target()
}
