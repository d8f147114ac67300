/*
 * Filename: /src/monitor/breakpoints.rs
 * Project: ks10mon
 * Created Date: 2021-09-06, 15:22:09
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

use crate::bus::Register;
use crate::monitor::monitor_error::{self, MonitorError};
use crate::monitor::Context;
use crate::utils::Addr;
use bitflags::bitflags;
use log::*;
use std::fmt::Display;
use std::fmt::{Error, Formatter};

/// number of breakpoint units in the hardware.
pub const NUM_UNITS: usize = 4;

/// address field of a memory condition.
pub const MEM_MASK: u64 = 0o03777777;

/// address field of an i/o condition (also the widest field, used for the mask).
pub const IO_MASK: u64 = 0o17777777;

bitflags! {
    /**
     * condition class bits, as found in the high half of BRAR and BRMR (backplane bus cycle flags).
     */
    pub struct BreakFlags : u64 {
        /// instruction fetch.
        const FETCH = 0o400000000000;

        /// read cycle.
        const READ = 0o200000000000;

        /// write test cycle.
        const WRTEST = 0o100000000000;

        /// write cycle.
        const WRITE = 0o040000000000;

        /// physical address.
        const PHYS = 0o010000000000;

        /// i/o space.
        const IO = 0o004000000000;

        /// byte cycle.
        const BYTE = 0o001000000000;
    }
}

/**
 * selects one breakpoint unit or all of them.
 */
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BreakUnit {
    Unit(usize),
    All,
}

/**
 * a symbolic break condition.
 */
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BreakCondition {
    /// instruction fetch at address.
    Fetch(Addr),
    /// memory read at address.
    MemRead(Addr),
    /// memory write at address.
    MemWrite(Addr),
    /// memory read or write at address.
    Mem(Addr),
    /// i/o read at address.
    IoRead(Addr),
    /// i/o write at address.
    IoWrite(Addr),
    /// i/o read or write at address.
    Io(Addr),
    /// raw (brar, brmr) values.
    Raw(u64, u64),
}

impl BreakCondition {
    /**
     * translates the condition into (brar, brmr). bits set in mask are ignored in the comparison,
     * so they're cleared from the brmr address field.
     *
     * Mem and Io set both READ and WRITE: that's not a legal bus cycle, the breakpoint hardware
     * decodes it as "read or write".
     */
    pub fn encode(&self, mask: Addr) -> (u64, u64) {
        let (brar, brmr) = match *self {
            BreakCondition::Fetch(a) => (
                BreakFlags::FETCH.bits() | (a & MEM_MASK),
                (BreakFlags::FETCH | BreakFlags::IO).bits() | MEM_MASK,
            ),
            BreakCondition::MemRead(a) => (
                BreakFlags::READ.bits() | (a & MEM_MASK),
                (BreakFlags::READ | BreakFlags::IO).bits() | MEM_MASK,
            ),
            BreakCondition::MemWrite(a) => (
                BreakFlags::WRITE.bits() | (a & MEM_MASK),
                (BreakFlags::WRITE | BreakFlags::IO).bits() | MEM_MASK,
            ),
            BreakCondition::Mem(a) => (
                (BreakFlags::READ | BreakFlags::WRITE).bits() | (a & MEM_MASK),
                (BreakFlags::READ | BreakFlags::WRITE | BreakFlags::IO).bits() | MEM_MASK,
            ),
            BreakCondition::IoRead(a) => (
                (BreakFlags::IO | BreakFlags::READ).bits() | (a & IO_MASK),
                (BreakFlags::IO | BreakFlags::READ).bits() | IO_MASK,
            ),
            BreakCondition::IoWrite(a) => (
                (BreakFlags::IO | BreakFlags::WRITE).bits() | (a & IO_MASK),
                (BreakFlags::IO | BreakFlags::WRITE).bits() | IO_MASK,
            ),
            BreakCondition::Io(a) => (
                (BreakFlags::IO | BreakFlags::READ | BreakFlags::WRITE).bits() | (a & IO_MASK),
                (BreakFlags::IO | BreakFlags::READ | BreakFlags::WRITE).bits() | IO_MASK,
            ),
            BreakCondition::Raw(brar, brmr) => (brar, brmr),
        };
        (brar, brmr & !(mask & IO_MASK))
    }
}

/**
 * the register pair of one unit, as read back from the hardware.
 */
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BreakRegs {
    pub unit: usize,
    pub brar: u64,
    pub brmr: u64,
}

impl BreakRegs {
    /**
     * both registers zero means the unit is disarmed.
     */
    pub fn is_disabled(&self) -> bool {
        self.brar == 0 && self.brmr == 0
    }
}

/**
 * convert the flags of a breakpoint register to a meaningful string
 */
fn flags_to_string(r: u64) -> String {
    let p = BreakFlags::from_bits_truncate(r);
    format!(
        "{}{}{}{}{}{}",
        if p.contains(BreakFlags::FETCH) {
            "Fetch "
        } else {
            ""
        },
        if p.contains(BreakFlags::READ) {
            "Read "
        } else {
            ""
        },
        if p.contains(BreakFlags::WRITE) {
            "Write "
        } else {
            ""
        },
        if p.contains(BreakFlags::PHYS) {
            "Physical "
        } else {
            ""
        },
        if p.contains(BreakFlags::IO) { "IO " } else { "" },
        if p.contains(BreakFlags::BYTE) {
            "Byte "
        } else {
            ""
        },
    )
}

/**
 * address part of a breakpoint register, the field width depends on the IO flag.
 */
fn address_field(r: u64) -> u64 {
    if BreakFlags::from_bits_truncate(r).contains(BreakFlags::IO) {
        r & IO_MASK
    } else {
        r & MEM_MASK
    }
}

fn fmt_reg(f: &mut Formatter<'_>, name: &str, unit: usize, r: u64) -> Result<(), Error> {
    writeln!(f, "{}{}: {:012o}", name, unit, r)?;
    writeln!(f, "       FLAGS   : {}", flags_to_string(r))?;
    writeln!(f, "       ADDRESS : {:08o}", address_field(r))
}

impl Display for BreakRegs {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        if self.is_disabled() {
            return writeln!(f, "br{}: breakpoint disabled", self.unit);
        }
        fmt_reg(f, "BRAR", self.unit, self.brar)?;
        fmt_reg(f, "BRMR", self.unit, self.brmr)
    }
}

/**
 * units addressed by a selector.
 */
fn units(sel: BreakUnit) -> Result<std::ops::Range<usize>, MonitorError> {
    match sel {
        BreakUnit::All => Ok(0..NUM_UNITS),
        BreakUnit::Unit(n) if n < NUM_UNITS => Ok(n..n + 1),
        BreakUnit::Unit(n) => Err(monitor_error::new_invalid_argument(&format!(
            "invalid breakpoint unit {}",
            n
        ))),
    }
}

impl Context {
    /**
     * arms breakpoint unit with the given condition and address mask.
     */
    pub fn arm_breakpoint(
        &mut self,
        unit: usize,
        cond: &BreakCondition,
        mask: Addr,
    ) -> Result<(), MonitorError> {
        units(BreakUnit::Unit(unit))?;
        let (brar, brmr) = cond.encode(mask);
        info!(
            "br{}: {:?}, mask={:08o} -> brar={:012o}, brmr={:012o}",
            unit, cond, mask, brar, brmr
        );
        self.bus.write_reg(Register::Brar(unit), brar);
        self.bus.write_reg(Register::Brmr(unit), brmr);
        Ok(())
    }

    /**
     * disarms one or all breakpoint units.
     */
    pub fn disarm_breakpoint(&mut self, sel: BreakUnit) -> Result<(), MonitorError> {
        for n in units(sel)? {
            debug!("br{}: disarmed", n);
            self.bus.write_reg(Register::Brar(n), 0);
            self.bus.write_reg(Register::Brmr(n), 0);
        }
        Ok(())
    }

    /**
     * reads back the registers of a unit.
     */
    pub fn read_breakpoint(&mut self, unit: usize) -> Result<BreakRegs, MonitorError> {
        units(BreakUnit::Unit(unit))?;
        Ok(BreakRegs {
            unit,
            brar: self.bus.read_reg(Register::Brar(unit)),
            brmr: self.bus.read_reg(Register::Brmr(unit)),
        })
    }

    /**
     * formatted status of one or all units.
     */
    pub fn breakpoint_status(&mut self, sel: BreakUnit) -> Result<String, MonitorError> {
        let mut s = String::new();
        for n in units(sel)? {
            s.push_str(&self.read_breakpoint(n)?.to_string());
        }
        Ok(s)
    }
}
