/*
 * Filename: /src/monitor/checkpoint.rs
 * Project: ks10mon
 * Created Date: 2021-09-03, 10:13:55
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

use crate::monitor::monitor_error::{self, MonitorError};
use log::*;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const DISARMED: u8 = 0;
const ARMED: u8 = 1;
const TRIPPED: u8 = 2;
const SUSPENDED: u8 = 3;

/**
 * the cancellation checkpoint.
 *
 * the dispatcher arms it around every command; an interrupt arriving while armed trips it and the
 * running command gives up at its next safe point (see poll()). while disarmed or suspended an
 * interrupt does nothing.
 *
 * clones share the same state, so one can be moved into the signal handler.
 */
#[derive(Clone, Default)]
pub struct Checkpoint {
    state: Arc<AtomicU8>,
}

impl Checkpoint {
    pub fn new() -> Checkpoint {
        Checkpoint {
            state: Arc::new(AtomicU8::new(DISARMED)),
        }
    }

    /**
     * routes SIGINT (^C) to this checkpoint. can be done once per process.
     */
    pub fn install_signal_handler(&self) -> Result<(), MonitorError> {
        let cp = self.clone();
        ctrlc::set_handler(move || cp.interrupt()).map_err(|e| {
            MonitorError::from(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("can't install SIGINT handler: {}", e),
            ))
        })
    }

    /**
     * arms the checkpoint, forgetting any previous interrupt.
     */
    pub fn arm(&self) {
        self.state.store(ARMED, Ordering::SeqCst);
    }

    /**
     * disarms the checkpoint.
     */
    pub fn disarm(&self) {
        self.state.store(DISARMED, Ordering::SeqCst);
    }

    /**
     * while suspended, interrupts are ignored (the key goes to the target instead).
     */
    pub fn suspend(&self) {
        let _ = self
            .state
            .compare_exchange(ARMED, SUSPENDED, Ordering::SeqCst, Ordering::SeqCst);
    }

    /**
     * undoes suspend().
     */
    pub fn resume(&self) {
        let _ = self
            .state
            .compare_exchange(SUSPENDED, ARMED, Ordering::SeqCst, Ordering::SeqCst);
    }

    /**
     * delivers an interrupt: trips the checkpoint if armed, otherwise it's a no-op.
     */
    pub fn interrupt(&self) {
        if self
            .state
            .compare_exchange(ARMED, TRIPPED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            debug!("interrupt, checkpoint tripped");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.state.load(Ordering::SeqCst) == ARMED
    }

    pub fn is_tripped(&self) -> bool {
        self.state.load(Ordering::SeqCst) == TRIPPED
    }

    /**
     * safe point: errors out with Cancelled if the checkpoint has been tripped.
     */
    pub fn poll(&self) -> Result<(), MonitorError> {
        if self.is_tripped() {
            return Err(monitor_error::new_cancelled_error());
        }
        Ok(())
    }
}
