/*
 * Filename: /src/lib.rs
 * Project: ks10mon
 * Created Date: 2021-09-02, 10:02:17
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

pub mod bus;
pub mod monitor;
pub mod utils;

/**
 * enable/disable logging (env_logger), the monitor logs at debug/info level.
 */
pub fn enable_logging(enable: bool) {
    if enable {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::max())
            .try_init();
        log::set_max_level(log::LevelFilter::max());
    } else {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Off)
            .try_init();
        log::set_max_level(log::LevelFilter::Off);
    }
}
