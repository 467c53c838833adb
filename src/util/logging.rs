#![cfg(test)]

use simplelog::{Config, LevelFilter, TestLogger};

/// Routes `log` output through the test harness so it shows up alongside failing tests. Safe to
/// call from every test, only the first call installs the logger.
pub fn init() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}
