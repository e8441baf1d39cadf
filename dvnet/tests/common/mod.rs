#![allow(dead_code)]

pub mod graphs;
pub mod link;
pub mod virtual_network;

use std::thread::sleep;
use std::time::{Duration, Instant};

use dvnet::concepts::packet::Address;
use dvnet::feedback::RoutingEvent;
use dvnet::framework::EventLog;
use simplelog::{Config, LevelFilter, TestLogger};

pub fn init_logging() {
    // every test binary shares one logger, later calls fail harmlessly
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

pub fn addr(value: u32) -> Address {
    Address::new(value).unwrap()
}

/// Polls the log until an event matches, returns whether one did in time
pub fn wait_for(log: &EventLog, timeout: Duration, pred: impl Fn(&RoutingEvent) -> bool) -> bool {
    wait_until(timeout, || log.events().iter().any(&pred))
}

pub fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        sleep(Duration::from_millis(5));
    }
    false
}
