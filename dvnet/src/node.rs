//! Execution loop shared by routers and hosts.
//!
//! Each node runs on its own thread. A cycle polls the node to completion, then the
//! loop blocks until an inbound queue has a packet, the stop signal fires or the node's
//! timer is due. The stop signal is only looked at at the top of a cycle.

use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use crossbeam_channel::{bounded, Receiver, Select, Sender, TryRecvError};
use log::{info, trace};

use crate::concepts::interface::Direction;
use crate::host::Host;
use crate::router::Router;

pub trait Node: Send + 'static {
    fn name(&self) -> String;
    /// receivers of every inbound queue the loop should wait on
    fn inbound(&self) -> Vec<Receiver<Vec<u8>>>;
    /// one poll cycle, returns the number of packets handled
    fn poll(&mut self) -> usize;
    fn on_start(&mut self) {}
    fn timer_interval(&self) -> Option<Duration> {
        None
    }
    fn on_timer(&mut self) {}
}

impl Node for Router {
    fn name(&self) -> String {
        format!("router-{}", self.address())
    }

    fn inbound(&self) -> Vec<Receiver<Vec<u8>>> {
        self.interfaces()
            .iter()
            .map(|itf| itf.receiver(Direction::In).clone())
            .collect()
    }

    fn poll(&mut self) -> usize {
        self.process_queues()
    }

    fn on_start(&mut self) {
        if self.params().advertise_on_start {
            self.advertise_all();
        }
    }

    fn timer_interval(&self) -> Option<Duration> {
        self.params().advertise_interval
    }

    fn on_timer(&mut self) {
        self.advertise_all();
    }
}

impl Node for Host {
    fn name(&self) -> String {
        format!("host-{}", self.address())
    }

    fn inbound(&self) -> Vec<Receiver<Vec<u8>>> {
        vec![self.interface().receiver(Direction::In).clone()]
    }

    fn poll(&mut self) -> usize {
        // the packet itself went to the sink
        usize::from(self.receive().is_some())
    }
}

/// Handle on a running node
pub struct NodeHandle<N> {
    name: String,
    stop: Sender<()>,
    thread: JoinHandle<N>,
}

/// Spawns the execution loop of `node` on its own thread
pub fn start<N: Node>(node: N) -> anyhow::Result<NodeHandle<N>> {
    let name = node.name();
    let (stop_tx, stop_rx) = bounded(1);
    let thread = thread::Builder::new()
        .name(name.clone())
        .spawn(move || run(node, stop_rx))
        .with_context(|| format!("failed to spawn the loop of {name}"))?;
    Ok(NodeHandle {
        name,
        stop: stop_tx,
        thread,
    })
}

impl<N> NodeHandle<N> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Asks the loop to exit, it does so within one cycle
    pub fn request_stop(&self) {
        // a full channel means a stop is already pending
        let _ = self.stop.try_send(());
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Waits for the loop to exit and hands the node back
    pub fn join(self) -> anyhow::Result<N> {
        let name = self.name;
        self.thread
            .join()
            .map_err(|_| anyhow!("the loop of {name} panicked"))
    }

    pub fn stop(self) -> anyhow::Result<N> {
        self.request_stop();
        self.join()
    }
}

fn run<N: Node>(mut node: N, stop: Receiver<()>) -> N {
    let name = node.name();
    info!("{name}: Starting");
    node.on_start();

    let inbound = node.inbound();
    let interval = node.timer_interval();
    let mut next_tick = interval.map(|interval| Instant::now() + interval);

    loop {
        match stop.try_recv() {
            // a dropped handle also stops the loop
            Ok(()) | Err(TryRecvError::Disconnected) => break,
            Err(TryRecvError::Empty) => {}
        }

        let handled = node.poll();
        trace!("{name}: handled {handled} packets");

        if let (Some(interval), Some(tick)) = (interval, next_tick) {
            if Instant::now() >= tick {
                node.on_timer();
                next_tick = Some(Instant::now() + interval);
            }
        }

        if handled > 0 {
            // queues may still hold packets, poll again right away
            continue;
        }

        let mut sel = Select::new();
        for rx in &inbound {
            sel.recv(rx);
        }
        sel.recv(&stop);
        match next_tick {
            Some(tick) => {
                let _ = sel.ready_deadline(tick);
            }
            None => {
                let _ = sel.ready();
            }
        }
    }

    info!("{name}: Ending");
    node
}
