use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Select, Sender, TryRecvError};
use dvnet::concepts::interface::{Direction, Interface, PutMode};

/// A full-duplex link between two interface endpoints
pub type Link = (Interface, Interface);

fn carry(from: &Interface, to: &Interface) -> usize {
    let mut moved = 0;
    while let Some(pkt) = from.try_get(Direction::Out) {
        moved += 1;
        // a full far end loses the packet, like a real link would
        let _ = to.put(pkt, Direction::In, PutMode::NonBlocking);
    }
    moved
}

/// Moves every outbound packet across its link, returns how many moved
pub fn pump(links: &[Link]) -> usize {
    links.iter().map(|(a, b)| carry(a, b) + carry(b, a)).sum()
}

/// Runs [`pump`] on a background thread for threaded tests
pub struct LinkPump {
    stop: Sender<()>,
    thread: JoinHandle<()>,
}

impl LinkPump {
    pub fn start(links: Vec<Link>) -> Self {
        let (stop, stop_rx) = bounded(1);
        let thread = thread::spawn(move || loop {
            if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                return;
            }
            if pump(&links) > 0 {
                continue;
            }
            let mut sel = Select::new();
            for (a, b) in &links {
                sel.recv(a.receiver(Direction::Out));
                sel.recv(b.receiver(Direction::Out));
            }
            sel.recv(&stop_rx);
            let _ = sel.ready_timeout(Duration::from_millis(50));
        });
        Self { stop, thread }
    }

    pub fn stop(self) {
        let _ = self.stop.send(());
        self.thread.join().unwrap();
    }
}
