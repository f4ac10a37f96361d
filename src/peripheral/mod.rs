mod absent;
mod link;
mod signal;

pub use absent::*;
pub use link::*;
pub use signal::*;

use crate::fault::Fault;
use crate::gameroom::Event;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// One-way notifications to an optional external device.
///
/// `notify` is fire-and-forget: it returns immediately whatever the state of
/// the transport and never reports failure to the caller.
pub trait Peripheral: Send {
    fn notify(&self, signal: Signal);
    fn connected(&self) -> bool;
}

/// Connect to the device at `address`, bounded by `probe`.
///
/// The address is a filesystem path (serial device, FIFO) or `host:port`.
/// Any failure yields an [`Absent`] peripheral; the reason is logged and
/// never returned. Inbound button presses and link loss are relayed to
/// `queue`.
pub async fn attach(
    address: Option<&str>,
    probe: Duration,
    queue: UnboundedSender<Event>,
) -> Box<dyn Peripheral> {
    let Some(address) = address else {
        log::info!("[link] no peripheral configured");
        return Box::new(Absent);
    };
    match tokio::time::timeout(probe, connect(address, queue))
        .await
        .map_err(|_| Fault::LinkUnavailable(format!("{} did not answer within {:?}", address, probe)))
        .and_then(|result| result)
    {
        Ok(link) => {
            log::info!("[link] connected to {}", address);
            link.notify(Signal::Reset);
            Box::new(link)
        }
        Err(e) => {
            log::warn!("[link] {}; continuing without peripheral", e);
            Box::new(Absent)
        }
    }
}

async fn connect(address: &str, queue: UnboundedSender<Event>) -> Result<Link, Fault> {
    let unavailable = |e: std::io::Error| Fault::LinkUnavailable(format!("{}: {}", address, e));
    if address.contains(':') && !Path::new(address).exists() {
        let stream = tokio::net::TcpStream::connect(address)
            .await
            .map_err(unavailable)?;
        Ok(Link::spawn(stream, queue))
    } else {
        let device = tokio::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(address)
            .await
            .map_err(unavailable)?;
        Ok(Link::spawn(device, queue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn unconfigured_link_is_absent() {
        let (tx, _rx) = unbounded_channel();
        let peripheral = attach(None, Duration::from_millis(50), tx).await;
        assert!(!peripheral.connected());
        peripheral.notify(Signal::GameStart);
    }

    #[tokio::test]
    async fn missing_device_is_absent() {
        let (tx, _rx) = unbounded_channel();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ttyACM9");
        let peripheral = attach(path.to_str(), Duration::from_millis(200), tx).await;
        assert!(!peripheral.connected());
        for signal in Signal::all() {
            peripheral.notify(signal);
        }
    }

    #[tokio::test]
    async fn tcp_device_receives_reset_on_connect() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let (tx, _rx) = unbounded_channel();
        let peripheral = attach(Some(&address), Duration::from_secs(2), tx).await;
        assert!(peripheral.connected());
        let (socket, _) = listener.accept().await.unwrap();
        let mut lines = tokio::io::BufReader::new(socket).lines();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("RESET"));
    }
}
