use super::*;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncRead;
use tokio::io::AsyncWrite;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::unbounded_channel;

/// A live line-protocol connection to the device.
///
/// Notifications are queued to a bridge task that owns the transport, so
/// `notify` never waits on I/O. The bridge relays inbound `BUTTON_PRESSED`
/// lines as [`Event::Button`] and reports transport loss once as
/// [`Event::LinkDown`], after which the link drops everything.
pub struct Link {
    tx: UnboundedSender<Signal>,
    up: Arc<AtomicBool>,
}

impl Link {
    pub fn spawn<S>(stream: S, queue: UnboundedSender<Event>) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (tx, rx) = unbounded_channel();
        let up = Arc::new(AtomicBool::new(true));
        tokio::spawn(Self::bridge(stream, rx, queue, up.clone()));
        Self { tx, up }
    }

    async fn bridge<S>(
        stream: S,
        mut rx: UnboundedReceiver<Signal>,
        queue: UnboundedSender<Event>,
        up: Arc<AtomicBool>,
    ) where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, mut writer) = tokio::io::split(stream);
        let mut lines = tokio::io::BufReader::new(reader).lines();
        let mut last = None::<Signal>;
        let reason = 'link: loop {
            tokio::select! {
                signal = rx.recv() => match signal {
                    None => break 'link "closed by host".to_string(),
                    Some(Signal::Reset) if last == Some(Signal::Reset) => continue 'link,
                    Some(signal) => {
                        last = Some(signal);
                        let line = format!("{}\n", signal);
                        if let Err(e) = writer.write_all(line.as_bytes()).await {
                            break 'link format!("write {}: {}", signal, e);
                        }
                        if let Err(e) = writer.flush().await {
                            break 'link format!("flush {}: {}", signal, e);
                        }
                        log::debug!("[link] sent {}", signal);
                    }
                },
                line = lines.next_line() => match line {
                    Ok(Some(line)) => match Inbound::from(line.as_str()) {
                        Inbound::Button => {
                            log::debug!("[link] button pressed");
                            let _ = queue.send(Event::Button);
                        }
                        Inbound::Diagnostic(text) if text.is_empty() => continue 'link,
                        Inbound::Diagnostic(text) => log::debug!("[link] device says {:?}", text),
                    },
                    Ok(None) => break 'link "device hung up".to_string(),
                    Err(e) => break 'link format!("read: {}", e),
                },
            }
        };
        up.store(false, Ordering::SeqCst);
        let _ = queue.send(Event::LinkDown {
            reason,
            at: crate::now_ms(),
        });
    }
}

impl Peripheral for Link {
    fn notify(&self, signal: Signal) {
        if !self.connected() {
            log::trace!("[link] down, dropped {}", signal);
        } else if self.tx.send(signal).is_err() {
            self.up.store(false, Ordering::SeqCst);
        }
    }
    fn connected(&self) -> bool {
        self.up.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn repeated_reset_is_sent_once() {
        let (host, device) = tokio::io::duplex(256);
        let (tx, _rx) = unbounded_channel();
        let link = Link::spawn(host, tx);
        link.notify(Signal::Reset);
        link.notify(Signal::Reset);
        link.notify(Signal::GameStart);
        link.notify(Signal::Reset);
        let mut lines = BufReader::new(device).lines();
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("RESET"));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("GAME_START"));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("RESET"));
    }

    #[tokio::test]
    async fn button_is_relayed_and_chatter_ignored() {
        let (host, mut device) = tokio::io::duplex(256);
        let (tx, mut rx) = unbounded_channel();
        let _link = Link::spawn(host, tx);
        device
            .write_all(b"Unknown command: FOO\nBUTTON_PRESSED\r\n")
            .await
            .unwrap();
        assert!(matches!(rx.recv().await, Some(Event::Button)));
    }

    #[tokio::test]
    async fn hangup_marks_link_down() {
        let (host, device) = tokio::io::duplex(256);
        let (tx, mut rx) = unbounded_channel();
        let link = Link::spawn(host, tx);
        drop(device);
        match rx.recv().await {
            Some(Event::LinkDown { reason, at }) => {
                assert!(!reason.is_empty());
                assert!(at > 0);
            }
            other => panic!("expected link down, got {:?}", other),
        }
        assert!(!link.connected());
        link.notify(Signal::Test);
    }
}
