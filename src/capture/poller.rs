use super::*;
use crate::Epoch;
use crate::Probability;
use crate::config::Timing;
use crate::gameroom::Event;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Poll the capture adapter every `timing.poll` for one capture window.
///
/// Sends [`Event::Shown`] for the first accepted sample, or
/// [`Event::Expired`] once `timing.wait` elapses without one.
/// Either way exactly one event is sent, tagged with `epoch`.
pub fn poll(
    camera: Camera,
    timing: Timing,
    threshold: Probability,
    epoch: Epoch,
    queue: UnboundedSender<Event>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let deadline = tokio::time::Instant::now() + timing.wait;
        let mut interval = tokio::time::interval(timing.poll);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => {
                    log::debug!("[capture] window {} expired", epoch);
                    let _ = queue.send(Event::Expired { epoch });
                    return;
                }
                _ = interval.tick() => {
                    let sample = read(&camera);
                    if let Some(fingers) = sample.accept(threshold) {
                        log::debug!(
                            "[capture] accepted {} at {:.2} confidence",
                            fingers,
                            sample.confidence()
                        );
                        let _ = queue.send(Event::Shown { epoch, fingers });
                        return;
                    }
                    log::trace!("[capture] rejected {:?}", sample);
                }
            }
        }
    })
}

fn read(camera: &Camera) -> Sample {
    camera
        .lock()
        .map(|mut capture| capture.sample())
        .unwrap_or_else(|_| {
            log::warn!("[capture] adapter lock poisoned");
            Sample::absent()
        })
}
