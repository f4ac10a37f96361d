use super::*;
use crate::FINGERS;
use crate::PARITIES;
use crate::SCHEMA_VERSION;
use crate::config::PredictorConfig;
use crate::fault::Fault;
use crate::game::RoundRecord;
use serde::Deserialize;
use serde::Serialize;

/// Everything the predictor knows. Serializable so it can be persisted
/// and handed to readers as an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictorState {
    version: u32,
    params: PredictorConfig,
    observed: usize,
    last: Option<u64>,
    window: Window,
    fingers: Head,
    parity: Head,
}

impl PredictorState {
    pub fn new(params: PredictorConfig) -> Self {
        Self {
            version: SCHEMA_VERSION,
            params,
            observed: 0,
            last: None,
            window: Window::new(params.window),
            fingers: Head::new(FINGERS, FINGER_CONTEXTS),
            parity: Head::new(PARITIES, PARITY_CONTEXTS),
        }
    }
    pub fn version(&self) -> u32 {
        self.version
    }
    pub fn params(&self) -> &PredictorConfig {
        &self.params
    }
    /// Rounds folded into the model so far.
    pub fn observed(&self) -> usize {
        self.observed
    }
    /// Id of the most recent round folded in.
    pub fn last(&self) -> Option<u64> {
        self.last
    }
    pub fn window(&self) -> &Window {
        &self.window
    }
    /// Why this state cannot be used with `params` as persisted, if it cannot.
    pub fn mismatch(&self, params: &PredictorConfig) -> Option<String> {
        if self.version != SCHEMA_VERSION {
            Some(format!("schema {} != {}", self.version, SCHEMA_VERSION))
        } else if self.params != *params {
            Some("parameters changed".to_string())
        } else if !self.fingers.conforms(FINGERS, FINGER_CONTEXTS) {
            Some("finger head has the wrong shape".to_string())
        } else if !self.parity.conforms(PARITIES, PARITY_CONTEXTS) {
            Some("parity head has the wrong shape".to_string())
        } else if self.window.capacity() != params.window || self.window.len() > params.window {
            Some(format!(
                "window holds {} of {}, expected capacity {}",
                self.window.len(),
                self.window.capacity(),
                params.window
            ))
        } else {
            None
        }
    }
}

/// Online opponent model with two heads sharing one feature window:
/// finger count over 1..=5 and parity call over odds/evens.
///
/// Single writer. Updates are single-pass and deterministic; predictions are
/// pure reads and stay identical until the next update.
#[derive(Debug, Clone)]
pub struct Predictor {
    state: PredictorState,
}

impl Predictor {
    pub fn new(params: PredictorConfig) -> Self {
        Self {
            state: PredictorState::new(params),
        }
    }

    /// Fold a sequence of rounds into a fresh predictor.
    /// Rounds the model rejects are skipped exactly as a live update would.
    pub fn replay<'a, I>(params: PredictorConfig, records: I) -> Self
    where
        I: IntoIterator<Item = &'a RoundRecord>,
    {
        let mut predictor = Self::new(params);
        records
            .into_iter()
            .filter_map(|r| predictor.update(r).err())
            .for_each(|e| log::error!("[predictor] replay skipped round: {}", e));
        predictor
    }

    /// Resume from a persisted snapshot, replaying the archived rounds instead
    /// when the snapshot is from another schema, was built with different
    /// parameters, is malformed, or does not end at the last archived round.
    pub fn restore(state: PredictorState, params: PredictorConfig, records: &[RoundRecord]) -> Self {
        let tail = records.last().map(RoundRecord::id);
        let reason = state.mismatch(&params).or_else(|| {
            (state.last != tail)
                .then(|| format!("snapshot ends at {:?}, archive at {:?}", state.last, tail))
        });
        match reason {
            None => Self { state },
            Some(reason) => {
                log::warn!(
                    "[predictor] rebuilding from {} archived rounds: {}",
                    records.len(),
                    reason
                );
                Self::replay(params, records)
            }
        }
    }

    pub fn state(&self) -> &PredictorState {
        &self.state
    }
    /// Point-in-time copy for readers outside the orchestrator.
    pub fn snapshot(&self) -> PredictorState {
        self.state.clone()
    }
    pub fn observed(&self) -> usize {
        self.state.observed
    }

    /// Fold one resolved round into the model.
    /// On error nothing is changed.
    pub fn update(&mut self, record: &RoundRecord) -> Result<(), Fault> {
        let (fctx, pctx) = self.contexts();
        self.validate(record, fctx, pctx)?;
        let params = self.state.params;
        let features = Features::observe(record, &self.state.window, params.span);
        if let Some(h) = record.human() {
            self.state.fingers.update(h.index(), fctx, params.decay);
        }
        self.state
            .parity
            .update(record.choice().index(), pctx, params.decay);
        self.state.window.push(features);
        self.state.observed += 1;
        self.state.last = Some(record.id());
        log::debug!(
            "[predictor] observed round #{} ({} total, volatility {:.2})",
            record.id(),
            self.state.observed,
            features.volatility()
        );
        Ok(())
    }

    /// Distribution over the human's next move.
    /// Uniform until the configured minimum number of rounds has been seen.
    pub fn predict(&self) -> Prediction {
        let params = &self.state.params;
        if self.state.observed < params.minimum {
            return Prediction::uniform();
        }
        let (fctx, pctx) = self.contexts();
        let flatten = self
            .state
            .window
            .last()
            .map(|f| f.volatility() * params.volatility)
            .unwrap_or(0.);
        let fingers = self.state.fingers.distribution(fctx, params.smoothing);
        let parity = self.state.parity.distribution(pctx, params.smoothing);
        Prediction::new(
            std::array::from_fn(|i| flat(fingers.get(i), flatten, FINGERS)),
            std::array::from_fn(|i| flat(parity.get(i), flatten, PARITIES)),
        )
    }
}

impl Predictor {
    fn contexts(&self) -> (usize, usize) {
        self.state
            .window
            .last()
            .map(|f| (f.finger_context(), f.parity_context()))
            .unwrap_or_else(opening_contexts)
    }
    fn validate(&self, record: &RoundRecord, fctx: usize, pctx: usize) -> Result<(), Fault> {
        if let Some(last) = self.state.last {
            if record.id() <= last {
                return Err(Fault::ModelUpdateFailure(format!(
                    "round #{} arrived after #{}",
                    record.id(),
                    last
                )));
            }
        }
        if record.round() == 0 {
            return Err(Fault::ModelUpdateFailure(format!(
                "round #{} has no position in its session",
                record.id()
            )));
        }
        if !record.prediction().is_valid() {
            return Err(Fault::ModelUpdateFailure(format!(
                "round #{} carries a malformed prediction",
                record.id()
            )));
        }
        if let Some(h) = record.human() {
            self.state.fingers.check(h.index(), fctx)?;
        }
        self.state.parity.check(record.choice().index(), pctx)
    }
}

/// Missing classes read as uniform.
fn flat(p: Option<&f32>, flatten: f32, classes: usize) -> f32 {
    let uniform = 1. / classes as f32;
    (1. - flatten) * p.copied().unwrap_or(uniform) + flatten * uniform
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ID;
    use crate::game::*;

    fn f(n: u8) -> Fingers {
        Fingers::try_from(n).unwrap()
    }
    fn rounds(plays: &[(Option<u8>, Parity)]) -> Vec<RoundRecord> {
        let session = ID::default();
        plays
            .iter()
            .enumerate()
            .map(|(i, (h, p))| {
                RoundRecord::new(i as u64 + 1, session, 1, *p, f(2), h.map(f), Prediction::uniform())
            })
            .collect()
    }

    #[test]
    fn cold_start_is_uniform() {
        let params = PredictorConfig::default();
        let records = rounds(&[(Some(5), Parity::Evens), (Some(5), Parity::Evens)]);
        let predictor = Predictor::replay(params, &records);
        assert_eq!(predictor.observed(), 2);
        assert_eq!(predictor.predict(), Prediction::uniform());
    }

    #[test]
    fn biased_human_is_learned() {
        let params = PredictorConfig::default();
        let records = rounds(&vec![(Some(4), Parity::Evens); 8]);
        let predictor = Predictor::replay(params, &records);
        let prediction = predictor.predict();
        assert_eq!(prediction.likely(), f(4));
        assert!(prediction.finger(f(4)) > 0.5);
        assert_eq!(prediction.likely_call(), Parity::Evens);
    }

    #[test]
    fn cyclic_human_is_learned_through_context() {
        let params = PredictorConfig {
            volatility: 0.,
            ..PredictorConfig::default()
        };
        let cycle = [1, 3, 5];
        let plays = (0..30)
            .map(|i| (Some(cycle[i % 3]), Parity::Odds))
            .collect::<Vec<_>>();
        let predictor = Predictor::replay(params, &rounds(&plays));
        // last shown was cycle[29 % 3] = 5, so 1 comes next
        assert_eq!(predictor.predict().likely(), f(1));
    }

    #[test]
    fn predict_is_idempotent() {
        let records = rounds(&vec![(Some(2), Parity::Odds); 5]);
        let predictor = Predictor::replay(PredictorConfig::default(), &records);
        assert_eq!(predictor.predict(), predictor.predict());
        assert!(predictor.predict().is_valid());
    }

    #[test]
    fn out_of_order_update_is_rejected_and_state_kept() {
        let records = rounds(&vec![(Some(2), Parity::Odds); 4]);
        let mut predictor = Predictor::replay(PredictorConfig::default(), &records);
        let before = predictor.snapshot();
        let stale = records[1].clone();
        assert!(matches!(predictor.update(&stale), Err(Fault::ModelUpdateFailure(_))));
        assert_eq!(predictor.snapshot(), before);
    }

    #[test]
    fn no_contest_feeds_parity_only() {
        let records = rounds(&[(None, Parity::Evens); 4]);
        let predictor = Predictor::replay(PredictorConfig::default(), &records);
        let prediction = predictor.predict();
        assert_eq!(predictor.observed(), 4);
        assert!(prediction.fingers().iter().all(|p| (p - 0.2).abs() < 1e-5));
        assert_eq!(prediction.likely_call(), Parity::Evens);
    }

    #[test]
    fn window_is_bounded() {
        let params = PredictorConfig {
            window: 5,
            ..PredictorConfig::default()
        };
        let records = rounds(&vec![(Some(1), Parity::Odds); 12]);
        let predictor = Predictor::replay(params, &records);
        assert_eq!(predictor.state().window().len(), 5);
        assert_eq!(predictor.observed(), 12);
    }

    #[test]
    fn persisted_snapshot_replays_identically() {
        let params = PredictorConfig::default();
        let records = rounds(&[
            (Some(3), Parity::Odds),
            (Some(1), Parity::Evens),
            (None, Parity::Odds),
            (Some(3), Parity::Odds),
            (Some(2), Parity::Evens),
        ]);
        let (head, tail) = records.split_at(3);
        let mut live = Predictor::replay(params, head);
        let json = serde_json::to_string(&live.snapshot()).unwrap();
        let state = serde_json::from_str::<PredictorState>(&json).unwrap();
        let mut reloaded = Predictor::restore(state, params, head);
        for record in tail {
            live.update(record).unwrap();
            reloaded.update(record).unwrap();
        }
        assert_eq!(live.snapshot(), reloaded.snapshot());
        assert_eq!(live.predict(), reloaded.predict());
        assert_eq!(live.snapshot(), Predictor::replay(params, &records).snapshot());
    }

    #[test]
    fn restore_rebuilds_on_parameter_change() {
        let records = rounds(&vec![(Some(5), Parity::Odds); 6]);
        let old = Predictor::replay(PredictorConfig::default(), &records).snapshot();
        let params = PredictorConfig {
            window: 3,
            ..PredictorConfig::default()
        };
        let restored = Predictor::restore(old, params, &records);
        assert_eq!(restored.state().params(), &params);
        assert_eq!(restored.state().window().len(), 3);
        assert_eq!(restored.observed(), 6);
    }

    #[test]
    fn restore_rebuilds_when_archive_is_ahead() {
        let records = rounds(&vec![(Some(2), Parity::Evens); 6]);
        let params = PredictorConfig::default();
        let stale = Predictor::replay(params, &records[..4]).snapshot();
        let restored = Predictor::restore(stale, params, &records);
        assert_eq!(restored.observed(), 6);
        assert_eq!(restored.state().last(), Some(6));
    }
}
