use crate::Probability;
use anyhow::Context;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Everything tunable about a game process.
/// Every field has a default; a JSON file may override any subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub predictor: PredictorConfig,
    pub policy: PolicyConfig,
    pub timing: Timing,
    pub capture: CaptureConfig,
    pub link: Option<String>,
    pub data: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predictor: PredictorConfig::default(),
            policy: PolicyConfig::default(),
            timing: Timing::default(),
            capture: CaptureConfig::default(),
            link: None,
            data: PathBuf::from("data"),
        }
    }
}

/// Parameters of the online estimator. Persisted alongside its snapshot so a
/// mismatch with the running config can be detected on restore.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Rounds retained in the feature window.
    pub window: usize,
    /// Rounds observed before departing from uniform.
    pub minimum: usize,
    /// Per-update forgetting factor applied to frequency counts.
    pub decay: f32,
    /// Additive pseudo-count per class.
    pub smoothing: f32,
    /// Flattening toward uniform when the human is maximally volatile.
    pub volatility: f32,
    /// Recent rounds inspected for volatility.
    pub span: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            window: 20,
            minimum: 3,
            decay: 0.85,
            smoothing: 0.5,
            volatility: 0.5,
            span: 4,
        }
    }
}

/// Epsilon-greedy schedule: `floor + (epsilon - floor) * decay^n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub epsilon: Probability,
    pub floor: Probability,
    pub decay: Probability,
    pub seed: Option<u64>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.2,
            floor: 0.05,
            decay: 0.9,
            seed: None,
        }
    }
}

/// Upper bound on capture retries before a round is called no contest.
pub const MAX_RETRIES: u8 = 10;

/// Configuration for countdown, capture and peripheral timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    #[serde(with = "millis")]
    pub tick: Duration,
    #[serde(with = "millis")]
    pub poll: Duration,
    #[serde(with = "millis")]
    pub wait: Duration,
    pub retries: u8,
    #[serde(with = "millis")]
    pub probe: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            poll: Duration::from_millis(100),
            wait: Duration::from_secs(3),
            retries: 2,
            probe: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Minimum confidence for a sample to be accepted.
    pub threshold: Probability,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl Config {
    /// Read a JSON config file; missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
        let config = serde_json::from_slice::<Self>(&bytes)
            .with_context(|| format!("parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let unit = |p: f32| (0.0..=1.0).contains(&p);
        anyhow::ensure!(self.predictor.window > 0, "predictor.window must be > 0");
        anyhow::ensure!(self.predictor.span > 1, "predictor.span must be > 1");
        anyhow::ensure!(unit(self.predictor.decay), "predictor.decay must be in [0,1]");
        anyhow::ensure!(unit(self.predictor.volatility), "predictor.volatility must be in [0,1]");
        anyhow::ensure!(self.predictor.smoothing > 0.0, "predictor.smoothing must be > 0");
        anyhow::ensure!(unit(self.policy.epsilon), "policy.epsilon must be in [0,1]");
        anyhow::ensure!(unit(self.policy.floor), "policy.floor must be in [0,1]");
        anyhow::ensure!(unit(self.policy.decay), "policy.decay must be in [0,1]");
        anyhow::ensure!(self.policy.floor <= self.policy.epsilon, "policy.floor exceeds policy.epsilon");
        anyhow::ensure!(unit(self.capture.threshold), "capture.threshold must be in [0,1]");
        anyhow::ensure!(!self.timing.tick.is_zero(), "timing.tick must be > 0");
        anyhow::ensure!(!self.timing.poll.is_zero(), "timing.poll must be > 0");
        anyhow::ensure!(self.timing.wait >= self.timing.poll, "timing.wait shorter than timing.poll");
        anyhow::ensure!(!self.timing.probe.is_zero(), "timing.probe must be > 0");
        anyhow::ensure!(self.timing.retries <= MAX_RETRIES, "timing.retries must be <= {}", MAX_RETRIES);
        Ok(())
    }
}

mod millis {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(d: &Duration, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(d).map(Duration::from_millis)
    }
}
