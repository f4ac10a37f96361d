use super::*;
use crate::config::PredictorConfig;
use crate::fault::Fault;
use crate::game::RoundRecord;
use crate::predictor::PredictorState;
use std::path::Path;
use std::path::PathBuf;

const FILE: &str = "archive.json";

/// Durable append log of rounds and the latest predictor snapshot.
///
/// Every write replaces `archive.json` through a temporary sibling and a
/// rename, so a crash leaves either the old archive or the new one.
/// Loading never fails: anything unusable is set aside and replaced by an
/// empty archive.
#[derive(Debug)]
pub struct History {
    path: Option<PathBuf>,
    archive: Archive,
}

impl History {
    /// Open the archive under `dir`, falling back to a fresh one.
    pub fn open(dir: impl AsRef<Path>, params: PredictorConfig) -> Self {
        let path = dir.as_ref().join(FILE);
        let archive = match Self::load(&path) {
            Ok(Some(archive)) => {
                log::info!(
                    "[history] loaded {} rounds from {}",
                    archive.records().len(),
                    path.display()
                );
                archive
            }
            Ok(None) => {
                log::info!("[history] no archive at {}, starting fresh", path.display());
                Archive::new(params)
            }
            Err(fault) => {
                log::warn!("[history] {}; starting fresh", fault);
                Self::quarantine(&path);
                Archive::new(params)
            }
        };
        Self {
            path: Some(path),
            archive,
        }
    }

    /// Nothing is written to disk.
    pub fn memory(params: PredictorConfig) -> Self {
        Self {
            path: None,
            archive: Archive::new(params),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
    pub fn archive(&self) -> &Archive {
        &self.archive
    }
    pub fn records(&self) -> &[RoundRecord] {
        self.archive.records()
    }
    pub fn predictor(&self) -> &PredictorState {
        self.archive.predictor()
    }

    /// Append a round with the predictor state that includes it, then persist.
    /// The in-memory archive keeps the round even if the write fails.
    pub fn append(&mut self, record: RoundRecord, predictor: &PredictorState) -> Result<(), Fault> {
        self.archive.append(record, predictor.clone())?;
        self.save()
    }

    /// Replace everything with an empty archive.
    pub fn reset(&mut self, params: PredictorConfig) -> Result<(), Fault> {
        self.archive = Archive::new(params);
        self.save()
            .inspect(|_| log::info!("[history] archive reset"))
    }
}

impl History {
    fn load(path: &Path) -> Result<Option<Archive>, Fault> {
        match std::fs::read(path) {
            Ok(bytes) => Archive::decode(&bytes).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Fault::CorruptState(format!("read {}: {}", path.display(), e))),
        }
    }

    fn save(&self) -> Result<(), Fault> {
        let Some(ref path) = self.path else {
            return Ok(());
        };
        let fail = |e: std::io::Error| Fault::CorruptState(format!("write {}: {}", path.display(), e));
        let bytes = self.archive.encode()?;
        let tmp = path.with_extension("json.tmp");
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(fail)?;
        }
        std::fs::write(&tmp, bytes).map_err(fail)?;
        std::fs::rename(&tmp, path).map_err(fail)?;
        log::debug!(
            "[history] saved {} rounds to {}",
            self.archive.records().len(),
            path.display()
        );
        Ok(())
    }

    /// Keep an unusable archive around for inspection instead of
    /// overwriting it on the next save.
    fn quarantine(path: &Path) {
        let aside = path.with_extension("json.bad");
        match std::fs::rename(path, &aside) {
            Ok(()) => log::warn!("[history] moved unusable archive to {}", aside.display()),
            Err(e) => log::debug!("[history] could not set archive aside: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ID;
    use crate::game::*;
    use crate::predictor::*;

    fn record(id: u64) -> RoundRecord {
        RoundRecord::new(
            id,
            ID::default(),
            1,
            Parity::Odds,
            Fingers::try_from(2).unwrap(),
            Fingers::try_from(3).ok(),
            Prediction::uniform(),
        )
    }
    fn play(history: &mut History, n: u64) -> Predictor {
        let mut predictor = Predictor::new(PredictorConfig::default());
        for id in 1..=n {
            let record = record(id);
            predictor.update(&record).unwrap();
            history.append(record, predictor.state()).unwrap();
        }
        predictor
    }

    #[test]
    fn absent_archive_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let history = History::open(dir.path(), PredictorConfig::default());
        assert!(history.records().is_empty());
        assert_eq!(history.predictor().observed(), 0);
    }

    #[test]
    fn reopen_restores_rounds_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::open(dir.path(), PredictorConfig::default());
        let predictor = play(&mut history, 4);
        let reopened = History::open(dir.path(), PredictorConfig::default());
        assert_eq!(reopened.records(), history.records());
        assert_eq!(reopened.predictor(), predictor.state());
        assert!(!dir.path().join("archive.json.tmp").exists());
    }

    #[test]
    fn corrupt_archive_is_set_aside() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FILE), b"{\"version\": 1, \"records\": [tru").unwrap();
        let mut history = History::open(dir.path(), PredictorConfig::default());
        assert!(history.records().is_empty());
        assert!(dir.path().join("archive.json.bad").exists());
        play(&mut history, 1);
        let reopened = History::open(dir.path(), PredictorConfig::default());
        assert_eq!(reopened.records().len(), 1);
    }

    #[test]
    fn incompatible_version_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(FILE),
            br#"{ "version": 0, "rounds": [1, 2, 3] }"#,
        )
        .unwrap();
        let history = History::open(dir.path(), PredictorConfig::default());
        assert!(history.records().is_empty());
    }

    #[test]
    fn misshapen_snapshot_is_rebuilt_from_rounds() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::open(dir.path(), PredictorConfig::default());
        let predictor = play(&mut history, 4);
        let path = dir.path().join(FILE);
        let mut json = serde_json::from_slice::<serde_json::Value>(&std::fs::read(&path).unwrap()).unwrap();
        json["predictor"]["fingers"]["marginal"] = serde_json::json!([1., 1., 1.]);
        std::fs::write(&path, serde_json::to_vec(&json).unwrap()).unwrap();
        let reopened = History::open(dir.path(), PredictorConfig::default());
        assert_eq!(reopened.records().len(), 4);
        let restored = Predictor::restore(
            reopened.predictor().clone(),
            PredictorConfig::default(),
            reopened.records(),
        );
        assert!(restored.predict().is_valid());
        assert_eq!(restored.snapshot(), predictor.snapshot());
    }

    #[test]
    fn leftover_temporary_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::open(dir.path(), PredictorConfig::default());
        play(&mut history, 2);
        std::fs::write(dir.path().join("archive.json.tmp"), b"half a wri").unwrap();
        let reopened = History::open(dir.path(), PredictorConfig::default());
        assert_eq!(reopened.records().len(), 2);
    }

    #[test]
    fn out_of_order_append_is_refused() {
        let mut history = History::memory(PredictorConfig::default());
        let predictor = play(&mut history, 3);
        assert!(matches!(
            history.append(record(2), predictor.state()),
            Err(Fault::Invariant(_))
        ));
        assert_eq!(history.records().len(), 3);
    }

    #[test]
    fn reset_empties_the_archive() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = History::open(dir.path(), PredictorConfig::default());
        play(&mut history, 3);
        history.reset(PredictorConfig::default()).unwrap();
        let reopened = History::open(dir.path(), PredictorConfig::default());
        assert!(reopened.records().is_empty());
    }
}
