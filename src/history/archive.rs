use crate::SCHEMA_VERSION;
use crate::config::PredictorConfig;
use crate::fault::Fault;
use crate::game::RoundRecord;
use crate::predictor::PredictorState;
use serde::Deserialize;
use serde::Serialize;

/// Persisted layout: every resolved round in order, plus the predictor
/// snapshot taken right after the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Archive {
    version: u32,
    records: Vec<RoundRecord>,
    predictor: PredictorState,
}

impl Archive {
    pub fn new(params: PredictorConfig) -> Self {
        Self {
            version: SCHEMA_VERSION,
            records: Vec::new(),
            predictor: PredictorState::new(params),
        }
    }
    pub fn version(&self) -> u32 {
        self.version
    }
    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }
    pub fn predictor(&self) -> &PredictorState {
        &self.predictor
    }

    pub fn append(&mut self, record: RoundRecord, predictor: PredictorState) -> Result<(), Fault> {
        if let Some(last) = self.records.last() {
            if record.id() <= last.id() {
                return Err(Fault::Invariant(format!(
                    "round #{} appended after #{}",
                    record.id(),
                    last.id()
                )));
            }
        }
        self.records.push(record);
        self.predictor = predictor;
        Ok(())
    }

    /// Parse and sanity-check a serialized archive.
    pub fn decode(bytes: &[u8]) -> Result<Self, Fault> {
        #[derive(Deserialize)]
        struct Header {
            version: u32,
        }
        let header = serde_json::from_slice::<Header>(bytes)
            .map_err(|e| Fault::CorruptState(format!("unreadable archive: {}", e)))?;
        if header.version != SCHEMA_VERSION {
            return Err(Fault::CorruptState(format!(
                "archive schema {} is not {}",
                header.version, SCHEMA_VERSION
            )));
        }
        let archive = serde_json::from_slice::<Self>(bytes)
            .map_err(|e| Fault::CorruptState(format!("malformed archive: {}", e)))?;
        if archive.records.windows(2).any(|w| w[0].id() >= w[1].id()) {
            return Err(Fault::CorruptState("archived rounds out of order".to_string()));
        }
        Ok(archive)
    }

    pub fn encode(&self) -> Result<Vec<u8>, Fault> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| Fault::CorruptState(format!("unserializable archive: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn rejects_other_schema() {
        let json = r#"{ "version": 999, "records": [], "predictor": null }"#;
        match Archive::decode(json.as_bytes()) {
            Err(Fault::CorruptState(reason)) => assert!(reason.contains("999")),
            other => panic!("unexpected {:?}", other),
        }
    }
    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Archive::decode(b"{ not json"),
            Err(Fault::CorruptState(_))
        ));
    }
    #[test]
    fn empty_archive_survives_encoding() {
        let archive = Archive::new(PredictorConfig::default());
        let bytes = archive.encode().unwrap();
        assert_eq!(Archive::decode(&bytes).unwrap(), archive);
    }
}
