use crate::fault::Fault;
use serde::Deserialize;
use serde::Serialize;

/// One predictive head: decayed class frequencies, overall and per context.
///
/// Prediction mixes the smoothed marginal with the smoothed row of the
/// current context, trusting the row in proportion to its evidence:
/// `w = mass / (mass + 1)`. Every update decays one marginal and one row,
/// so cost is linear in the class count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Head {
    marginal: Vec<f32>,
    table: Vec<Vec<f32>>,
}

impl Head {
    pub fn new(classes: usize, contexts: usize) -> Self {
        Self {
            marginal: vec![0.; classes],
            table: vec![vec![0.; classes]; contexts],
        }
    }
    pub fn classes(&self) -> usize {
        self.marginal.len()
    }
    pub fn contexts(&self) -> usize {
        self.table.len()
    }
    /// True when the marginal and every context row have `classes` finite,
    /// non-negative counts across exactly `contexts` rows.
    pub fn conforms(&self, classes: usize, contexts: usize) -> bool {
        let sane = |row: &Vec<f32>| row.len() == classes && row.iter().all(|n| n.is_finite() && *n >= 0.);
        sane(&self.marginal) && self.table.len() == contexts && self.table.iter().all(sane)
    }
    pub fn check(&self, class: usize, context: usize) -> Result<(), Fault> {
        if class >= self.classes() {
            return Err(Fault::ModelUpdateFailure(format!(
                "class {} outside 0..{}",
                class,
                self.classes()
            )));
        }
        if context >= self.contexts() {
            return Err(Fault::ModelUpdateFailure(format!(
                "context {} outside 0..{}",
                context,
                self.contexts()
            )));
        }
        Ok(())
    }
    /// Callers validate with [`Head::check`] first.
    pub fn update(&mut self, class: usize, context: usize, decay: f32) {
        Self::observe(&mut self.marginal, class, decay);
        if let Some(row) = self.table.get_mut(context) {
            Self::observe(row, class, decay);
        }
    }
    pub fn mass(&self, context: usize) -> f32 {
        self.table
            .get(context)
            .map(|row| row.iter().sum())
            .unwrap_or(0.)
    }
    pub fn distribution(&self, context: usize, smoothing: f32) -> Vec<f32> {
        let marginal = Self::smooth(&self.marginal, smoothing);
        let conditional = self
            .table
            .get(context)
            .filter(|row| row.len() == marginal.len())
            .map(|row| Self::smooth(row, smoothing))
            .unwrap_or_else(|| marginal.clone());
        let mass = self.mass(context);
        let w = mass / (mass + 1.);
        marginal
            .iter()
            .zip(conditional.iter())
            .map(|(m, c)| (1. - w) * m + w * c)
            .collect()
    }
}

impl Head {
    fn observe(counts: &mut [f32], class: usize, decay: f32) {
        counts.iter_mut().for_each(|n| *n *= decay);
        if let Some(n) = counts.get_mut(class) {
            *n += 1.;
        }
    }
    fn smooth(counts: &[f32], smoothing: f32) -> Vec<f32> {
        let total = counts.iter().sum::<f32>() + smoothing * counts.len() as f32;
        counts.iter().map(|n| (n + smoothing) / total).collect()
    }
}
