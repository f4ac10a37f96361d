criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(10)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        updating_predictor_window,
        predicting_next_move,
        replaying_archive,
        choosing_counter_move,
}

use oddsevens::ID;
use oddsevens::config::PolicyConfig;
use oddsevens::config::PredictorConfig;
use oddsevens::game::*;
use oddsevens::gameroom::Policy;
use oddsevens::predictor::Prediction;
use oddsevens::predictor::Predictor;

fn archive(n: u64) -> Vec<RoundRecord> {
    let session = ID::default();
    (1..=n)
        .map(|i| {
            let human = Fingers::clamp((i * 7 % 5) as u8 + 1);
            let choice = Parity::of(i as u8 / 3);
            let robot = Fingers::clamp((i % 5) as u8 + 1);
            RoundRecord::new(i, session, 1, choice, robot, Some(human), Prediction::uniform())
        })
        .collect()
}

fn updating_predictor_window(c: &mut criterion::Criterion) {
    let records = archive(1_000);
    c.bench_function("fold 1000 rounds into a fresh predictor", |b| {
        b.iter(|| {
            let mut predictor = Predictor::new(PredictorConfig::default());
            records.iter().for_each(|r| {
                let _ = predictor.update(r);
            });
            predictor.observed()
        })
    });
}

fn predicting_next_move(c: &mut criterion::Criterion) {
    let predictor = Predictor::replay(PredictorConfig::default(), &archive(100));
    c.bench_function("predict the next move", |b| b.iter(|| predictor.predict()));
}

fn replaying_archive(c: &mut criterion::Criterion) {
    let records = archive(10_000);
    let state = Predictor::replay(PredictorConfig::default(), &records[..9_999]).snapshot();
    c.bench_function("restore a stale snapshot by replay", |b| {
        b.iter(|| Predictor::restore(state.clone(), PredictorConfig::default(), &records).observed())
    });
}

fn choosing_counter_move(c: &mut criterion::Criterion) {
    let prediction = Predictor::replay(PredictorConfig::default(), &archive(100)).predict();
    let mut policy = Policy::new(PolicyConfig {
        seed: Some(0),
        ..PolicyConfig::default()
    });
    c.bench_function("choose an epsilon-greedy counter-move", |b| {
        b.iter(|| policy.choose(&prediction, Parity::Odds, 100))
    });
}
