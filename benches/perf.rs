use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use courtcast::features;
use courtcast::player::{PlayerRecord, parse_roster_json};
use courtcast::rank::{self, Stat};
use courtcast::train::{TrainConfig, train};

fn synthetic_roster(n: u32) -> Vec<PlayerRecord> {
    (0..n)
        .map(|i| {
            let mut rec = PlayerRecord::bare(i, &format!("Player {i}"));
            rec.team = "TST".to_string();
            rec.age = Some(19.0 + (i % 20) as f64);
            rec.ppg_last = Some(4.0 + (i % 28) as f64);
            rec.apg_last = Some(1.0 + (i % 10) as f64);
            rec.rpg_last = Some(2.0 + (i % 13) as f64);
            rec.spg_last = Some(0.5 + (i % 3) as f64 * 0.4);
            rec.tov_last = Some(1.0 + (i % 4) as f64 * 0.5);
            rec.fg_pct_last = Some(0.40 + (i % 15) as f64 * 0.01);
            rec.min_last = Some(12.0 + (i % 26) as f64);
            rec.games_played_last = Some(55.0 + (i % 27) as f64);
            rec.ppg_prev = Some(3.5 + (i % 24) as f64);
            rec.ppg_last_10 = Some(5.0 + (i % 30) as f64);
            rec.ppg_trend = Some((i % 7) as f64 - 3.0);
            rec.ppg_std = Some(3.0 + (i % 6) as f64);
            rec
        })
        .collect()
}

fn bench_roster_parse(c: &mut Criterion) {
    c.bench_function("roster_parse", |b| {
        b.iter(|| {
            let roster = parse_roster_json(black_box(ROSTER_JSON)).unwrap();
            black_box(roster.len());
        })
    });
}

fn bench_feature_matrix(c: &mut Criterion) {
    let roster = synthetic_roster(450);
    c.bench_function("feature_matrix_build", |b| {
        b.iter(|| {
            let matrix = features::build_matrix(black_box(&roster)).unwrap();
            black_box(matrix.len());
        })
    });
}

fn bench_predict_batch(c: &mut Criterion) {
    let roster = synthetic_roster(450);
    let cfg = TrainConfig {
        epochs: 3,
        ..TrainConfig::default()
    };
    let model = train(&roster, &cfg).expect("fit");

    c.bench_function("predict_batch", |b| {
        b.iter(|| {
            let preds = model.predict_batch(black_box(&roster)).unwrap();
            black_box(preds.len());
        })
    });
}

fn bench_rankings(c: &mut Criterion) {
    let roster = synthetic_roster(450);
    let cfg = TrainConfig {
        epochs: 3,
        ..TrainConfig::default()
    };
    let model = train(&roster, &cfg).expect("fit");
    let preds = model.predict_batch(&roster).expect("predict");

    c.bench_function("top_n_rankings", |b| {
        b.iter(|| {
            let leaders = rank::top_n(black_box(&roster), black_box(&preds), Stat::Points, 10);
            black_box(leaders.len());
        })
    });

    c.bench_function("breakout_scan", |b| {
        b.iter(|| {
            let rows = rank::breakouts(black_box(&roster), black_box(&preds), 5.0, 10);
            black_box(rows.len());
        })
    });
}

fn bench_train_small(c: &mut Criterion) {
    let roster = synthetic_roster(60);
    let cfg = TrainConfig {
        epochs: 5,
        hidden_sizes: vec![16],
        ..TrainConfig::default()
    };

    c.bench_function("train_small_roster", |b| {
        b.iter(|| {
            let model = train(black_box(&roster), black_box(&cfg)).unwrap();
            black_box(model.metrics.train_loss);
        })
    });
}

criterion_group!(
    perf,
    bench_roster_parse,
    bench_feature_matrix,
    bench_predict_batch,
    bench_rankings,
    bench_train_small
);
criterion_main!(perf);

static ROSTER_JSON: &str = include_str!("../tests/fixtures/roster_small.json");
