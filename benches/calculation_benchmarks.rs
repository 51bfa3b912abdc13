//! Performance benchmarks for the tax engine.
//!
//! The calculators are pure and are expected to stay in the
//! sub-microsecond range; the ledger benchmark covers the locked
//! read-validate-write path.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use tax_engine::calculation::{
    SaGainsInput, UkInterestInput, UkResidencyInput, assess_uk_residency, calculate_sa_cgt,
    calculate_uk_savings_tax, taper_status,
};
use tax_engine::config::{AllowanceContext, PolicyLoader};
use tax_engine::ledger::AllowanceLedger;
use tax_engine::models::{AllowanceKind, GiftKind, GiftRecord, TaxBand, UkTies};
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn load_policies() -> Arc<PolicyLoader> {
    Arc::new(PolicyLoader::load("./config/policies").expect("failed to load policies"))
}

fn bench_uk_residency(c: &mut Criterion) {
    let policies = load_policies();
    let policy = policies.for_label("2024/25").unwrap();
    let input = UkResidencyInput {
        tax_year: "2024/25".to_string(),
        days_in_uk: 100,
        ties: UkTies {
            family: true,
            accommodation: true,
            work: false,
            ninety_day: false,
            country: false,
        },
        resident_in_prior_year: true,
    };

    c.bench_function("uk_statutory_residence_test", |b| {
        b.iter(|| assess_uk_residency(black_box(&input), &policy.uk.srt).unwrap())
    });
}

fn bench_sa_cgt(c: &mut Criterion) {
    let policies = load_policies();
    let policy = policies.for_label("2024/25").unwrap();
    let input = SaGainsInput {
        total_gains: dec("987654.32"),
        wrapper_gains: dec("12345.67"),
        marginal_rate: dec("0.45"),
    };

    c.bench_function("sa_capital_gains", |b| {
        b.iter(|| calculate_sa_cgt(black_box(&input), &policy.sa.cgt).unwrap())
    });
}

fn bench_uk_savings_tax(c: &mut Criterion) {
    let policies = load_policies();
    let policy = policies.for_label("2024/25").unwrap();
    let input = UkInterestInput {
        total_interest: dec("9000"),
        wrapper_interest: dec("500"),
        non_savings_income: dec("14000"),
        band: TaxBand::Basic,
    };

    c.bench_function("uk_savings_interest", |b| {
        b.iter(|| calculate_uk_savings_tax(black_box(&input), &policy.uk.savings).unwrap())
    });
}

fn bench_taper_status(c: &mut Criterion) {
    let gift = GiftRecord {
        id: Uuid::new_v4(),
        recipient: "nephew".to_string(),
        date: NaiveDate::from_ymd_opt(2019, 5, 1).unwrap(),
        value: dec("50000"),
        kind: GiftKind::PotentiallyExempt,
        exemption: None,
        deleted: false,
    };
    let as_of = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();

    c.bench_function("gift_taper_status", |b| {
        b.iter(|| taper_status(black_box(&gift), black_box(as_of)).unwrap())
    });
}

fn bench_ledger_round_trip(c: &mut Criterion) {
    let entry_date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let ctx = AllowanceContext::default();

    c.bench_function("ledger_record_and_balance", |b| {
        b.iter_batched(
            || AllowanceLedger::new(load_policies()),
            |ledger| {
                ledger
                    .record_contribution(
                        "user_001",
                        AllowanceKind::IsaSubscription,
                        "2024/25",
                        dec("100"),
                        entry_date,
                        None,
                        &ctx,
                    )
                    .unwrap();
                ledger
                    .balance("user_001", AllowanceKind::IsaSubscription, "2024/25", &ctx)
                    .unwrap()
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_uk_residency,
    bench_sa_cgt,
    bench_uk_savings_tax,
    bench_taper_status,
    bench_ledger_round_trip
);
criterion_main!(benches);
