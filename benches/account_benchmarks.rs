//! Benchmarks for account mutations

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chrono::{DateTime, Utc};
use coopledger::{Account, TransferLogging};
use rust_decimal::Decimal;

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn bench_deposit_withdraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("deposit_withdraw");

    for batch_size in [10usize, 100, 1_000].iter() {
        group.throughput(Throughput::Elements(*batch_size as u64 * 2));
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    let mut account = Account::savings("CTA-0001").unwrap();
                    for i in 0..batch_size {
                        let amount = Decimal::new(1_000 + i as i64, 2);
                        account.deposit_at(amount, base_time()).unwrap();
                        account.withdraw_at(amount / Decimal::TWO, base_time()).unwrap();
                    }
                    black_box(account)
                });
            },
        );
    }

    group.finish();
}

fn bench_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer");

    for logging in [TransferLogging::WithdrawalAndTransferOut, TransferLogging::TransferOutOnly] {
        group.bench_function(format!("{:?}", logging), |b| {
            b.iter(|| {
                let mut source = Account::savings("A").unwrap();
                let mut destination = Account::savings("B").unwrap();
                source.deposit_at(Decimal::new(1_000_000, 2), base_time()).unwrap();
                for _ in 0..100 {
                    source
                        .transfer_at(Some(&mut destination), Decimal::ONE, base_time(), logging)
                        .unwrap();
                }
                black_box((source, destination))
            });
        });
    }

    group.finish();
}

fn bench_apply_interest(c: &mut Criterion) {
    let mut account = Account::savings("A").unwrap();
    account.deposit_at(Decimal::new(123_456_789, 2), base_time()).unwrap();

    c.bench_function("apply_interest", |b| {
        b.iter(|| {
            let mut account = account.clone();
            black_box(account.apply_interest())
        });
    });
}

criterion_group!(benches, bench_deposit_withdraw, bench_transfer, bench_apply_interest);
criterion_main!(benches);
