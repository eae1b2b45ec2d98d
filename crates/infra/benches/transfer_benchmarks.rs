use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use remit_core::Entity;
use remit_infra::{AccountDraft, Ledger, TransferRequest, UserDraft};
use remit_ledger::Account;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

fn funded_ledger(accounts: usize, balance: &str) -> (Ledger, Vec<Account>) {
    let ledger = Ledger::in_memory();
    let owner = ledger.users().create(UserDraft::named("bench")).unwrap();
    let accounts = (0..accounts)
        .map(|i| {
            ledger
                .accounts()
                .create(AccountDraft {
                    name: Some(format!("bench-{i}")),
                    owner_id: Some(owner.id().to_string()),
                    balance: Some(balance.to_string()),
                    currency: Some("USD".to_string()),
                    active: Some(true),
                })
                .unwrap()
        })
        .collect();
    (ledger, accounts)
}

fn request(from: &Account, to: &Account, amount: &str) -> TransferRequest {
    TransferRequest {
        source_account_id: Some(from.id().to_string()),
        destination_account_id: Some(to.id().to_string()),
        amount: Some(amount.to_string()),
        currency: Some("USD".to_string()),
        comment: None,
    }
}

fn bench_transfer_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer_latency");
    group.sample_size(500);

    // Alternate direction so neither account drains.
    group.bench_function("uncontended_pair", |b| {
        let (ledger, accounts) = funded_ledger(2, "1000000.00");
        let mut forward = true;
        b.iter(|| {
            let (from, to) = if forward {
                (&accounts[0], &accounts[1])
            } else {
                (&accounts[1], &accounts[0])
            };
            forward = !forward;
            ledger
                .transfers()
                .transfer(black_box(request(from, to, "1.00")))
                .unwrap();
        });
    });

    group.bench_function("deposit", |b| {
        let (ledger, accounts) = funded_ledger(1, "0");
        let id = accounts[0].id().to_string();
        b.iter(|| {
            ledger.transfers().deposit(&id, black_box(Some("1.00"))).unwrap();
        });
    });

    group.bench_function("rejected_insufficient_funds", |b| {
        let (ledger, accounts) = funded_ledger(2, "0");
        b.iter(|| {
            let _ = ledger
                .transfers()
                .transfer(black_box(request(&accounts[0], &accounts[1], "1.00")));
        });
    });

    group.finish();
}

/// Threads hammer the same pair in opposite directions.
fn bench_contended_transfers(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_transfers");
    group.sample_size(20);

    const PER_THREAD: usize = 100;

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * PER_THREAD) as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                let (ledger, accounts) = funded_ledger(2, "1000000000.00");
                b.iter_custom(|iters| {
                    let mut total = Duration::ZERO;
                    for _ in 0..iters {
                        let barrier = Arc::new(Barrier::new(threads + 1));
                        let handles: Vec<_> = (0..threads)
                            .map(|i| {
                                let ledger = ledger.clone();
                                let barrier = Arc::clone(&barrier);
                                let (from, to) = if i % 2 == 0 {
                                    (accounts[0].clone(), accounts[1].clone())
                                } else {
                                    (accounts[1].clone(), accounts[0].clone())
                                };
                                thread::spawn(move || {
                                    barrier.wait();
                                    for _ in 0..PER_THREAD {
                                        ledger
                                            .transfers()
                                            .transfer(request(&from, &to, "1.00"))
                                            .unwrap();
                                    }
                                })
                            })
                            .collect();
                        barrier.wait();
                        let start = Instant::now();
                        for h in handles {
                            h.join().unwrap();
                        }
                        total += start.elapsed();
                    }
                    total
                });
            },
        );
    }

    group.finish();
}

fn bench_account_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("account_history");

    for transfers in [100usize, 1_000, 5_000] {
        let (ledger, accounts) = funded_ledger(3, "1000000.00");
        for i in 0..transfers {
            let (from, to) = match i % 3 {
                0 => (&accounts[0], &accounts[1]),
                1 => (&accounts[1], &accounts[2]),
                _ => (&accounts[2], &accounts[0]),
            };
            ledger.transfers().transfer(request(from, to, "1.00")).unwrap();
        }
        let id = accounts[0].id().to_string();

        group.throughput(Throughput::Elements(transfers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(transfers), &id, |b, id| {
            b.iter(|| {
                let history = ledger.transactions().list_for_account(black_box(id)).unwrap();
                black_box(history.len());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_transfer_latency,
    bench_contended_transfers,
    bench_account_history
);
criterion_main!(benches);
