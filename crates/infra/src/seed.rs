//! Demo data: a handful of users, funded USD accounts and historical
//! transactions, for manual exploration of a fresh process.

use std::sync::Mutex;

use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;

use remit_core::{AccountId, Currency, Entity, LedgerError, LedgerResult, TransactionId, UserId};
use remit_ledger::Account;

use crate::ledger::Ledger;
use crate::repository::{AccountDraft, UserDraft};

const DEMO_USERS: [&str; 8] = [
    "test_user_1",
    "test_user_2",
    "test_user_3",
    "test_user_update",
    "test_user_delete",
    "test_user_info",
    "John Doe",
    "Kate Willson",
];

/// Share of historical transactions recorded as executed; the rest are failed.
const EXECUTED_RATIO: f64 = 0.7;

#[derive(Debug, Default)]
struct Seeded {
    users: Vec<UserId>,
    accounts: Vec<AccountId>,
    transactions: Vec<TransactionId>,
}

/// Counts of records created by one seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub users: usize,
    pub accounts: usize,
    pub transactions: usize,
}

/// Seeds demo data, replacing whatever the previous run seeded.
#[derive(Debug)]
pub struct DemoSeeder {
    ledger: Ledger,
    seeded: Mutex<Seeded>,
}

impl DemoSeeder {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            seeded: Mutex::new(Seeded::default()),
        }
    }

    pub fn seed<R: Rng>(&self, rng: &mut R) -> LedgerResult<SeedReport> {
        let mut seeded = self
            .seeded
            .lock()
            .map_err(|_| LedgerError::internal("demo seeder lock poisoned"))?;

        self.remove_previous(&seeded)?;
        *seeded = Seeded::default();

        for name in DEMO_USERS {
            let user = self.ledger.users().create(UserDraft::named(name))?;
            seeded.users.push(user.id());
        }

        for user in self.ledger.users().list()? {
            for i in 0..rng.gen_range(1..=3) {
                let account = self.ledger.accounts().create(AccountDraft {
                    name: Some(format!("account_{i}")),
                    owner_id: Some(user.id().to_string()),
                    balance: Some(random_money(rng).to_string()),
                    currency: Some(Currency::USD.code().to_string()),
                    active: Some(true),
                })?;
                seeded.accounts.push(account.id());
            }
        }

        let accounts = self.ledger.accounts().list()?;
        if accounts.len() > 1 {
            for (index, account) in accounts.iter().enumerate() {
                for i in 0..rng.gen_range(1..=10) {
                    let mut other = rng.gen_range(0..accounts.len() - 1);
                    if other >= index {
                        other += 1;
                    }
                    let id = self.record_historical(rng, i, account, &accounts[other])?;
                    seeded.transactions.push(id);
                }
            }
        }

        let report = SeedReport {
            users: seeded.users.len(),
            accounts: seeded.accounts.len(),
            transactions: seeded.transactions.len(),
        };
        tracing::info!(
            users = report.users,
            accounts = report.accounts,
            transactions = report.transactions,
            "demo data seeded"
        );
        Ok(report)
    }

    /// A finalized transaction record that never moved any balance.
    fn record_historical<R: Rng>(
        &self,
        rng: &mut R,
        sequence: usize,
        source: &Account,
        destination: &Account,
    ) -> LedgerResult<TransactionId> {
        let store = &self.ledger.stores().transactions;
        let handle = store.create()?;
        let mut tx = handle.lock()?;
        tx.source = Some(source.clone());
        tx.destination = Some(destination.clone());
        tx.amount = random_money(rng);
        tx.currency = Some(Currency::USD);
        tx.comment = format!("money transfer #{sequence}");
        if rng.gen_bool(EXECUTED_RATIO) {
            tx.mark_executed(Utc::now())?;
        } else {
            tx.mark_failed()?;
        }
        store.commit(&handle)?;
        Ok(tx.id())
    }

    fn remove_previous(&self, seeded: &Seeded) -> LedgerResult<()> {
        let stores = self.ledger.stores();
        for id in &seeded.transactions {
            if let Some(handle) = stores.transactions.get(*id)? {
                stores.transactions.delete(&handle)?;
            }
        }
        for id in &seeded.accounts {
            if let Some(handle) = stores.accounts.get(*id)? {
                stores.accounts.delete(&handle)?;
            }
        }
        for id in &seeded.users {
            if let Some(handle) = stores.users.get(*id)? {
                stores.users.delete(&handle)?;
            }
        }
        Ok(())
    }
}

/// Random amount in `[0.00, 10000.00)` with two fraction digits.
fn random_money<R: Rng>(rng: &mut R) -> Decimal {
    Decimal::new(rng.gen_range(0..1_000_000), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use remit_ledger::TransactionStatus;

    #[test]
    fn seeds_users_accounts_and_terminal_transactions() {
        let ledger = Ledger::in_memory();
        let seeder = DemoSeeder::new(ledger.clone());
        let report = seeder.seed(&mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(report.users, DEMO_USERS.len());
        assert!(report.accounts >= DEMO_USERS.len() && report.accounts <= 3 * DEMO_USERS.len());
        assert!(report.transactions >= report.accounts);

        let transactions = ledger.transactions().list().unwrap();
        assert_eq!(transactions.len(), report.transactions);
        for tx in &transactions {
            assert!(tx.status().is_terminal());
            assert_ne!(tx.source_id(), tx.destination_id());
            assert_eq!(tx.currency, Some(Currency::USD));
            assert_eq!(
                tx.executed_at().is_some(),
                tx.status() == TransactionStatus::Executed
            );
        }
    }

    #[test]
    fn reseeding_replaces_previous_run() {
        let ledger = Ledger::in_memory();
        let seeder = DemoSeeder::new(ledger.clone());
        let mut rng = StdRng::seed_from_u64(11);

        seeder.seed(&mut rng).unwrap();
        let second = seeder.seed(&mut rng).unwrap();

        assert_eq!(ledger.users().list().unwrap().len(), DEMO_USERS.len());
        assert_eq!(ledger.accounts().list().unwrap().len(), second.accounts);
        assert_eq!(ledger.transactions().list().unwrap().len(), second.transactions);
    }

    #[test]
    fn seeded_balances_are_never_negative() {
        let ledger = Ledger::in_memory();
        DemoSeeder::new(ledger.clone())
            .seed(&mut StdRng::seed_from_u64(3))
            .unwrap();
        for account in ledger.accounts().list().unwrap() {
            assert!(account.balance >= Decimal::ZERO);
            assert!(account.active);
        }
    }
}
