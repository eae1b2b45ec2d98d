use remit_core::LedgerResult;
use remit_infra::seed::{DemoSeeder, SeedReport};
use remit_infra::{Ledger, StoreBundle};

use crate::config::ApiConfig;

/// Everything the handlers share.
#[derive(Debug)]
pub struct AppServices {
    ledger: Ledger,
    seeder: DemoSeeder,
    demo_endpoint: bool,
}

/// Wire a fresh in-memory ledger, seeding it when configured to.
pub fn build_services(config: &ApiConfig) -> LedgerResult<AppServices> {
    let ledger = Ledger::new(StoreBundle::in_memory(), config.ledger);
    let services = AppServices {
        seeder: DemoSeeder::new(ledger.clone()),
        ledger,
        demo_endpoint: config.demo_endpoint,
    };

    if config.seed_demo_data {
        services.seed_demo_data()?;
    }
    Ok(services)
}

impl AppServices {
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn demo_endpoint_enabled(&self) -> bool {
        self.demo_endpoint
    }

    pub fn seed_demo_data(&self) -> LedgerResult<SeedReport> {
        self.seeder.seed(&mut rand::thread_rng())
    }
}
