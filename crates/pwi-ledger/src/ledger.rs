use serde::{Deserialize, Serialize};

use pwi_store::StateStore;
use pwi_types::{Farm, InsuranceBook, InsuranceContract, User};

use crate::analyzer::WeatherHistoryAnalyzer;
use crate::codec::{parse_int, persist};
use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use crate::index::IndexRegistry;
use crate::keys::{primary_key, FARM_INDEX_KEY, USER_INDEX_KEY};
use crate::repository::EntityRepository;
use crate::settlement::{Payout, SettlementEngine};

/// Result of recording one weather reading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherUpdate {
    pub farm: String,
    pub history_len: usize,
    pub condition_met: bool,
    pub settlements: Vec<Payout>,
}

/// A parametric insurance ledger over one state store.
pub struct Ledger<S: StateStore> {
    store: S,
    config: LedgerConfig,
    analyzer: WeatherHistoryAnalyzer,
}

impl<S: StateStore> Ledger<S> {
    /// Create a ledger with the default contract terms.
    pub fn new(store: S) -> Self {
        let config = LedgerConfig::default();
        Self {
            store,
            analyzer: WeatherHistoryAnalyzer::new(config.trigger.clone()),
            config,
        }
    }

    pub fn with_config(store: S, config: LedgerConfig) -> LedgerResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            analyzer: WeatherHistoryAnalyzer::new(config.trigger.clone()),
            config,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn repository(&self) -> EntityRepository<'_, S> {
        EntityRepository::new(&self.store)
    }

    pub fn indexes(&self) -> IndexRegistry<'_, S> {
        IndexRegistry::new(&self.store)
    }

    /// Clear the farm and user indexes and the insurance book.
    ///
    /// Entity records themselves are left in place. The seed is written as
    /// decimal text under the configured seed key.
    pub fn init(&self, seed: &str) -> LedgerResult<()> {
        let seed = parse_int("seed", seed)?;
        persist(&self.store, &self.config.init_seed_key, seed.to_string().as_bytes())?;

        let indexes = self.indexes();
        indexes.reset(FARM_INDEX_KEY)?;
        indexes.reset(USER_INDEX_KEY)?;
        self.repository().save_book(&InsuranceBook::new())?;
        tracing::info!(seed, "ledger initialized");
        Ok(())
    }

    pub fn create_user(&self, name: &str, coin: &str) -> LedgerResult<User> {
        self.repository().create_user(name, coin)
    }

    pub fn create_farm<T: AsRef<str>>(
        &self,
        name: &str,
        address: &str,
        owner: &str,
        weather_pairs: &[T],
    ) -> LedgerResult<Farm> {
        self.repository().create_farm(name, address, owner, weather_pairs)
    }

    pub fn create_insurance(
        &self,
        insurant_farm: &str,
        beneficiary_user: &str,
        coverage_number: &str,
        rate: &str,
        state: &str,
    ) -> LedgerResult<InsuranceContract> {
        self.repository()
            .create_insurance(insurant_farm, beneficiary_user, coverage_number, rate, state)
    }

    /// Record a reading and settle the farm's contracts if the updated
    /// trailing window meets the condition.
    ///
    /// The condition is evaluated on every call once the history is long
    /// enough, not only the first time it holds.
    pub fn update_weather(&self, farm: &str, label: &str, temperature: &str) -> LedgerResult<WeatherUpdate> {
        let record = self.repository().append_weather(farm, label, temperature)?;
        let key = primary_key(farm);
        let condition_met = self.analyzer.condition_met(&record);

        let settlements = if condition_met {
            tracing::info!(farm = %key, "payout condition met");
            SettlementEngine::new(&self.store).settle(&key)?
        } else {
            Vec::new()
        };

        Ok(WeatherUpdate {
            history_len: record.history_len(),
            farm: key,
            condition_met,
            settlements,
        })
    }

    pub fn read(&self, key: &str) -> LedgerResult<Vec<u8>> {
        self.repository().read(key)
    }

    pub fn write(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        self.repository().write(key, value)
    }

    pub fn farms(&self) -> LedgerResult<Vec<String>> {
        self.indexes().list(FARM_INDEX_KEY)
    }

    pub fn users(&self) -> LedgerResult<Vec<String>> {
        self.indexes().list(USER_INDEX_KEY)
    }

    pub fn farm(&self, name: &str) -> LedgerResult<Farm> {
        self.repository().farm(name)
    }

    pub fn user(&self, name: &str) -> LedgerResult<User> {
        self.repository().user(name)
    }

    pub fn insurance_book(&self) -> LedgerResult<InsuranceBook> {
        self.repository().load_book()
    }
}
