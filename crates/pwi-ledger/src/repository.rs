use serde::de::DeserializeOwned;

use pwi_store::StateStore;
use pwi_types::{
    now_millis, ContractState, Farm, InsuranceBook, InsuranceContract, User, WeatherReading,
};

use crate::codec::{decode_or_default, encode, fetch, parse_int, persist, require_non_empty};
use crate::error::{LedgerError, LedgerResult};
use crate::index::IndexRegistry;
use crate::keys::{primary_key, FARM_INDEX_KEY, INSURANCE_KEY, USER_INDEX_KEY};

/// A record type addressed by its lower-cased name.
pub trait NamedRecord: DeserializeOwned {
    /// Noun used in error messages.
    const KIND: &'static str;

    fn name(&self) -> &str;
}

impl NamedRecord for User {
    const KIND: &'static str = "user";

    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedRecord for Farm {
    const KIND: &'static str = "farm";

    fn name(&self) -> &str {
        &self.name
    }
}

/// Typed access to farms, users, and the insurance book.
///
/// Create operations normalize names to lower case, validate their string
/// arguments, and refuse to overwrite a record of the same type and name.
pub struct EntityRepository<'a, S: StateStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: StateStore + ?Sized> EntityRepository<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    fn index(&self) -> IndexRegistry<'a, S> {
        IndexRegistry::new(self.store)
    }

    // ---- Creation ----

    /// Create a user holding `coin` coins.
    pub fn create_user(&self, name: &str, coin: &str) -> LedgerResult<User> {
        require_non_empty("1st", name)?;
        require_non_empty("2nd", coin)?;
        let name = primary_key(name);
        let balance = parse_int("coin", coin)?;

        self.ensure_vacant::<User>(&name)?;

        let user = User::new(name.clone(), balance);
        self.save_user(&name, &user)?;
        self.index().append(USER_INDEX_KEY, &name)?;
        tracing::info!(user = %name, balance, "user created");
        Ok(user)
    }

    /// Create a farm whose history starts with the given readings.
    ///
    /// `weather_pairs` alternates label and temperature tokens and must hold
    /// at least one pair.
    pub fn create_farm<T: AsRef<str>>(
        &self,
        name: &str,
        address: &str,
        owner: &str,
        weather_pairs: &[T],
    ) -> LedgerResult<Farm> {
        require_non_empty("1st", name)?;
        require_non_empty("2nd", address)?;
        require_non_empty("3rd", owner)?;
        if weather_pairs.is_empty() {
            return Err(LedgerError::validation(
                "a farm needs at least one weather reading",
            ));
        }
        if weather_pairs.len() % 2 != 0 {
            return Err(LedgerError::validation(format!(
                "weather label {:?} has no temperature",
                weather_pairs[weather_pairs.len() - 1].as_ref()
            )));
        }

        let history = weather_pairs
            .chunks_exact(2)
            .map(|pair| {
                let temperature = parse_int("temperature", pair[1].as_ref())?;
                Ok(WeatherReading::new(pair[0].as_ref(), temperature))
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        let name = primary_key(name);
        let farm = Farm::new(name.clone(), address.to_lowercase(), owner.to_lowercase(), history);

        self.ensure_vacant::<Farm>(&name)?;

        self.save_farm(&name, &farm)?;
        self.index().append(FARM_INDEX_KEY, &name)?;
        tracing::info!(farm = %name, readings = farm.history_len(), "farm created");
        Ok(farm)
    }

    /// Append a contract to the insurance book, stamped with the current time.
    ///
    /// The farm and user are not required to exist, and a farm/user pair may
    /// hold any number of contracts.
    pub fn create_insurance(
        &self,
        insurant_farm: &str,
        beneficiary_user: &str,
        coverage_number: &str,
        rate: &str,
        state: &str,
    ) -> LedgerResult<InsuranceContract> {
        require_non_empty("1st", insurant_farm)?;
        require_non_empty("2nd", beneficiary_user)?;
        require_non_empty("3rd", coverage_number)?;
        require_non_empty("4th", rate)?;
        require_non_empty("5th", state)?;

        let coverage_number = parse_int("coverage number", coverage_number)?;
        let rate = parse_int("rate", rate)?;
        let state = match state.to_lowercase().parse::<ContractState>() {
            Ok(s @ (ContractState::Pending | ContractState::Active)) => s,
            Ok(ContractState::Solved) => {
                return Err(LedgerError::validation(
                    "a contract cannot be issued already solved",
                ))
            }
            Err(e) => return Err(LedgerError::validation(e.to_string())),
        };

        let contract = InsuranceContract {
            insurant_farm: insurant_farm.to_lowercase(),
            beneficiary_user: beneficiary_user.to_lowercase(),
            issued_at_millis: now_millis(),
            coverage_number,
            rate,
            state,
        };

        let mut book = self.load_book()?;
        book.push(contract.clone());
        self.save_book(&book)?;
        tracing::info!(
            farm = %contract.insurant_farm,
            beneficiary = %contract.beneficiary_user,
            state = %contract.state,
            "insurance issued"
        );
        Ok(contract)
    }

    // ---- Weather ----

    /// Append one reading to an existing farm and return the updated farm.
    ///
    /// The farm is written back under the key it was read from.
    pub fn append_weather(&self, farm: &str, label: &str, temperature: &str) -> LedgerResult<Farm> {
        require_non_empty("1st", farm)?;
        let temperature = parse_int("temperature", temperature)?;
        let name = primary_key(farm);

        let mut farm = self.farm(&name)?;
        farm.record(WeatherReading::new(label, temperature));
        self.save_farm(&name, &farm)?;
        tracing::info!(
            farm = %name,
            label,
            temperature,
            history_len = farm.history_len(),
            "weather recorded"
        );
        Ok(farm)
    }

    // ---- Raw access ----

    /// The bytes stored at `key`, verbatim. A never-written key reads as
    /// empty.
    pub fn read(&self, key: &str) -> LedgerResult<Vec<u8>> {
        Ok(fetch(self.store, key)?.unwrap_or_default())
    }

    /// Overwrite the bytes at `key` without interpreting them.
    pub fn write(&self, key: &str, value: &[u8]) -> LedgerResult<()> {
        persist(self.store, key, value)
    }

    // ---- Typed lookup ----

    /// Look up a record of type `T` under `name`.
    ///
    /// Returns `None` if the key is empty or holds something that does not
    /// decode as `T`.
    pub fn find<T: NamedRecord>(&self, name: &str) -> LedgerResult<Option<T>> {
        let key = primary_key(name);
        let Some(bytes) = fetch(self.store, &key)? else {
            return Ok(None);
        };
        match serde_json::from_slice::<T>(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                if !bytes.is_empty() {
                    tracing::warn!(key = %key, kind = T::KIND, error = %e, "record does not decode as expected type");
                }
                Ok(None)
            }
        }
    }

    pub fn user(&self, name: &str) -> LedgerResult<User> {
        self.find::<User>(name)?.ok_or_else(|| LedgerError::NotFound {
            what: User::KIND,
            key: primary_key(name),
        })
    }

    pub fn farm(&self, name: &str) -> LedgerResult<Farm> {
        self.find::<Farm>(name)?.ok_or_else(|| LedgerError::NotFound {
            what: Farm::KIND,
            key: primary_key(name),
        })
    }

    /// Store `user` under `key`, which need not match `user.name`.
    pub fn save_user(&self, key: &str, user: &User) -> LedgerResult<()> {
        let bytes = encode(key, user)?;
        persist(self.store, key, &bytes)
    }

    pub fn save_farm(&self, key: &str, farm: &Farm) -> LedgerResult<()> {
        let bytes = encode(key, farm)?;
        persist(self.store, key, &bytes)
    }

    /// The insurance book; an absent book is empty.
    pub fn load_book(&self) -> LedgerResult<InsuranceBook> {
        let raw = fetch(self.store, INSURANCE_KEY)?;
        decode_or_default(INSURANCE_KEY, raw)
    }

    pub fn save_book(&self, book: &InsuranceBook) -> LedgerResult<()> {
        let bytes = encode(INSURANCE_KEY, book)?;
        persist(self.store, INSURANCE_KEY, &bytes)
    }

    /// Fail if `name` already holds a `T` with the same name.
    ///
    /// A record of another type under the key is not a conflict and will be
    /// overwritten by the caller.
    fn ensure_vacant<T: NamedRecord>(&self, name: &str) -> LedgerResult<()> {
        match self.find::<T>(name)? {
            Some(existing) if existing.name() == name => Err(LedgerError::AlreadyExists {
                kind: T::KIND,
                name: name.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::FlakyStore;
    use pwi_store::InMemoryStateStore;

    fn weather(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    #[test]
    fn create_user_normalizes_and_indexes() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        let user = repo.create_user("Alice", "100").unwrap();
        assert_eq!(user, User::new("alice", 100));
        assert_eq!(repo.user("ALICE").unwrap(), user);
        assert_eq!(
            IndexRegistry::new(&store).list(USER_INDEX_KEY).unwrap(),
            vec!["alice"]
        );
    }

    #[test]
    fn duplicate_user_rejected_and_balance_kept() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.create_user("alice", "100").unwrap();
        let err = repo.create_user("ALICE", "5").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(repo.user("alice").unwrap().balance, 100);
        assert_eq!(IndexRegistry::new(&store).list(USER_INDEX_KEY).unwrap().len(), 1);
    }

    #[test]
    fn create_user_validates_arguments() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        assert_eq!(repo.create_user("", "1").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(repo.create_user("bob", "").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(repo.create_user("bob", "lots").unwrap_err().kind(), ErrorKind::Validation);
        assert!(store.is_empty());
    }

    #[test]
    fn foreign_record_under_user_key_is_not_a_conflict() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.create_farm("shared", "addr", "owner", &weather(&["sunny", "20"])).unwrap();

        repo.create_user("shared", "10").unwrap();
        assert_eq!(repo.user("shared").unwrap().balance, 10);
        assert!(repo.find::<Farm>("shared").unwrap().is_none());
    }

    #[test]
    fn free_form_value_under_user_key_is_not_a_conflict() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.write("carol", b"hello").unwrap();
        repo.create_user("carol", "1").unwrap();
        assert_eq!(repo.user("carol").unwrap().balance, 1);
    }

    #[test]
    fn store_read_failure_is_not_found() {
        let store = FlakyStore::failing_gets();
        let repo = EntityRepository::new(&store);
        assert_eq!(repo.create_user("alice", "1").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn store_write_failure_is_store_error() {
        let store = FlakyStore::failing_puts_to("alice");
        let repo = EntityRepository::new(&store);
        assert_eq!(repo.create_user("alice", "1").unwrap_err().kind(), ErrorKind::Store);
    }

    // -----------------------------------------------------------------------
    // Farms
    // -----------------------------------------------------------------------

    #[test]
    fn create_farm_builds_history_in_order() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        let farm = repo
            .create_farm("F1", "Main St", "Alice", &weather(&["sunny", "20", "Rainy", "-3"]))
            .unwrap();
        assert_eq!(farm.name, "f1");
        assert_eq!(farm.address, "main st");
        assert_eq!(farm.owner, "alice");
        assert_eq!(
            farm.weather_history,
            vec![WeatherReading::new("sunny", 20), WeatherReading::new("Rainy", -3)]
        );
        assert_eq!(repo.farm("f1").unwrap(), farm);
    }

    #[test]
    fn farm_index_records_creation_order() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.create_farm("a", "x", "o", &weather(&["sunny", "1"])).unwrap();
        repo.create_farm("b", "x", "o", &weather(&["sunny", "1"])).unwrap();
        assert_eq!(IndexRegistry::new(&store).list(FARM_INDEX_KEY).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn duplicate_farm_rejected() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.create_farm("f1", "x", "o", &weather(&["sunny", "1"])).unwrap();
        let err = repo.create_farm("F1", "y", "p", &weather(&["rainy", "2"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(repo.farm("f1").unwrap().address, "x");
    }

    #[test]
    fn create_farm_names_bad_temperature() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        let err = repo
            .create_farm("f1", "x", "o", &weather(&["sunny", "1", "rainy", "hot"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("hot"));
        assert!(store.is_empty());
    }

    #[test]
    fn create_farm_requires_complete_pairs() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        let none: Vec<String> = Vec::new();
        assert_eq!(repo.create_farm("f1", "x", "o", &none).unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(
            repo.create_farm("f1", "x", "o", &weather(&["sunny"])).unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            repo.create_farm("f1", "", "o", &weather(&["sunny", "1"])).unwrap_err().kind(),
            ErrorKind::Validation
        );
    }

    #[test]
    fn append_weather_grows_history_by_one() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        let before = repo.create_farm("f1", "x", "o", &weather(&["sunny", "20"])).unwrap();
        let after = repo.append_weather("F1", "rainy", "15").unwrap();
        assert_eq!(after.history_len(), before.history_len() + 1);
        assert_eq!(after.weather_history[..1], before.weather_history[..]);
        assert_eq!(repo.farm("f1").unwrap(), after);
    }

    #[test]
    fn append_weather_stays_on_the_looked_up_key() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.write("f1", br#"{"name":"x","address":"a","owner":"o","weather_index":[]}"#)
            .unwrap();

        repo.append_weather("f1", "rainy", "1").unwrap();
        assert_eq!(repo.farm("f1").unwrap().history_len(), 1);
        assert!(store.get("x").unwrap().is_none());
    }

    #[test]
    fn append_weather_to_missing_farm_is_not_found() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        let err = repo.append_weather("ghost", "rainy", "1").unwrap_err();
        assert_eq!(err, LedgerError::NotFound { what: "farm", key: "ghost".into() });
    }

    // -----------------------------------------------------------------------
    // Insurance
    // -----------------------------------------------------------------------

    #[test]
    fn create_insurance_appends_to_book() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.create_insurance("F1", "Alice", "5", "10", "Active").unwrap();
        repo.create_insurance("f1", "alice", "1", "1", "pending").unwrap();

        let book = repo.load_book().unwrap();
        assert_eq!(book.len(), 2);
        let first = &book.contracts[0];
        assert_eq!(first.insurant_farm, "f1");
        assert_eq!(first.beneficiary_user, "alice");
        assert_eq!(first.benefit(), Some(50));
        assert_eq!(first.state, ContractState::Active);
        assert!(first.issued_at_millis > 1_577_836_800_000);
        assert_eq!(book.contracts[1].state, ContractState::Pending);
    }

    #[test]
    fn create_insurance_validates_numbers_and_state() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        for (coverage, rate, state) in [
            ("x", "1", "active"),
            ("1", "1.5", "active"),
            ("1", "1", "solved"),
            ("1", "1", "open"),
            ("1", "1", ""),
        ] {
            let err = repo.create_insurance("f1", "alice", coverage, rate, state).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{coverage} {rate} {state}");
        }
        assert!(repo.load_book().unwrap().is_empty());
    }

    #[test]
    fn corrupt_book_is_an_error() {
        let store = InMemoryStateStore::with_entries([(INSURANCE_KEY, "[1,2")]);
        let repo = EntityRepository::new(&store);
        let err = repo.create_insurance("f1", "alice", "1", "1", "active").unwrap_err();
        assert!(matches!(err, LedgerError::Corrupt { .. }));
    }

    // -----------------------------------------------------------------------
    // Raw access
    // -----------------------------------------------------------------------

    #[test]
    fn read_returns_bytes_verbatim() {
        let store = InMemoryStateStore::new();
        let repo = EntityRepository::new(&store);
        repo.write("Free Form", b"\x00raw").unwrap();
        assert_eq!(repo.read("Free Form").unwrap(), b"\x00raw".to_vec());
        assert!(repo.read("free form").unwrap().is_empty());
    }

    #[test]
    fn read_of_missing_key_is_empty() {
        let store = InMemoryStateStore::new();
        assert!(EntityRepository::new(&store).read("nothing").unwrap().is_empty());
    }

    #[test]
    fn read_failure_is_not_found() {
        let store = FlakyStore::failing_gets();
        let err = EntityRepository::new(&store).read("k").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
