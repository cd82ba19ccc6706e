// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Mapper registry.
//!
//! Process-wide cache of mapper instances keyed by contract identifier and
//! factory identity. Each key is constructed at most once; a failed
//! construction leaves the key empty so a later call can try again.
//!
//! # Architecture
//!
//! ```text
//! get_mapper(id, factory)
//!        |
//!        v
//!   DashMap<RegistryKey, Arc<Slot>>      (shard lock held only to find the slot)
//!        |
//!        v
//!   Slot.instance: OnceLock  --hit-->  clone and return
//!        | miss
//!        v
//!   Slot.state: Mutex + Condvar
//!        +-- first caller: mark building, release lock, call loader
//!        +-- others: wait for that attempt, share its outcome
//!        +-- failure or unwind: slot retired and removed from the map
//! ```
//!
//! Unrelated keys never contend: the loader runs outside any map lock.
//! Callers holding a retired slot look the key up again.

use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;

use crate::factory::{FactoryHandle, FactoryId};
use crate::loader::{
    ImplementationLoader, LoadError, MapperImplementation, MapperInstance, StaticLoader,
};

/// A contract the registry can hand out as a typed mapper.
///
/// Implemented by `#[mapper]` for `dyn Trait`.
pub trait Contract: Send + Sync + 'static {
    const CONTRACT_ID: &'static str;

    /// View a loaded instance as this contract.
    fn from_instance(instance: &MapperInstance) -> Option<Arc<Self>>;
}

/// Cache key: contract identifier plus the identity of the factory, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryKey {
    pub contract_id: String,
    pub factory: Option<FactoryId>,
}

impl RegistryKey {
    pub fn new(contract_id: impl Into<String>, factory: Option<&FactoryHandle>) -> Self {
        Self {
            contract_id: contract_id.into(),
            factory: factory.map(FactoryHandle::id),
        }
    }
}

impl fmt::Display for RegistryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.factory {
            Some(factory) => write!(f, "{} [{}]", self.contract_id, factory),
            None => f.write_str(&self.contract_id),
        }
    }
}

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("cannot create mapper for contract {contract}: {cause}")]
    Configuration { contract: String, cause: LoadError },

    #[error("implementation loaded for {contract} does not implement the contract")]
    ContractMismatch { contract: String },
}

impl RegistryError {
    /// Contract the error is about.
    pub fn contract(&self) -> &str {
        match self {
            Self::Configuration { contract, .. } | Self::ContractMismatch { contract } => contract,
        }
    }

    /// Underlying load failure, for configuration errors.
    pub fn load_error(&self) -> Option<&LoadError> {
        match self {
            Self::Configuration { cause, .. } => Some(cause),
            Self::ContractMismatch { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct SlotState {
    building: bool,
    attempt: u64,
    last_failure: Option<(u64, LoadError)>,
    // Removed from the map; callers must look the key up again.
    retired: bool,
}

struct Slot {
    instance: OnceLock<MapperInstance>,
    state: Mutex<SlotState>,
    ready: Condvar,
    // Keeps the factory allocation alive, so its address cannot be reused
    // by another factory while this key exists.
    _factory: Option<FactoryHandle>,
}

impl Slot {
    fn new(factory: Option<FactoryHandle>) -> Self {
        Self {
            instance: OnceLock::new(),
            state: Mutex::new(SlotState::default()),
            ready: Condvar::new(),
            _factory: factory,
        }
    }
}

/// Cache of constructed mappers over an [`ImplementationLoader`].
pub struct MapperRegistry<L: ImplementationLoader = StaticLoader> {
    loader: L,
    slots: DashMap<RegistryKey, Arc<Slot>>,
}

impl MapperRegistry<StaticLoader> {
    pub fn new() -> Self {
        Self::with_loader(StaticLoader::new())
    }

    /// Register the generated implementation `T`.
    pub fn register<T: MapperImplementation>(&self) {
        self.loader.register::<T>();
    }
}

impl Default for MapperRegistry<StaticLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ImplementationLoader> MapperRegistry<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            slots: DashMap::new(),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Mapper for `contract_id` without a factory.
    pub fn get_mapper(&self, contract_id: &str) -> Result<MapperInstance, RegistryError> {
        self.instance(contract_id, None)
    }

    /// Mapper for `contract_id` built with `factory`.
    ///
    /// Each distinct factory instance gets its own mapper.
    pub fn get_mapper_with_factory(
        &self,
        contract_id: &str,
        factory: &FactoryHandle,
    ) -> Result<MapperInstance, RegistryError> {
        self.instance(contract_id, Some(factory))
    }

    /// Typed mapper for contract `C`.
    pub fn get<C: Contract + ?Sized>(&self) -> Result<Arc<C>, RegistryError> {
        typed::<C>(self.instance(C::CONTRACT_ID, None)?)
    }

    /// Typed mapper for contract `C` built with `factory`.
    pub fn get_with_factory<C: Contract + ?Sized>(
        &self,
        factory: &FactoryHandle,
    ) -> Result<Arc<C>, RegistryError> {
        typed::<C>(self.instance(C::CONTRACT_ID, Some(factory))?)
    }

    /// Builder for `contract_id`.
    pub fn mapper(&self, contract_id: impl Into<String>) -> MapperBuilder<'_, L> {
        MapperBuilder {
            registry: self,
            contract_id: contract_id.into(),
            factory: None,
        }
    }

    /// Typed builder for contract `C`.
    pub fn mapper_for<C: Contract + ?Sized>(&self) -> TypedMapperBuilder<'_, C, L> {
        TypedMapperBuilder {
            registry: self,
            factory: None,
            _contract: PhantomData,
        }
    }

    /// Whether a constructed mapper is cached for the key.
    pub fn is_cached(&self, contract_id: &str, factory: Option<&FactoryHandle>) -> bool {
        self.slots
            .get(&RegistryKey::new(contract_id, factory))
            .map(|slot| slot.instance.get().is_some())
            .unwrap_or(false)
    }

    /// Number of constructed mappers.
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().instance.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn instance(
        &self,
        contract_id: &str,
        factory: Option<&FactoryHandle>,
    ) -> Result<MapperInstance, RegistryError> {
        let key = RegistryKey::new(contract_id, factory);
        loop {
            let slot = self.slot(&key, factory);
            if let Some(instance) = slot.instance.get() {
                return Ok(instance.clone());
            }
            if let Some(outcome) = self.construct(&key, &slot, factory) {
                return outcome.map_err(|cause| RegistryError::Configuration {
                    contract: contract_id.to_string(),
                    cause,
                });
            }
        }
    }

    fn slot(&self, key: &RegistryKey, factory: Option<&FactoryHandle>) -> Arc<Slot> {
        if let Some(slot) = self.slots.get(key) {
            return Arc::clone(slot.value());
        }
        let slot = self
            .slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Slot::new(factory.cloned())));
        Arc::clone(slot.value())
    }

    /// Outcome for `key`, or `None` when `slot` was retired meanwhile.
    fn construct(
        &self,
        key: &RegistryKey,
        slot: &Arc<Slot>,
        factory: Option<&FactoryHandle>,
    ) -> Option<Result<MapperInstance, LoadError>> {
        let mut state = slot.state.lock();
        loop {
            if let Some(instance) = slot.instance.get() {
                return Some(Ok(instance.clone()));
            }
            if state.retired {
                return None;
            }
            if !state.building {
                break;
            }

            let awaited = state.attempt;
            while state.building && state.attempt == awaited {
                slot.ready.wait(&mut state);
            }
            if let Some((failed, cause)) = &state.last_failure {
                if *failed == awaited {
                    return Some(Err(cause.clone()));
                }
            }
        }

        state.building = true;
        state.attempt += 1;
        let attempt = Attempt {
            slots: &self.slots,
            key,
            slot,
            number: state.attempt,
            settled: false,
        };
        drop(state);

        log::debug!(
            "[XMapper] constructing mapper {} (attempt {})",
            key,
            attempt.number
        );
        let outcome = self.loader.load(&key.contract_id, factory);
        attempt.settle(&outcome);
        Some(outcome)
    }
}

/// One construction attempt on a slot.
///
/// Settles the slot when the loader returns, and also when it unwinds, so
/// waiters are always released.
struct Attempt<'a> {
    slots: &'a DashMap<RegistryKey, Arc<Slot>>,
    key: &'a RegistryKey,
    slot: &'a Arc<Slot>,
    number: u64,
    settled: bool,
}

impl Attempt<'_> {
    fn settle(mut self, outcome: &Result<MapperInstance, LoadError>) {
        self.settled = true;
        let mut state = self.slot.state.lock();
        state.building = false;
        match outcome {
            Ok(instance) => {
                // Only the building caller publishes, so the cell is empty here.
                let _ = self.slot.instance.set(instance.clone());
                state.last_failure = None;
                log::debug!("[XMapper] mapper {} ready", self.key);
            }
            Err(cause) => {
                state.last_failure = Some((self.number, cause.clone()));
                self.retire(&mut state);
                log::warn!("[XMapper] mapper {} construction failed: {}", self.key, cause);
            }
        }
        drop(state);
        self.slot.ready.notify_all();
    }

    // Lock order: slot state, then map shard. Nothing takes them the other way.
    fn retire(&self, state: &mut SlotState) {
        state.retired = true;
        self.slots
            .remove_if(self.key, |_, slot| Arc::ptr_eq(slot, self.slot));
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut state = self.slot.state.lock();
        state.building = false;
        self.retire(&mut state);
        drop(state);
        self.slot.ready.notify_all();
        log::warn!("[XMapper] mapper {} construction unwound", self.key);
    }
}

impl<L: ImplementationLoader + fmt::Debug> fmt::Debug for MapperRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperRegistry")
            .field("loader", &self.loader)
            .field("cached", &self.len())
            .finish()
    }
}

fn typed<C: Contract + ?Sized>(instance: MapperInstance) -> Result<Arc<C>, RegistryError> {
    C::from_instance(&instance).ok_or_else(|| RegistryError::ContractMismatch {
        contract: C::CONTRACT_ID.to_string(),
    })
}

/// `registry.mapper(id).with_factory(f).build()`.
pub struct MapperBuilder<'r, L: ImplementationLoader = StaticLoader> {
    registry: &'r MapperRegistry<L>,
    contract_id: String,
    factory: Option<FactoryHandle>,
}

impl<'r, L: ImplementationLoader> MapperBuilder<'r, L> {
    pub fn with_factory(mut self, factory: impl Into<FactoryHandle>) -> Self {
        self.factory = Some(factory.into());
        self
    }

    pub fn build(self) -> Result<MapperInstance, RegistryError> {
        self.registry
            .instance(&self.contract_id, self.factory.as_ref())
    }
}

/// Typed counterpart of [`MapperBuilder`].
pub struct TypedMapperBuilder<'r, C: Contract + ?Sized, L: ImplementationLoader = StaticLoader> {
    registry: &'r MapperRegistry<L>,
    factory: Option<FactoryHandle>,
    _contract: PhantomData<fn() -> Arc<C>>,
}

impl<'r, C: Contract + ?Sized, L: ImplementationLoader> TypedMapperBuilder<'r, C, L> {
    pub fn with_factory(mut self, factory: impl Into<FactoryHandle>) -> Self {
        self.factory = Some(factory.into());
        self
    }

    pub fn build(self) -> Result<Arc<C>, RegistryError> {
        typed::<C>(
            self.registry
                .instance(C::CONTRACT_ID, self.factory.as_ref())?,
        )
    }
}

static GLOBAL: OnceLock<MapperRegistry> = OnceLock::new();

/// The process-wide registry.
pub fn global() -> &'static MapperRegistry {
    GLOBAL.get_or_init(MapperRegistry::new)
}

/// Register `T` with the process-wide registry.
pub fn register<T: MapperImplementation>() {
    global().register::<T>();
}

/// Mapper for contract `C` from the process-wide registry.
pub fn get_mapper<C: Contract + ?Sized>() -> Result<Arc<C>, RegistryError> {
    global().get::<C>()
}

/// Mapper for contract `C` built with `factory`, from the process-wide registry.
pub fn get_mapper_with_factory<C: Contract + ?Sized>(
    factory: &FactoryHandle,
) -> Result<Arc<C>, RegistryError> {
    global().get_with_factory::<C>(factory)
}

/// Builder for contract `C` on the process-wide registry.
pub fn mapper<C: Contract + ?Sized>() -> TypedMapperBuilder<'static, C> {
    global().mapper_for::<C>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Factory;
    use crate::loader::{ConstructionError, LoaderEntry};
    use crate::{TypeDescriptor, Value};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{mpsc, Barrier};
    use std::thread;
    use std::time::Duration;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct GreeterImpl {
        with_factory: bool,
    }

    impl Greeter for GreeterImpl {
        fn greet(&self) -> String {
            if self.with_factory {
                "hello from factory".into()
            } else {
                "hello".into()
            }
        }
    }

    impl MapperImplementation for GreeterImpl {
        const CONTRACT_ID: &'static str = "tests::Greeter";

        fn construct() -> Result<Self, ConstructionError> {
            Ok(Self {
                with_factory: false,
            })
        }

        fn construct_with_factory(_factory: FactoryHandle) -> Result<Self, ConstructionError> {
            Ok(Self { with_factory: true })
        }
    }

    impl Contract for dyn Greeter {
        const CONTRACT_ID: &'static str = "tests::Greeter";

        fn from_instance(instance: &MapperInstance) -> Option<Arc<Self>> {
            instance
                .downcast::<GreeterImpl>()
                .map(|mapper| mapper as Arc<dyn Greeter>)
        }
    }

    fn factory() -> FactoryHandle {
        FactoryHandle::from_factory(|_: &TypeDescriptor| -> Option<Value> { None })
    }

    fn registry() -> MapperRegistry {
        let registry = MapperRegistry::new();
        registry.register::<GreeterImpl>();
        registry
    }

    #[test]
    fn same_key_returns_same_instance() {
        let registry = registry();
        let a = registry.get_mapper("tests::Greeter").unwrap();
        let b = registry.get_mapper("tests::Greeter").unwrap();
        assert!(a.ptr_eq(&b));
        assert_eq!(registry.len(), 1);
        assert!(registry.is_cached("tests::Greeter", None));
    }

    #[test]
    fn factory_identity_is_part_of_the_key() {
        let registry = registry();
        let f1 = factory();
        let f2 = factory();

        let plain = registry.get_mapper("tests::Greeter").unwrap();
        let with_f1 = registry.get_mapper_with_factory("tests::Greeter", &f1).unwrap();
        let with_f1_again = registry
            .get_mapper_with_factory("tests::Greeter", &f1.clone())
            .unwrap();
        let with_f2 = registry.get_mapper_with_factory("tests::Greeter", &f2).unwrap();

        assert!(!plain.ptr_eq(&with_f1));
        assert!(with_f1.ptr_eq(&with_f1_again));
        assert!(!with_f1.ptr_eq(&with_f2));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn typed_access_and_builder() {
        let registry = registry();
        let greeter = registry.get::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");

        let built = registry.mapper_for::<dyn Greeter>().build().unwrap();
        assert!(Arc::ptr_eq(&greeter, &built));

        let f = factory();
        let from_factory = registry
            .mapper_for::<dyn Greeter>()
            .with_factory(f.clone())
            .build()
            .unwrap();
        assert_eq!(from_factory.greet(), "hello from factory");

        let untyped = registry
            .mapper("tests::Greeter")
            .with_factory(f)
            .build()
            .unwrap();
        assert!(untyped.downcast::<GreeterImpl>().is_some());
    }

    #[test]
    fn concurrent_first_calls_construct_once() {
        static BUILDS: AtomicUsize = AtomicUsize::new(0);

        let registry = Arc::new(MapperRegistry::new());
        registry.loader().register_entry(
            LoaderEntry::for_contract("tests::Slow").with_constructor(|| {
                BUILDS.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(50));
                Ok(MapperInstance::new(42u32))
            }),
        );

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.get_mapper("tests::Slow").unwrap()
                })
            })
            .collect();
        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert!(instances.iter().all(|i| i.ptr_eq(&instances[0])));
    }

    /// Loader whose first attempt for `tests::Gated` waits on two gates: one
    /// signalling the attempt started, one releasing it.
    struct GatedLoader {
        attempts: AtomicUsize,
        started: Barrier,
        release: Barrier,
        fail: bool,
    }

    impl GatedLoader {
        fn new(fail: bool) -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                started: Barrier::new(2),
                release: Barrier::new(2),
                fail,
            }
        }
    }

    impl ImplementationLoader for GatedLoader {
        fn load(
            &self,
            contract_id: &str,
            _factory: Option<&FactoryHandle>,
        ) -> Result<MapperInstance, LoadError> {
            if contract_id != "tests::Gated" {
                return Ok(MapperInstance::new(contract_id.to_string()));
            }
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                self.started.wait();
                self.release.wait();
            }
            if self.fail {
                Err(LoadError::Instantiation {
                    implementation: "tests::GatedImpl".into(),
                    reason: "refused".into(),
                })
            } else {
                Ok(MapperInstance::new(1u8))
            }
        }
    }

    #[test]
    fn concurrent_waiters_share_a_failed_attempt() {
        let registry = Arc::new(MapperRegistry::with_loader(GatedLoader::new(true)));

        let builder = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get_mapper("tests::Gated").unwrap_err())
        };
        registry.loader().started.wait();

        // Everyone arriving while the attempt runs waits for it.
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.get_mapper("tests::Gated").unwrap_err())
            })
            .collect();
        thread::sleep(Duration::from_millis(100));
        registry.loader().release.wait();

        let first = builder.join().unwrap();
        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), first);
        }
        assert!(matches!(
            first.load_error(),
            Some(LoadError::Instantiation { .. })
        ));
        assert_eq!(registry.loader().attempts.load(Ordering::SeqCst), 1);
        assert!(!registry.is_cached("tests::Gated", None));
    }

    #[test]
    fn slow_construction_does_not_block_other_keys() {
        let registry = Arc::new(MapperRegistry::with_loader(GatedLoader::new(false)));
        let warm = registry.get_mapper("tests::Warm").unwrap();

        let builder = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.get_mapper("tests::Gated").unwrap())
        };
        registry.loader().started.wait();

        // `tests::Gated` is mid-construction until the release gate opens.
        let (tx, rx) = mpsc::channel();
        {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let _ = tx.send(registry.get_mapper("tests::Warm").unwrap());
            });
        }
        let hit = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(hit.ptr_eq(&warm));
        assert!(!registry.is_cached("tests::Gated", None));

        registry.loader().release.wait();
        builder.join().unwrap();
        assert!(registry.is_cached("tests::Gated", None));
    }

    /// Loader that panics on its first call.
    struct PanickyLoader {
        calls: AtomicUsize,
    }

    impl ImplementationLoader for PanickyLoader {
        fn load(
            &self,
            _contract_id: &str,
            _factory: Option<&FactoryHandle>,
        ) -> Result<MapperInstance, LoadError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                panic!("loader exploded");
            }
            Ok(MapperInstance::new(5u32))
        }
    }

    #[test]
    fn loader_panic_does_not_wedge_the_key() {
        let registry = Arc::new(MapperRegistry::with_loader(PanickyLoader {
            calls: AtomicUsize::new(0),
        }));

        let first = panic::catch_unwind(AssertUnwindSafe(|| {
            registry.get_mapper("tests::Panicky")
        }));
        assert!(first.is_err());
        assert!(!registry.is_cached("tests::Panicky", None));

        let (tx, rx) = mpsc::channel();
        {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let _ = tx.send(registry.get_mapper("tests::Panicky"));
            });
        }
        let second = rx.recv_timeout(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(second.downcast::<u32>().as_deref(), Some(&5));
        assert_eq!(registry.loader().calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_lookups_leave_no_slots_behind() {
        let registry = MapperRegistry::new();
        let mut factories = Vec::new();
        for _ in 0..1000 {
            let inner: Arc<dyn Factory> =
                Arc::new(|_: &TypeDescriptor| -> Option<Value> { None });
            factories.push(Arc::downgrade(&inner));
            let handle = FactoryHandle::new(inner);
            assert!(registry
                .get_mapper_with_factory("tests::Missing", &handle)
                .is_err());
        }
        assert!(registry.get_mapper("tests::Missing").is_err());

        assert_eq!(registry.slots.len(), 0);
        assert!(factories.iter().all(|factory| factory.upgrade().is_none()));
    }

    #[test]
    fn failure_is_not_cached() {
        let registry = MapperRegistry::new();
        let err = registry.get_mapper("tests::Greeter").unwrap_err();
        assert_eq!(err.contract(), "tests::Greeter");
        assert_eq!(
            err.load_error(),
            Some(&LoadError::NotFound {
                implementation: "tests::GreeterImpl".into()
            })
        );
        assert!(err.to_string().contains("tests::Greeter"));
        assert!(registry.is_empty());

        registry.register::<GreeterImpl>();
        let greeter = registry.get::<dyn Greeter>().unwrap();
        assert_eq!(greeter.greet(), "hello");
    }

    #[test]
    fn load_failure_causes_are_distinguished() {
        let registry = MapperRegistry::new();
        registry.loader().register_entry(
            LoaderEntry::for_contract("tests::DefaultOnly")
                .with_constructor(|| Ok(MapperInstance::new(()))),
        );
        registry.loader().register_entry(
            LoaderEntry::for_contract("tests::Refuses")
                .with_constructor(|| Err(ConstructionError::new("no"))),
        );
        registry.loader().register_entry(
            LoaderEntry::for_contract("tests::Panics").with_constructor(|| panic!("kaput")),
        );

        let cause = |id: &str, factory: Option<&FactoryHandle>| {
            let err = match factory {
                Some(f) => registry.get_mapper_with_factory(id, f),
                None => registry.get_mapper(id),
            }
            .unwrap_err();
            err.load_error().cloned()
        };

        assert!(matches!(
            cause("tests::Missing", None),
            Some(LoadError::NotFound { .. })
        ));
        assert!(matches!(
            cause("tests::Refuses", None),
            Some(LoadError::Instantiation { .. })
        ));
        assert!(matches!(
            cause("tests::DefaultOnly", Some(&factory())),
            Some(LoadError::NoCompatibleConstructor {
                with_factory: true,
                ..
            })
        ));
        assert!(matches!(
            cause("tests::Panics", None),
            Some(LoadError::ConstructorPanicked { .. })
        ));
    }

    #[test]
    fn wrong_implementation_type_is_a_contract_mismatch() {
        let registry = MapperRegistry::new();
        registry.loader().register_entry(
            LoaderEntry::for_contract("tests::Greeter")
                .with_constructor(|| Ok(MapperInstance::new("not a greeter"))),
        );
        assert_eq!(
            registry.get::<dyn Greeter>().err(),
            Some(RegistryError::ContractMismatch {
                contract: "tests::Greeter".into()
            })
        );
    }
}
