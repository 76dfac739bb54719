//! # Skeleton Container
//!
//! A typed, lazily-constructing singleton container.
//!
//! Bindings are registered under a [`Key<T>`] either as a factory
//! ([`Container::singleton`]) or as a ready value ([`Container::instance`]).
//! [`Container::make`] constructs a factory binding on first use, memoizes the
//! result and returns the same `Arc<T>` to every later caller. Concurrent first
//! resolutions are serialized per key so the factory runs at most once.
//!
//! Bindings that implement [`Lifecycle`] can be registered with
//! [`Container::service`]; [`Container::start_services`] and
//! [`Container::stop_services`] then drive them as a group.
mod key;

pub use key::Key;

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use once_cell::sync::OnceCell;

use crate::kernel::component::{Lifecycle, Managed};
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};

type Erased = Box<dyn Any + Send + Sync>;
type ErasedFactory = Box<dyn Fn(&Container) -> Result<Erased> + Send + Sync>;
type ServiceResolver = Arc<dyn Fn(&Container) -> Result<Arc<dyn Lifecycle>> + Send + Sync>;

struct Binding {
    type_id: TypeId,
    type_name: &'static str,
    cell: OnceCell<Erased>,
    // `None` for instance bindings, whose cell is filled at bind time.
    factory: Option<ErasedFactory>,
    // Callers currently resolving this binding while it is still empty.
    pending: AtomicUsize,
}

impl Binding {
    fn new(
        type_id: TypeId,
        type_name: &'static str,
        cell: OnceCell<Erased>,
        factory: Option<ErasedFactory>,
    ) -> Self {
        Self {
            type_id,
            type_name,
            cell,
            factory,
            pending: AtomicUsize::new(0),
        }
    }
}

/// Held by a `make` call that may construct its binding. A binding with a
/// live claim cannot be replaced.
struct Claim(Arc<Binding>);

impl Claim {
    fn new(binding: &Arc<Binding>) -> Self {
        binding.pending.fetch_add(1, Ordering::SeqCst);
        Claim(binding.clone())
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.0.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

struct ServiceEntry {
    name: &'static str,
    resolve: ServiceResolver,
}

thread_local! {
    static RESOLVING: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// Marks a key as under construction on the current thread.
struct ResolutionGuard;

impl ResolutionGuard {
    fn enter(name: &'static str) -> Result<Self> {
        RESOLVING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(&name) {
                let mut chain: Vec<String> = stack.iter().map(|n| n.to_string()).collect();
                chain.push(name.to_string());
                return Err(Error::CircularDependency { chain });
            }
            stack.push(name);
            Ok(ResolutionGuard)
        })
    }
}

impl Drop for ResolutionGuard {
    fn drop(&mut self) {
        RESOLVING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Binding table shared by providers, registries and the application.
#[derive(Default)]
pub struct Container {
    bindings: RwLock<HashMap<&'static str, Arc<Binding>>>,
    services: Mutex<Vec<ServiceEntry>>,
    started: Mutex<Vec<Arc<dyn Lifecycle>>>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("bindings", &self.keys())
            .finish()
    }
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `key` to a factory. Nothing is constructed until the first
    /// [`make`](Self::make).
    ///
    /// Rebinding a key replaces the previous factory as long as it has not
    /// been resolved yet. Rebinding a resolved key fails with
    /// [`Error::AlreadyResolved`], and rebinding one that is being
    /// constructed fails with [`Error::BindingInUse`].
    pub fn singleton<T, F>(&self, key: Key<T>, factory: F) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        let erased: ErasedFactory =
            Box::new(move |container| factory(container).map(|value| Box::new(value) as Erased));
        self.bind(
            key.name(),
            Binding::new(
                TypeId::of::<Arc<T>>(),
                type_name::<T>(),
                OnceCell::new(),
                Some(erased),
            ),
        )
    }

    /// Bind an already constructed value under `key`.
    pub fn instance<T>(&self, key: Key<T>, value: Arc<T>) -> Result<()>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bind(
            key.name(),
            Binding::new(
                TypeId::of::<Arc<T>>(),
                type_name::<T>(),
                OnceCell::with_value(Box::new(value) as Erased),
                None,
            ),
        )
    }

    /// Bind a lifecycle-aware singleton. It is constructed and started by
    /// [`start_services`](Self::start_services), in registration order.
    pub fn service<T, F>(&self, key: Key<T>, factory: F) -> Result<()>
    where
        T: ?Sized + Lifecycle + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.singleton(key, factory)?;

        let resolve: ServiceResolver = Arc::new(move |container| {
            let service = container.make(&key)?;
            Ok(Arc::new(Managed(service)) as Arc<dyn Lifecycle>)
        });
        let mut services = lock(&self.services);
        match services.iter_mut().find(|entry| entry.name == key.name()) {
            Some(entry) => entry.resolve = resolve,
            None => services.push(ServiceEntry {
                name: key.name(),
                resolve,
            }),
        }
        Ok(())
    }

    fn bind(&self, name: &'static str, binding: Binding) -> Result<()> {
        let mut bindings = self.bindings.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = bindings.get(name) {
            if existing.cell.get().is_some() {
                return Err(Error::AlreadyResolved {
                    key: name.to_string(),
                });
            }
            if existing.pending.load(Ordering::SeqCst) > 0 {
                return Err(Error::BindingInUse {
                    key: name.to_string(),
                });
            }
            log::warn!(
                "Rebinding '{}': {} replaces unresolved {}",
                name,
                binding.type_name,
                existing.type_name
            );
        }
        log::trace!("Bound '{}' as {}", name, binding.type_name);
        bindings.insert(name, Arc::new(binding));
        Ok(())
    }

    fn binding<T: ?Sized + 'static>(&self, key: &Key<T>) -> Result<Arc<Binding>> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        Self::lookup(&bindings, key)
    }

    /// The binding for `key`, plus a [`Claim`] when it still has to be
    /// constructed. The claim is taken under the table lock, so a rebind
    /// either happens before it or is rejected.
    fn claim<T: ?Sized + 'static>(&self, key: &Key<T>) -> Result<(Arc<Binding>, Option<Claim>)> {
        let bindings = self.bindings.read().unwrap_or_else(PoisonError::into_inner);
        let binding = Self::lookup(&bindings, key)?;
        let claim = binding.cell.get().is_none().then(|| Claim::new(&binding));
        Ok((binding, claim))
    }

    fn lookup<T: ?Sized + 'static>(
        bindings: &HashMap<&'static str, Arc<Binding>>,
        key: &Key<T>,
    ) -> Result<Arc<Binding>> {
        let binding = bindings
            .get(key.name())
            .cloned()
            .ok_or_else(|| Error::BindingNotFound {
                key: key.name().to_string(),
            })?;
        if binding.type_id != TypeId::of::<Arc<T>>() {
            return Err(Error::TypeMismatch {
                key: key.name().to_string(),
                expected: type_name::<T>(),
                found: binding.type_name,
            });
        }
        Ok(binding)
    }

    /// Resolve `key`, constructing it on first use.
    ///
    /// A failing factory leaves the binding unconstructed so a later call
    /// retries it.
    pub fn make<T>(&self, key: &Key<T>) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        // The table lock is released before construction so factories can
        // resolve their own dependencies.
        let (binding, claim) = self.claim(key)?;

        let value = match binding.cell.get() {
            Some(value) => value,
            None => {
                let _claim = claim;
                let _guard = ResolutionGuard::enter(key.name())?;
                binding.cell.get_or_try_init(|| match &binding.factory {
                    Some(factory) => {
                        log::debug!("Constructing '{}'", key.name());
                        factory(self).map_err(|source| Error::Resolution {
                            key: key.name().to_string(),
                            source: Box::new(source),
                        })
                    }
                    None => Err(Error::BindingNotFound {
                        key: key.name().to_string(),
                    }),
                })?
            }
        };

        value
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or_else(|| Error::TypeMismatch {
                key: key.name().to_string(),
                expected: type_name::<T>(),
                found: binding.type_name,
            })
    }

    /// The value behind `key` if it has already been constructed. Never
    /// runs a factory.
    pub fn resolved<T>(&self, key: &Key<T>) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let binding = self.binding(key).ok()?;
        binding.cell.get()?.downcast_ref::<Arc<T>>().cloned()
    }

    pub fn has<T: ?Sized>(&self, key: &Key<T>) -> bool {
        self.bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key.name())
    }

    /// Bound key names, sorted.
    pub fn keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Names of lifecycle services in registration order.
    pub fn service_names(&self) -> Vec<&'static str> {
        lock(&self.services).iter().map(|entry| entry.name).collect()
    }

    /// Resolve and start every lifecycle service in registration order.
    ///
    /// Stops at the first failure. Services started before it stay recorded,
    /// so [`stop_services`](Self::stop_services) still tears them down.
    pub async fn start_services(&self) -> Result<()> {
        let entries: Vec<(&'static str, ServiceResolver)> = lock(&self.services)
            .iter()
            .map(|entry| (entry.name, entry.resolve.clone()))
            .collect();

        for (name, resolve) in entries {
            let service = resolve(self).map_err(|e| Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Start,
                component_name: Some(name.to_string()),
                message: "Service could not be resolved".to_string(),
                source: Some(Box::new(e)),
            })?;

            log::info!("Starting service: {}", name);
            service.start().await.map_err(|e| Error::KernelLifecycleError {
                phase: KernelLifecyclePhase::Start,
                component_name: Some(name.to_string()),
                message: "Service failed to start".to_string(),
                source: Some(Box::new(e)),
            })?;
            lock(&self.started).push(service);
        }
        Ok(())
    }

    /// Stop every started service in reverse start order.
    ///
    /// Every service is given the chance to stop; failures are logged and
    /// folded into one error.
    pub async fn stop_services(&self) -> Result<()> {
        let started: Vec<Arc<dyn Lifecycle>> = std::mem::take(&mut *lock(&self.started));

        let mut failures = Vec::new();
        for service in started.iter().rev() {
            log::info!("Stopping service: {}", service.name());
            if let Err(e) = service.stop().await {
                log::error!("Error stopping service {}: {}", service.name(), e);
                failures.push((service.name().to_string(), e));
            }
        }
        Error::collect(KernelLifecyclePhase::Shutdown, "service(s) failed to stop", failures)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests;
