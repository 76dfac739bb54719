//! # Skeleton Registry
//!
//! One ordered, name-addressed collection used for every kind of bulk
//! registration: container components (repositories, services), scheduled
//! jobs and service providers.
//!
//! [`Registry<R>`] keeps items in insertion order and never deduplicates;
//! what "registering" an item means is supplied by inherent impls on the
//! concrete instantiation. For container components that is
//! [`Registry::register_all`], which binds each [`Registrable`] as a lazy
//! singleton.
use std::fmt;
use std::sync::Arc;

use crate::container::{Container, Key};
use crate::kernel::error::Result;

/// Anything a [`Registry`] can hold.
pub trait Named {
    fn name(&self) -> &str;

    /// Extra detail included in the registration log line.
    fn describe(&self) -> String {
        String::new()
    }
}

/// An item that knows how to bind itself into a [`Container`].
pub trait Registrable: Named + Send + Sync {
    fn bind(&self, container: &Container) -> Result<()>;
}

type ComponentFactory<T> = Arc<dyn Fn(&Container) -> Result<Arc<T>> + Send + Sync>;

/// A factory-backed container component.
pub struct Component<T: ?Sized> {
    key: Key<T>,
    factory: ComponentFactory<T>,
}

impl<T> Component<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    pub fn new<F>(key: Key<T>, factory: F) -> Self
    where
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            key,
            factory: Arc::new(factory),
        }
    }

    pub fn key(&self) -> Key<T> {
        self.key
    }
}

impl<T: ?Sized> Named for Component<T> {
    fn name(&self) -> &str {
        self.key.name()
    }

    fn describe(&self) -> String {
        std::any::type_name::<T>().to_string()
    }
}

impl<T> Registrable for Component<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn bind(&self, container: &Container) -> Result<()> {
        let factory = self.factory.clone();
        container.singleton(self.key, move |c| factory(c))
    }
}

/// Ordered collection of named items.
pub struct Registry<R: ?Sized = dyn Registrable> {
    label: &'static str,
    items: Vec<Box<R>>,
}

impl<R: ?Sized + Named> fmt::Debug for Registry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("label", &self.label)
            .field("items", &self.names())
            .finish()
    }
}

impl<R: ?Sized + Named> Registry<R> {
    /// Create an empty registry; `label` names the item kind in log output.
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            items: Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Append an item. Duplicate names are kept.
    pub fn register(&mut self, item: Box<R>) -> &mut Self {
        let detail = item.describe();
        if detail.is_empty() {
            log::debug!("Registered {} '{}'", self.label, item.name());
        } else {
            log::debug!("Registered {} '{}' ({})", self.label, item.name(), detail);
        }
        self.items.push(item);
        self
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item names in insertion order, duplicates included.
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.name()).collect()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &R> + '_ {
        self.items.iter().map(|item| item.as_ref())
    }
}

impl Registry<dyn Registrable> {
    /// Shorthand for registering a [`Component`].
    pub fn component<T, F>(&mut self, key: Key<T>, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Result<Arc<T>> + Send + Sync + 'static,
    {
        self.register(Box::new(Component::new(key, factory)))
    }

    /// Bind every item into `container` in insertion order.
    ///
    /// Nothing is constructed here. The only failure is the container
    /// refusing a binding, which stops the pass.
    pub fn register_all(&self, container: &Container) -> Result<()> {
        for item in &self.items {
            item.bind(container)?;
        }
        log::info!("Registered {} {} binding(s)", self.items.len(), self.label);
        Ok(())
    }
}
