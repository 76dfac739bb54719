use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed handle to a container binding.
///
/// The name is the binding's identity; `T` fixes what [`Container::make`]
/// hands back, so callers never downcast. Keys are usually declared as
/// constants next to the trait they resolve to:
///
/// ```
/// use skeleton_core::container::Key;
///
/// pub trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// pub const GREETER: Key<dyn Greeter> = Key::new("greeter");
/// assert_eq!(GREETER.name(), "greeter");
/// ```
///
/// [`Container::make`]: super::Container::make
pub struct Key<T: ?Sized> {
    name: &'static str,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> Key<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: derives would require `T: Clone` / `T: Debug`.
impl<T: ?Sized> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Key<T> {}

impl<T: ?Sized> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: ?Sized> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
