use std::fmt;
use std::sync::Mutex;
use std::sync::PoisonError;

use axum::Router;

/// Named route groups contributed by providers during boot.
///
/// Registering a group only records the fact; the server merges every group
/// into one router when it is built.
#[derive(Default)]
pub struct RouteTable {
    groups: Mutex<Vec<(String, Router)>>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("groups", &self.names())
            .finish()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route group. A group with the same name is replaced.
    pub fn add(&self, name: impl Into<String>, router: Router) {
        let name = name.into();
        let mut groups = self.groups.lock().unwrap_or_else(PoisonError::into_inner);
        match groups.iter_mut().find(|(existing, _)| *existing == name) {
            Some(group) => {
                log::warn!("Route group '{}' replaced", name);
                group.1 = router;
            }
            None => {
                log::debug!("Route group registered: {}", name);
                groups.push((name, router));
            }
        }
    }

    /// Group names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.groups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }

    /// Merge every group into a single router.
    pub fn router(&self) -> Router {
        self.groups
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .fold(Router::new(), |merged, (_, group)| merged.merge(group.clone()))
    }
}
