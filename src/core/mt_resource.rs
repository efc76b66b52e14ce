use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `MtResource` provides synchronized access to a value of type `T` that can be shared
/// across threads. It uses an `Arc<RwLock<T>>` internally to manage concurrent access.
/// The voxel store is held in one of these: the main thread is the only writer,
/// background mesh walks only ever take the read side.
///
/// # Type Parameters
/// - `T`: The type of the contained resource, must be `Send + Sync`
///
/// # Examples
///
/// ```
/// use blockworld::core::MtResource;
///
/// let counter = MtResource::new(0);
/// *counter.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Poisoning
/// A writer that panics while holding the lock poisons it. `get()` and `get_mut()`
/// recover the guard anyway, since every write to the resources we share is a single
/// self-contained call. Worker threads that want to surface poisoning as an error use
/// `try_read()` instead.
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

/// Returned by [`MtResource::try_read`] when a writer panicked while holding the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePoisoned;

impl<T: Send + Sync + 'static> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard that allows reading the contained value.
    ///
    /// Blocks while a writer holds the lock.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a mutable guard that allows modifying the contained value.
    ///
    /// Blocks until every outstanding reader (including background walks) has
    /// released its guard.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires a read guard, reporting a poisoned lock instead of recovering it.
    ///
    /// # Returns
    /// - `Ok(guard)` once the read lock is held
    /// - `Err(ResourcePoisoned)` if a writer panicked while holding the lock
    pub fn try_read(&self) -> Result<RwLockReadGuard<'_, T>, ResourcePoisoned> {
        self.resource.read().map_err(|_| ResourcePoisoned)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
