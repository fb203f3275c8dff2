use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted container with read-write locking.
///
/// Chunk contents live inside an `MtResource` so that the worker generating a chunk,
/// the thread building meshes and the caller issuing edits can all hold a handle to
/// the same data. Exactly one writer is expected at a time; the lifecycle latches on
/// [`ChunkData`](crate::engine_state::voxels::chunk::ChunkData) decide who that is.
///
/// # Type Parameters
/// - `T`: The type of the contained resource, must be `Send + Sync`
///
/// # Examples
///
/// ```
/// use voxel_world::core::MtResource;
///
/// let heights = MtResource::new([0u8; 16]);
/// heights.get_mut()[3] = 64;
/// assert_eq!(heights.get()[3], 64);
/// ```
///
/// # Poisoning
/// A panic while a guard is held does not make the data unreachable: the guard of a
/// poisoned lock is recovered. Every writer in this crate finishes its mutation before it
/// can panic, so the data is never observed half-written.
#[derive(Debug)]
pub struct MtResource<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync> MtResource<T> {
    /// Creates a new `MtResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard over the contained value.
    ///
    /// Multiple readers can hold a guard at the same time.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns an exclusive guard that allows modifying the contained value.
    ///
    /// Blocks until every outstanding read guard has been dropped.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Send + Sync> Clone for MtResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn clones_share_the_same_value() {
        let counter = MtResource::new(0u32);
        let counter_clone = counter.clone();

        let handle = thread::spawn(move || {
            *counter_clone.get_mut() += 1;
        });
        handle.join().unwrap();

        assert_eq!(*counter.get(), 1);
    }
}
