#[cfg(feature = "std")]
use std::sync as impl_;

#[cfg(not(feature = "std"))]
use spin as impl_;

/// Process-wide lock around a lazily created table.
///
/// The table starts out as `None` so the lock can live in a `static`.
#[repr(transparent)]
pub(crate) struct CacheLock<T: 'static + Send + Sync>(impl_::RwLock<Option<T>>);

#[repr(transparent)]
pub(crate) struct CacheReadGuard<T: 'static + Send + Sync>(
    impl_::RwLockReadGuard<'static, Option<T>>,
);

#[repr(transparent)]
pub(crate) struct CacheWriteGuard<T: 'static + Send + Sync>(
    impl_::RwLockWriteGuard<'static, Option<T>>,
);

impl<T: 'static + Send + Sync> CacheLock<T> {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self(impl_::RwLock::new(None))
    }

    #[inline]
    pub(crate) fn read(&'static self) -> CacheReadGuard<T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.read();

        // A writer that panicked cannot leave a half-inserted entry behind, so
        // the table is still usable.
        #[cfg(feature = "std")]
        let guard = self.0.read().unwrap_or_else(std::sync::PoisonError::into_inner);

        CacheReadGuard(guard)
    }

    #[inline]
    pub(crate) fn write(&'static self) -> CacheWriteGuard<T> {
        #[cfg(not(feature = "std"))]
        let guard = self.0.write();

        #[cfg(feature = "std")]
        let guard = self
            .0
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        CacheWriteGuard(guard)
    }
}

impl<T: 'static + Send + Sync> CacheReadGuard<T> {
    #[inline]
    pub(crate) fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }
}

impl<T: 'static + Send + Sync + Default> CacheWriteGuard<T> {
    #[inline]
    pub(crate) fn get_or_default(&mut self) -> &mut T {
        self.0.get_or_insert_default()
    }
}
