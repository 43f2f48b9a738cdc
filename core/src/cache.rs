use std::cell::RefCell;

/// A derived value memoized against a version counter.
///
/// The value is valid iff its stored version equals the version passed to
/// [`VersionedCache::get_or_compute`]. Counters only ever grow, so a stale
/// entry can never be mistaken for a fresh one.
#[derive(Debug)]
pub(crate) struct VersionedCache<T> {
    slot: RefCell<Option<(u64, T)>>,
}

impl<T: Clone> VersionedCache<T> {
    pub fn new() -> Self {
        Self { slot: RefCell::new(None) }
    }

    pub fn get_or_compute<F: FnOnce() -> T>(&self, version: u64, compute: F) -> T {
        if let Some((cached, value)) = self.slot.borrow().as_ref() {
            if *cached == version {
                return value.clone();
            }
        }
        let value = compute();
        *self.slot.borrow_mut() = Some((version, value.clone()));
        value
    }

    #[cfg(test)]
    pub fn is_fresh(&self, version: u64) -> bool {
        matches!(self.slot.borrow().as_ref(), Some((cached, _)) if *cached == version)
    }

    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

impl<T: Clone> Default for VersionedCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
