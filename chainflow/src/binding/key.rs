//! Typed scratch keys.

use std::fmt;
use std::marker::PhantomData;

/// A scratch-map key carrying the type of the value stored under it.
///
/// ```rust,ignore
/// const CREDIT_RESULT: ScratchKey<CreditResult> = ScratchKey::new("creditResult");
///
/// ctx.write(&CREDIT_RESULT, result)?;
/// let result = ctx.read(&CREDIT_RESULT)?;
/// ```
pub struct ScratchKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ScratchKey<T> {
    /// Creates a new key.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Returns the key name used in the scratch map.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for ScratchKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ScratchKey<T> {}

impl<T> PartialEq for ScratchKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T> Eq for ScratchKey<T> {}

impl<T> fmt::Debug for ScratchKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchKey")
            .field("name", &self.name)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> fmt::Display for ScratchKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
