//! Expected-error assertion support

use std::any::type_name;
use std::error::Error;

/// A type-erased error: the "anything the operation may raise" position.
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Run `op`, require that it errors, and require the error's concrete type.
///
/// The comparison is exact type identity via downcast, not source-chain
/// inspection or trait compatibility. On a match the concrete error is
/// returned by value for further inspection.
///
/// # Panics
///
/// Fails the test when `op` returns `Ok`, or when the raised error is not an
/// `E`; the mismatch message names both the actual error and the expected
/// type.
pub fn assert_raises<E, T>(op: impl FnOnce() -> Result<T, BoxError>) -> E
where
    E: Error + Send + Sync + 'static,
{
    let err = match op() {
        Ok(_) => panic!("error was not raised, expected {}", type_name::<E>()),
        Err(err) => err,
    };

    match err.downcast::<E>() {
        Ok(err) => *err,
        Err(other) => panic!("error was {:?}, but expected {}", other, type_name::<E>()),
    }
}
