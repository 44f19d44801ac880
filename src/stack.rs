//! Stack safety for deep recursion.
//!
//! Parsing and evaluation both recurse once per nesting level. Wrapping the
//! recursive step in [`ensure_sufficient_stack`] grows the native stack on
//! demand, so deeply nested (but finite) programs run to completion and the
//! interpreter's own call-depth limit is what stops runaway recursion.

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
