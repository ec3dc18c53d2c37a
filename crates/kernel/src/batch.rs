//! Per-query fan-out for batch operations.
//!
//! Queries never depend on each other, so with the `parallel` feature they
//! are spread over the rayon pool. Output order always matches input order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
pub(crate) fn map_each<I, T, F>(items: &[I], f: F) -> Vec<T>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> T + Sync + Send,
{
    items.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_each<I, T, F>(items: &[I], f: F) -> Vec<T>
where
    F: Fn(&I) -> T,
{
    items.iter().map(f).collect()
}
