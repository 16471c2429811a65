//! Independent replicas of one scenario.
//!
//! A simulator is single-threaded by construction.  To use more cores, run
//! the whole scenario several times with different seeds; each replica
//! builds and owns its own `Simulator`, so nothing is shared between them.

use vs_core::SimRng;

/// Derive `count` replica seeds from a master seed.
///
/// The same master seed always yields the same list.
pub fn replica_seeds(master: u64, count: usize) -> Vec<u64> {
    let mut rng = SimRng::new(master);
    (0..count as u64).map(|i| rng.child(i).random()).collect()
}

/// Run `scenario` once per seed and collect the results in seed order.
///
/// With the `parallel` feature the replicas run on Rayon's thread pool;
/// results are identical either way.
pub fn run_replicas<R, F>(seeds: &[u64], scenario: F) -> Vec<R>
where
    F: Fn(u64) -> R + Sync + Send,
    R: Send,
{
    #[cfg(not(feature = "parallel"))]
    {
        seeds.iter().map(|&seed| scenario(seed)).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        seeds.par_iter().map(|&seed| scenario(seed)).collect()
    }
}
