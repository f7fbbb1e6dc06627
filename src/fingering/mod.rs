pub mod assignment;
pub mod filter;
pub mod search;

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, OnceLock};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use crate::cache::LruCache;
use crate::config::EngineConfig;
use crate::pitch::PitchClass;
use crate::tuning::{TuningEntry, standard_guitar};

pub use assignment::{FretAssignment, ParseAssignmentError, StringFret};
pub use filter::is_playable;
pub use search::{FretWindow, MIN_MAX_FRET, generate_candidates_for_span, sweep_windows};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Cache counters, for reporting and for checking that repeat queries
/// don't search again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
}

struct CacheState {
    lru: LruCache<String, Vec<FretAssignment>>,
    hits: u64,
    misses: u64,
}

/// Triads computed by `prewarm`: C, D, E, F, G, A major and A, D, E minor.
const PREWARM_TRIADS: [[PitchClass; 3]; 9] = [
    [PitchClass::C, PitchClass::E, PitchClass::G],
    [PitchClass::D, PitchClass::FSharp, PitchClass::A],
    [PitchClass::E, PitchClass::GSharp, PitchClass::B],
    [PitchClass::F, PitchClass::A, PitchClass::C],
    [PitchClass::G, PitchClass::B, PitchClass::D],
    [PitchClass::A, PitchClass::CSharp, PitchClass::E],
    [PitchClass::A, PitchClass::C, PitchClass::E],
    [PitchClass::D, PitchClass::F, PitchClass::A],
    [PitchClass::E, PitchClass::G, PitchClass::B],
];

/// Chord → fingering search with a shared LRU cache in front.
///
/// Window searches run on a rayon pool; the cache lock is only held for
/// lookups and inserts, never across a search.
pub struct FingeringEngine {
    config: EngineConfig,
    pool: Option<rayon::ThreadPool>,
    cache: Mutex<CacheState>,
}

impl FingeringEngine {
    /// Build an engine. `workers > 0` gets a dedicated pool of that size;
    /// 0 shares rayon's global pool.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        if config.max_fret < MIN_MAX_FRET {
            log::warn!(
                "max_fret {} is below {}; no fret windows will be searched",
                config.max_fret,
                MIN_MAX_FRET
            );
        }
        let pool = if config.workers > 0 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.workers)
                    .build()?,
            )
        } else {
            None
        };
        Ok(Self::with_pool(config, pool))
    }

    fn with_pool(config: EngineConfig, pool: Option<rayon::ThreadPool>) -> Self {
        Self {
            cache: Mutex::new(CacheState {
                lru: LruCache::new(config.cache_capacity),
                hits: 0,
                misses: 0,
            }),
            config,
            pool,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Ranked fingerings for `chord` (first note = bass) on `tuning`.
    ///
    /// Returns at most `max_results` voicings in first-found order, lowest
    /// window first. Empty chords or tunings return nothing and skip the
    /// cache entirely.
    pub fn compute_fingerings(&self, chord: &[PitchClass], tuning: &[TuningEntry]) -> Vec<FretAssignment> {
        if chord.is_empty() || tuning.is_empty() {
            return Vec::new();
        }

        let key = cache_key(chord, tuning);
        {
            let mut state = self.lock();
            if let Some(found) = state.lru.get(key.as_str()).cloned() {
                state.hits += 1;
                log::debug!("Fingering cache hit: {key}");
                return found;
            }
        }

        let fingerings = self.search(chord, tuning);
        log::debug!("Fingering cache miss: {key} ({} found)", fingerings.len());

        let mut state = self.lock();
        state.misses += 1;
        if let Some(evicted) = state.lru.insert(key, fingerings.clone()) {
            log::trace!("Evicted {evicted}");
        }
        fingerings
    }

    /// Run the full window sweep without consulting the cache.
    pub fn search(&self, chord: &[PitchClass], tuning: &[TuningEntry]) -> Vec<FretAssignment> {
        let windows = sweep_windows(self.config.max_fret);

        let per_window: Vec<Vec<FretAssignment>> = match &self.pool {
            Some(pool) => pool.install(|| search_windows(&windows, chord, tuning)),
            None => search_windows(&windows, chord, tuning),
        };

        merge_ranked(per_window, self.config.max_results)
    }

    /// Populate the cache with common triads on standard guitar.
    /// Returns the cache size afterwards.
    pub fn prewarm(&self) -> usize {
        let tuning = standard_guitar();
        for triad in &PREWARM_TRIADS {
            self.compute_fingerings(triad, &tuning);
        }
        let size = self.lock().lru.len();
        log::info!("Prewarmed fingering cache ({size} entries)");
        size
    }

    /// Chords used by `prewarm`, in order.
    pub fn prewarm_chords() -> &'static [[PitchClass; 3]] {
        &PREWARM_TRIADS
    }

    pub fn is_cached(&self, chord: &[PitchClass], tuning: &[TuningEntry]) -> bool {
        self.lock().lru.contains(cache_key(chord, tuning).as_str())
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            hits: state.hits,
            misses: state.misses,
            size: state.lru.len(),
            capacity: state.lru.capacity(),
        }
    }

    /// Cache keys from least to most recently used.
    pub fn cached_keys(&self) -> Vec<String> {
        self.lock().lru.keys_by_recency().cloned().collect()
    }

    pub fn clear_cache(&self) {
        let mut state = self.lock();
        state.lru.clear();
        state.hits = 0;
        state.misses = 0;
    }

    // Entries are written whole, so a poisoned lock still guards a usable cache
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Search and filter every window. `collect` keeps window order.
fn search_windows(
    windows: &[FretWindow],
    chord: &[PitchClass],
    tuning: &[TuningEntry],
) -> Vec<Vec<FretAssignment>> {
    windows
        .par_iter()
        .map(|w| {
            generate_candidates_for_span(chord, tuning, w.min_fret, w.max_fret)
                .into_iter()
                .filter(|a| is_playable(a, tuning, chord))
                .collect()
        })
        .collect()
}

/// Concatenate per-window results, keep the first occurrence of each
/// voicing, and cut to `limit`.
fn merge_ranked(per_window: Vec<Vec<FretAssignment>>, limit: usize) -> Vec<FretAssignment> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for a in per_window.into_iter().flatten() {
        if out.len() >= limit {
            break;
        }
        if seen.insert(a.to_string()) {
            out.push(a);
        }
    }
    out
}

/// Canonical cache key: sorted chord classes, then the tuning in string order,
/// e.g. `C,E,G|E2,A2,D3,G3,B3,E4`. Chord order doesn't affect the key.
pub fn cache_key(chord: &[PitchClass], tuning: &[TuningEntry]) -> String {
    let mut notes = chord.to_vec();
    notes.sort();
    let notes: Vec<&str> = notes.iter().map(|n| n.name()).collect();
    let strings: Vec<String> = tuning.iter().map(|e| e.to_string()).collect();
    format!("{}|{}", notes.join(","), strings.join(","))
}

static ENGINE: OnceLock<FingeringEngine> = OnceLock::new();

/// Install the process-wide engine. Later calls keep the first engine.
pub fn init(config: EngineConfig) -> Result<&'static FingeringEngine, EngineError> {
    if let Some(engine) = ENGINE.get() {
        return Ok(engine);
    }
    let engine = FingeringEngine::new(config)?;
    Ok(ENGINE.get_or_init(|| engine))
}

/// The process-wide engine; created with default settings on the global
/// rayon pool if `init` wasn't called first.
pub fn engine() -> &'static FingeringEngine {
    ENGINE.get_or_init(|| FingeringEngine::with_pool(EngineConfig::default(), None))
}

/// `compute_fingerings` on the process-wide engine.
pub fn compute_fingerings(chord: &[PitchClass], tuning: &[TuningEntry]) -> Vec<FretAssignment> {
    engine().compute_fingerings(chord, tuning)
}
