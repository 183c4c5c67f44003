//! Location resolution with caching, bounded retry, and graceful degradation.
//!
//! Resolution never fails: the `(0,0)` sentinel short-circuits to
//! [`sky_common::LocationSource::NoSignal`], provider failures degrade to a formatted
//! coordinate string, and results are cached per ~111 m grid cell
//! (coordinates rounded to three decimals) for the life of the resolver.

pub mod nominatim;
pub mod provider;

pub use nominatim::NominatimGeocoder;
pub use provider::{Address, DisabledGeocoder, GeocodeError, ReverseGeocoder};

use serde::Serialize;
use sky_common::{GeoPoint, ResolvedLocation};
use sky_config::GeocoderConfig;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Cache key: coordinates rounded to three decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    lat_milli: i64,
    lon_milli: i64,
}

impl GridKey {
    pub fn of(point: GeoPoint) -> Self {
        Self {
            lat_milli: (point.lat * 1000.0).round() as i64,
            lon_milli: (point.lon * 1000.0).round() as i64,
        }
    }
}

/// Counters describing resolver activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    pub lookups: u64,
    pub no_signal: u64,
    pub cache_hits: u64,
    pub provider_calls: u64,
    pub provider_failures: u64,
    pub skipped_in_cooldown: u64,
}

/// Retry and circuit-breaker policy.
#[derive(Debug, Clone, Copy)]
pub struct ResolverPolicy {
    pub max_attempts: u32,
    pub failure_threshold: u32,
    pub cooldown: Duration,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self::from(&GeocoderConfig::default())
    }
}

impl From<&GeocoderConfig> for ResolverPolicy {
    fn from(config: &GeocoderConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            failure_threshold: config.failure_threshold.max(1),
            cooldown: config.cooldown(),
        }
    }
}

#[derive(Debug, Default)]
struct Breaker {
    consecutive_failures: u32,
    open_until: Option<Instant>,
}

#[derive(Debug, Default)]
struct ResolverState {
    cache: HashMap<GridKey, ResolvedLocation>,
    breaker: Breaker,
    stats: ResolverStats,
}

/// Coordinate → place name resolver.
pub struct LocationResolver {
    provider: Box<dyn ReverseGeocoder>,
    policy: ResolverPolicy,
    state: Mutex<ResolverState>,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("provider", &self.provider.name())
            .field("policy", &self.policy)
            .finish()
    }
}

impl LocationResolver {
    pub fn new(provider: Box<dyn ReverseGeocoder>, policy: ResolverPolicy) -> Self {
        Self {
            provider,
            policy,
            state: Mutex::new(ResolverState::default()),
        }
    }

    /// Build the configured provider: Nominatim when enabled, otherwise offline.
    pub fn from_config(config: &GeocoderConfig) -> Self {
        let provider: Box<dyn ReverseGeocoder> = if config.enabled {
            Box::new(NominatimGeocoder::from_config(config))
        } else {
            Box::new(DisabledGeocoder)
        };
        info!(provider = provider.name(), "location resolver ready");
        Self::new(provider, ResolverPolicy::from(config))
    }

    /// Offline resolver: every fix resolves to its coordinate string.
    pub fn offline() -> Self {
        Self::new(Box::new(DisabledGeocoder), ResolverPolicy::default())
    }

    /// Resolve a coordinate. Never fails and never blocks past the
    /// provider's per-attempt timeout times `max_attempts`.
    pub fn resolve(&self, point: GeoPoint) -> ResolvedLocation {
        {
            let mut state = self.lock();
            state.stats.lookups += 1;
            if !point.has_fix() {
                state.stats.no_signal += 1;
                return ResolvedLocation::no_signal();
            }
            if let Some(hit) = state.cache.get(&GridKey::of(point)) {
                let hit = hit.clone();
                state.stats.cache_hits += 1;
                return hit;
            }
            if let Some(until) = state.breaker.open_until {
                if Instant::now() < until {
                    state.stats.skipped_in_cooldown += 1;
                    debug!(%point, "geocoder in cooldown, using coordinates");
                    return ResolvedLocation::coordinate_fallback(point);
                }
                state.breaker.open_until = None;
            }
        }

        // The provider is called without holding the lock.
        let outcome = self.lookup_with_retry(point);

        let mut state = self.lock();
        let resolved = match outcome {
            Ok(name) => {
                state.breaker.consecutive_failures = 0;
                ResolvedLocation::geocoded(name)
            }
            Err(GeocodeError::Disabled) => {
                debug!(%point, "geocoding disabled, using coordinates");
                ResolvedLocation::coordinate_fallback(point)
            }
            Err(err) => {
                state.stats.provider_failures += 1;
                state.breaker.consecutive_failures += 1;
                if state.breaker.consecutive_failures >= self.policy.failure_threshold {
                    state.breaker.consecutive_failures = 0;
                    state.breaker.open_until = Some(Instant::now() + self.policy.cooldown);
                    warn!(
                        provider = self.provider.name(),
                        cooldown_secs = self.policy.cooldown.as_secs(),
                        "geocoder failing repeatedly, pausing lookups"
                    );
                }
                warn!(%point, error = %err, "geocoding failed, using coordinates");
                ResolvedLocation::coordinate_fallback(point)
            }
        };
        // First answer stored for a cell wins over a concurrent lookup's.
        state
            .cache
            .entry(GridKey::of(point))
            .or_insert(resolved)
            .clone()
    }

    fn lookup_with_retry(&self, point: GeoPoint) -> Result<String, GeocodeError> {
        let mut last_err = GeocodeError::NoAddress;
        for attempt in 1..=self.policy.max_attempts {
            self.lock().stats.provider_calls += 1;
            match self.provider.reverse(point) {
                Ok(address) => match address.display_name() {
                    Some(name) => {
                        debug!(%point, attempt, name = %name, "geocoded");
                        return Ok(name);
                    }
                    None => last_err = GeocodeError::NoAddress,
                },
                Err(GeocodeError::Disabled) => return Err(GeocodeError::Disabled),
                Err(err) => {
                    debug!(%point, attempt, error = %err, "geocode attempt failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }

    /// Cached entry for the grid cell containing `point`, if any.
    pub fn cached(&self, point: GeoPoint) -> Option<ResolvedLocation> {
        self.lock().cache.get(&GridKey::of(point)).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.lock().cache.len()
    }

    pub fn stats(&self) -> ResolverStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, ResolverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_common::LocationSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    /// Provider that fails a scripted number of times before succeeding.
    struct Scripted {
        calls: Arc<AtomicUsize>,
        failures_before_success: usize,
    }

    impl ReverseGeocoder for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn reverse(&self, _point: GeoPoint) -> Result<Address, GeocodeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures_before_success {
                return Err(GeocodeError::Transport("connection refused".into()));
            }
            Ok(Address {
                suburb: Some("Indiranagar".into()),
                city: Some("Bengaluru".into()),
                ..Address::default()
            })
        }
    }

    fn resolver(failures: usize, policy: ResolverPolicy) -> (LocationResolver, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Scripted {
            calls: Arc::clone(&calls),
            failures_before_success: failures,
        };
        (LocationResolver::new(Box::new(provider), policy), calls)
    }

    fn policy(max_attempts: u32, failure_threshold: u32, cooldown_secs: u64) -> ResolverPolicy {
        ResolverPolicy {
            max_attempts,
            failure_threshold,
            cooldown: Duration::from_secs(cooldown_secs),
        }
    }

    #[test]
    fn sentinel_never_calls_provider() {
        let (r, calls) = resolver(0, ResolverPolicy::default());
        for _ in 0..100 {
            let loc = r.resolve(GeoPoint::NO_FIX);
            assert_eq!(loc.source, LocationSource::NoSignal);
        }
        assert_eq!(r.resolve(GeoPoint::new(0.0, 77.6)).source, LocationSource::NoSignal);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(r.cache_len(), 0);
        assert_eq!(r.stats().no_signal, 101);
    }

    #[test]
    fn geocoded_result_is_cached_per_grid_cell() {
        let (r, calls) = resolver(0, ResolverPolicy::default());
        let first = r.resolve(GeoPoint::new(12.97841, 77.64082));
        assert_eq!(first.display_name, "Indiranagar, Bengaluru");
        assert_eq!(first.source, LocationSource::Geocoded);

        // Same ~111 m cell.
        let second = r.resolve(GeoPoint::new(12.97849, 77.64071));
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(r.stats().cache_hits, 1);
    }

    #[test]
    fn retries_within_attempt_budget() {
        let (r, calls) = resolver(1, policy(2, 3, 60));
        let loc = r.resolve(GeoPoint::new(12.97, 77.59));
        assert_eq!(loc.source, LocationSource::Geocoded);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn exhausted_retries_cache_coordinate_fallback() {
        let (r, calls) = resolver(usize::MAX, policy(2, 10, 60));
        let point = GeoPoint::new(12.971598, 77.594566);
        let loc = r.resolve(point);
        assert_eq!(loc.source, LocationSource::CoordinateFallback);
        assert_eq!(loc.display_name, "12.9716, 77.5946");
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Cached: no further provider calls for this cell.
        assert_eq!(r.resolve(point), loc);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn breaker_skips_provider_during_cooldown() {
        let (r, calls) = resolver(usize::MAX, policy(1, 2, 3600));
        r.resolve(GeoPoint::new(10.0, 10.0));
        r.resolve(GeoPoint::new(11.0, 11.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let skipped = GeoPoint::new(12.0, 12.0);
        let loc = r.resolve(skipped);
        assert_eq!(loc.source, LocationSource::CoordinateFallback);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(r.stats().skipped_in_cooldown, 1);
        // Cooldown fallbacks are not cached.
        assert!(r.cached(skipped).is_none());
    }

    #[test]
    fn breaker_closes_after_cooldown() {
        let (r, calls) = resolver(2, policy(1, 2, 0));
        r.resolve(GeoPoint::new(10.0, 10.0));
        r.resolve(GeoPoint::new(11.0, 11.0));
        let loc = r.resolve(GeoPoint::new(12.0, 12.0));
        assert_eq!(loc.source, LocationSource::Geocoded);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn offline_resolver_degrades_without_retry() {
        let r = LocationResolver::offline();
        let loc = r.resolve(GeoPoint::new(48.8584, 2.2945));
        assert_eq!(loc.source, LocationSource::CoordinateFallback);
        assert_eq!(r.stats().provider_calls, 1);
    }

    #[test]
    fn offline_resolver_never_opens_breaker() {
        let r = LocationResolver::offline();
        for i in 0..10 {
            let loc = r.resolve(GeoPoint::new(40.0 + f64::from(i), 2.0));
            assert_eq!(loc.source, LocationSource::CoordinateFallback);
        }
        let stats = r.stats();
        assert_eq!(stats.provider_calls, 10);
        assert_eq!(stats.provider_failures, 0);
        assert_eq!(stats.skipped_in_cooldown, 0);
        assert_eq!(r.cache_len(), 10);
    }

    /// Provider that holds every caller at a barrier, then names the place
    /// after its call order.
    struct Rendezvous {
        barrier: Arc<Barrier>,
        calls: AtomicUsize,
    }

    impl ReverseGeocoder for Rendezvous {
        fn name(&self) -> &str {
            "rendezvous"
        }

        fn reverse(&self, _point: GeoPoint) -> Result<Address, GeocodeError> {
            self.barrier.wait();
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Address {
                suburb: Some(format!("Block {n}")),
                city: Some("Bengaluru".into()),
                ..Address::default()
            })
        }
    }

    #[test]
    fn concurrent_lookups_of_one_cell_agree() {
        let provider = Rendezvous {
            barrier: Arc::new(Barrier::new(2)),
            calls: AtomicUsize::new(0),
        };
        let r = LocationResolver::new(Box::new(provider), policy(1, 3, 60));
        let point = GeoPoint::new(12.9716, 77.5946);

        let (a, b) = std::thread::scope(|scope| {
            let a = scope.spawn(|| r.resolve(point));
            let b = scope.spawn(|| r.resolve(point));
            (a.join().expect("thread a"), b.join().expect("thread b"))
        });

        assert_eq!(r.stats().provider_calls, 2);
        assert_eq!(a, b);
        assert_eq!(r.cached(point), Some(a.clone()));
        assert_eq!(r.resolve(point), a);
        assert_eq!(r.cache_len(), 1);
    }

    #[test]
    fn grid_key_rounds_to_three_decimals() {
        assert_eq!(
            GridKey::of(GeoPoint::new(12.9712, 77.5946)),
            GridKey::of(GeoPoint::new(12.9708, 77.5954))
        );
        assert_ne!(
            GridKey::of(GeoPoint::new(12.9712, 77.5946)),
            GridKey::of(GeoPoint::new(12.9722, 77.5946))
        );
    }
}
