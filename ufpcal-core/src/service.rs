//! Cached calendar lookups.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::TimedCache;
use crate::clock::{Clock, SystemClock};
use crate::error::CalendarResult;
use crate::event::EventSet;
use crate::upstream::FetchCalendar;

/// Portal calendars change a few times a year, so entries live long.
pub const CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);
/// How often expired entries are swept out regardless of traffic.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub type CalendarCache<C = SystemClock> = TimedCache<String, EventSet, C>;

/// Serves calendars from the cache, falling back to the fetcher on a miss.
///
/// Concurrent misses for the same ID each hit the fetcher; the last one to
/// finish wins the cache slot.
#[derive(Debug)]
pub struct CalendarService<F, C = SystemClock> {
    fetcher: F,
    cache: Arc<CalendarCache<C>>,
    ttl: Duration,
}

impl<F: FetchCalendar> CalendarService<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_cache(fetcher, Arc::new(TimedCache::new()), CACHE_TTL)
    }
}

impl<F, C> CalendarService<F, C>
where
    F: FetchCalendar,
    C: Clock,
{
    pub fn with_cache(fetcher: F, cache: Arc<CalendarCache<C>>, ttl: Duration) -> Self {
        Self {
            fetcher,
            cache,
            ttl,
        }
    }

    pub fn cache(&self) -> &Arc<CalendarCache<C>> {
        &self.cache
    }

    /// Return the events of `calendar_id`, fetching them if not cached.
    ///
    /// Fetch errors are returned unchanged and leave the cache untouched.
    pub async fn get_calendar(&self, calendar_id: &str) -> CalendarResult<EventSet> {
        if let Some(events) = self.cache.get(calendar_id) {
            info!(calendar_id, "found events in cache");
            return Ok(events);
        }

        let events: EventSet = self.fetcher.fetch(calendar_id).await?.into();

        debug!(calendar_id, count = events.len(), "storing events in cache");
        self.cache
            .set(calendar_id.to_string(), Arc::clone(&events), self.ttl);

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::clock::ManualClock;
    use crate::error::CalendarError;
    use crate::event::Event;
    use crate::upstream::parse_events;

    /// Fetcher that serves a canned body and counts calls.
    struct FakeFetcher {
        body: &'static str,
        status: u16,
        calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn ok(body: &'static str) -> Self {
            Self {
                body,
                status: 200,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                body: "",
                status,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FetchCalendar for FakeFetcher {
        async fn fetch(&self, _calendar_id: &str) -> CalendarResult<Vec<Event>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if self.status != 200 {
                return Err(CalendarError::UpstreamStatus(self.status));
            }
            parse_events(self.body.as_bytes())
        }
    }

    const EXAM: &str =
        r#"[{"id":1,"start":"2024-01-10T09:00","end":"2024-01-10T11:00","title":"Exam"}]"#;

    fn service(
        fetcher: FakeFetcher,
    ) -> (Arc<ManualClock>, CalendarService<FakeFetcher, Arc<ManualClock>>) {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(TimedCache::with_clock(Arc::clone(&clock)));
        (clock, CalendarService::with_cache(fetcher, cache, CACHE_TTL))
    }

    #[tokio::test]
    async fn test_miss_fetches_and_converts() {
        let (_, service) = service(FakeFetcher::ok(EXAM));

        let events = service.get_calendar("42").await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, 1);
        assert_eq!(events[0].start, Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
        assert_eq!(events[0].end, Utc.with_ymd_and_hms(2024, 1, 10, 11, 0, 0).unwrap());
        assert_eq!(events[0].title, "Exam");
        assert_eq!(service.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_cached_entry_skips_fetcher() {
        let (_, service) = service(FakeFetcher::ok(EXAM));
        let preloaded: EventSet = parse_events(EXAM.as_bytes()).unwrap().into();
        service
            .cache()
            .set("42".to_string(), Arc::clone(&preloaded), CACHE_TTL);

        for _ in 0..3 {
            let events = service.get_calendar("42").await.unwrap();
            assert!(Arc::ptr_eq(&events, &preloaded));
        }

        assert_eq!(service.fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_identical() {
        let (clock, service) = service(FakeFetcher::ok(EXAM));

        let first = service.get_calendar("42").await.unwrap();
        clock.advance(CACHE_TTL - Duration::from_secs(1));
        let second = service.get_calendar("42").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.fetcher.calls(), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_triggers_exactly_one_fetch() {
        let (clock, service) = service(FakeFetcher::ok(EXAM));

        service.get_calendar("42").await.unwrap();
        clock.advance(CACHE_TTL);
        service.get_calendar("42").await.unwrap();
        service.get_calendar("42").await.unwrap();

        assert_eq!(service.fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_calendars_are_cached_per_id() {
        let (_, service) = service(FakeFetcher::ok(EXAM));

        service.get_calendar("1").await.unwrap();
        service.get_calendar("2").await.unwrap();
        service.get_calendar("1").await.unwrap();

        assert_eq!(service.fetcher.calls(), 2);
        assert_eq!(service.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_upstream_status_is_propagated_and_not_cached() {
        let (_, service) = service(FakeFetcher::failing(503));

        let err = service.get_calendar("42").await.unwrap_err();

        assert!(matches!(err, CalendarError::UpstreamStatus(503)), "got {err:?}");
        assert!(service.cache().is_empty());

        // No negative caching: the next request tries again
        service.get_calendar("42").await.unwrap_err();
        assert_eq!(service.fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_bad_date_is_not_cached() {
        let (_, service) = service(FakeFetcher::ok(
            r#"[{"id":1,"start":"not-a-date","end":"2024-01-10T11:00","title":"Exam"}]"#,
        ));

        let err = service.get_calendar("42").await.unwrap_err();

        assert!(
            matches!(err, CalendarError::TimeParse { index: 0, field: "start", .. }),
            "got {err:?}"
        );
        assert!(service.cache().get("42").is_none());
        assert!(service.cache().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_are_safe() {
        let (_, service) = service(FakeFetcher::ok(EXAM));
        let service = Arc::new(service);

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.get_calendar("42").await })
            })
            .collect();
        for task in tasks {
            let events = task.await.unwrap().unwrap();
            assert_eq!(events[0].title, "Exam");
        }

        let calls = service.fetcher.calls();
        assert!((1..=16).contains(&calls), "calls = {calls}");
        assert_eq!(service.cache().len(), 1);
    }
}
