//! The home-feed cache: one process-wide slot keyed by nothing. Every
//! viewer and every page number observes the same artifact while the slot
//! is warm; expiry is evaluated lazily on the next read. Only the global
//! feed view participates.

use crate::settings::Settings;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CachedFeed {
  body: String,
  stored_at: Instant,
}

lazy_static! {
  static ref HOME_FEED: Mutex<Option<CachedFeed>> = Mutex::new(None);
}

pub fn get() -> Option<String> {
  read(Duration::from_secs(Settings::get().cache_ttl_secs))
}

pub(crate) fn read(ttl: Duration) -> Option<String> {
  let mut slot = HOME_FEED.lock().unwrap();
  match slot.as_ref() {
    Some(cached) if cached.stored_at.elapsed() < ttl => Some(cached.body.to_owned()),
    Some(_) => {
      // ttl elapsed, evict now rather than on a timer
      *slot = None;
      None
    }
    None => None,
  }
}

/// Last writer wins; the TTL restarts from this write.
pub fn put(body: String) {
  let mut slot = HOME_FEED.lock().unwrap();
  *slot = Some(CachedFeed {
    body,
    stored_at: Instant::now(),
  });
}

/// Manual invalidation, regardless of TTL.
pub fn clear() {
  *HOME_FEED.lock().unwrap() = None;
}
