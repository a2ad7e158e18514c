use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;

use dream_core::BackendError;

/// Cache key of the form `[entityName, ...idParams]`,
/// e.g. `["transportOption", "7"]` or `["myBookings", <principal>]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    /// Segment-wise prefix match; `["transportOption"]` does not match a
    /// `["transportOptions", ...]` key.
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.0.len() && prefix.iter().zip(self.0.iter()).all(|(p, s)| p == s)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}

enum Slot {
    Ready { value: Value, stale: bool },
    Pending(broadcast::Sender<Result<Value, BackendError>>),
}

/// Keyed read cache shared by every page of the site.
///
/// Each key's value is fetched at most once at a time: concurrent readers of
/// the same key await the in-flight fetch instead of issuing their own
/// backend call. There is no TTL and no eviction; entries only go stale
/// through [`QueryCache::invalidate_prefix`], which forces a refetch on the
/// next read. Failed fetches are never cached.
pub struct QueryCache {
    slots: Mutex<HashMap<QueryKey, Slot>>,
}

enum Claim {
    Hit(Value),
    Follow(broadcast::Receiver<Result<Value, BackendError>>),
    Lead(broadcast::Sender<Result<Value, BackendError>>),
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, or run `fetch` to populate it.
    ///
    /// `fetch` may be invoked more than once across retries of this call but
    /// at most one fetch per key is ever in flight.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, BackendError>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, BackendError>>,
    {
        loop {
            let claim = {
                let mut slots = self.slots.lock().unwrap();
                match slots.get(&key) {
                    Some(Slot::Ready { value, stale: false }) => Claim::Hit(value.clone()),
                    Some(Slot::Pending(tx)) => Claim::Follow(tx.subscribe()),
                    _ => {
                        // Absent or stale: this caller becomes the fetcher.
                        let (tx, _) = broadcast::channel(4);
                        slots.insert(key.clone(), Slot::Pending(tx.clone()));
                        Claim::Lead(tx)
                    }
                }
            };

            match claim {
                Claim::Hit(value) => return decode(value),
                Claim::Follow(mut rx) => match rx.recv().await {
                    Ok(Ok(value)) => return decode(value),
                    Ok(Err(err)) => return Err(err),
                    // The fetcher was dropped without resolving; try again.
                    Err(_) => continue,
                },
                Claim::Lead(tx) => {
                    let result = fetch().await;
                    let mut slots = self.slots.lock().unwrap();
                    match &result {
                        Ok(value) => {
                            let encoded = serde_json::to_value(value).map_err(|e| {
                                slots.remove(&key);
                                BackendError::Other(format!("cache encode failed: {e}"))
                            })?;
                            slots.insert(
                                key.clone(),
                                Slot::Ready {
                                    value: encoded.clone(),
                                    stale: false,
                                },
                            );
                            let _ = tx.send(Ok(encoded));
                        }
                        Err(err) => {
                            tracing::debug!(key = %key, error = %err, "query fetch failed");
                            slots.remove(&key);
                            let _ = tx.send(Err(err.clone()));
                        }
                    }
                    return result;
                }
            }
        }
    }

    /// Mark every cached entry whose key starts with `prefix` stale. Returns
    /// the number of entries affected. In-flight fetches are left alone.
    pub fn invalidate_prefix(&self, prefix: &[&str]) -> usize {
        let mut slots = self.slots.lock().unwrap();
        let mut count = 0;
        for (key, slot) in slots.iter_mut() {
            if !key.starts_with(prefix) {
                continue;
            }
            if let Slot::Ready { stale, .. } = slot {
                if !*stale {
                    *stale = true;
                    count += 1;
                }
            }
        }
        if count > 0 {
            tracing::debug!(prefix = ?prefix, count, "invalidated cache entries");
        }
        count
    }

    /// Staleness of a cached entry; `None` when the key has never resolved.
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        let slots = self.slots.lock().unwrap();
        match slots.get(key) {
            Some(Slot::Ready { stale, .. }) => Some(*stale),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, BackendError> {
    serde_json::from_value(value).map_err(|e| BackendError::Other(format!("cache decode failed: {e}")))
}
