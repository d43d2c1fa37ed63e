//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use wcommon::{CallId, MetadataMap, RunId};
//!
//! let run = RunId::from("run-1");
//! let call = CallId::new("call-1");
//! let mut metadata = MetadataMap::new();
//! metadata.insert("latency_ms".to_string(), 12.into());
//!
//! assert_eq!(run.as_str(), "run-1");
//! assert_eq!(call.to_string(), "call-1");
//! assert_eq!(metadata["latency_ms"], 12);
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use wcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Shared metadata and cross-crate identifier newtypes.
    //!
    //! ```rust
    //! use wcommon::{CallId, RunId};
    //!
    //! let run = RunId::new("run-42");
    //! let call = CallId::generate();
    //!
    //! assert_eq!(run.to_string(), "run-42");
    //! assert!(!call.as_str().is_empty());
    //! ```

    use std::fmt::{Display, Formatter};

    use serde::{Deserialize, Serialize};

    /// Free-form metadata attached to outcomes and usage records.
    pub type MetadataMap = serde_json::Map<String, serde_json::Value>;

    macro_rules! string_id {
        ($name:ident) => {
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
            #[serde(transparent)]
            pub struct $name(String);

            impl $name {
                pub fn new(value: impl Into<String>) -> Self {
                    Self(value.into())
                }

                pub fn as_str(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl Display for $name {
                fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<String> for $name {
                fn from(value: String) -> Self {
                    Self(value)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }
        };
    }

    string_id!(RunId);
    string_id!(CallId);

    impl CallId {
        /// Random v4 identifier for calls the model proposed without an id.
        pub fn generate() -> Self {
            Self(uuid::Uuid::new_v4().to_string())
        }
    }
}

pub mod registry {
    //! Name-ordered registry map wrapper used by the capability catalog.
    //!
    //! Iteration follows key order so rendered listings are deterministic.
    //!
    //! ```rust
    //! use wcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("beta".to_string(), 2_u32);
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert_eq!(registry.keys().cloned().collect::<Vec<_>>(), vec!["alpha", "beta"]);
    //! ```

    use std::borrow::Borrow;
    use std::collections::BTreeMap;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: BTreeMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Ord,
    {
        fn default() -> Self {
            Self {
                items: BTreeMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Ord,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.get(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Ord + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.keys()
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.values()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub mod clock {
    //! Monotonic time source used by expiring caches and rate windows.
    //!
    //! ```rust
    //! use std::time::Duration;
    //! use wcommon::{Clock, ManualClock};
    //!
    //! let clock = ManualClock::new();
    //! let start = clock.now();
    //! clock.advance(Duration::from_secs(5));
    //!
    //! assert_eq!(clock.now() - start, Duration::from_secs(5));
    //! ```

    use std::sync::{Mutex, PoisonError};
    use std::time::{Duration, Instant};

    pub trait Clock: Send + Sync {
        fn now(&self) -> Instant;
    }

    #[derive(Debug, Default, Clone, Copy)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> Instant {
            Instant::now()
        }
    }

    /// Clock that only moves when told to.
    #[derive(Debug)]
    pub struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        pub fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            *now += by;
        }
    }

    impl Default for ManualClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }
}

pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{CallId, MetadataMap, RunId};
pub use future::BoxFuture;
pub use registry::Registry;
