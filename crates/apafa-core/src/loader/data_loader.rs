use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::{FetchError, Fetcher, HttpFetcher, LoadError, LoaderConfig};

/// Loads named JSON resources with bounded retries and a process-lifetime cache.
///
/// The cache never expires: once a resource has been loaded with caching
/// enabled, later cached loads of the same name are served without touching
/// the fetcher. Failed loads leave the cache untouched.
pub struct DataLoader<F = HttpFetcher> {
    fetcher: F,
    config: LoaderConfig,
    cache: RwLock<HashMap<String, Value>>,
}

impl DataLoader<HttpFetcher> {
    /// Loader fetching over HTTP from `config.origin`
    pub fn http(config: LoaderConfig) -> reqwest::Result<Self> {
        Ok(Self::new(HttpFetcher::new()?, config))
    }
}

impl<F: Fetcher> DataLoader<F> {
    pub fn new(fetcher: F, config: LoaderConfig) -> Self {
        Self {
            fetcher,
            config,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load a resource, serving it from the cache when present.
    pub async fn load(&self, name: &str) -> Result<Value, LoadError> {
        self.load_with(name, true).await
    }

    /// Load a resource. With `use_cache` false the cache is neither read nor
    /// written and every call goes to the fetcher.
    pub async fn load_with(&self, name: &str, use_cache: bool) -> Result<Value, LoadError> {
        if use_cache {
            if let Some(value) = self.cache.read().await.get(name) {
                debug!(resource = name, "Serving resource from cache");
                return Ok(value.clone());
            }
        }

        let url = self.config.resource_url(name);
        let max_attempts = self.config.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.attempt(name, &url).await {
                Ok(value) => {
                    if use_cache {
                        self.cache
                            .write()
                            .await
                            .insert(name.to_string(), value.clone());
                    }
                    return Ok(value);
                }
                Err(cause) => {
                    warn!(
                        resource = name,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        timed_out = cause.is_timeout(),
                        error = %cause,
                        "Load attempt failed"
                    );
                    if attempt >= max_attempts {
                        error!(resource = name, url = %url, error = %cause, "Giving up loading resource");
                        return Err(LoadError {
                            resource: name.to_string(),
                            cause,
                        });
                    }
                    tokio::time::sleep(self.config.backoff_after(attempt)).await;
                }
            }
        }
    }

    /// One fetch bounded by the configured timeout. Dropping the fetch future
    /// on timeout cancels the in-flight request.
    async fn attempt(&self, name: &str, url: &str) -> Result<Value, FetchError> {
        match tokio::time::timeout(self.config.timeout(), self.fetcher.fetch(name, url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.config.timeout_ms)),
        }
    }

    /// Load a resource and decode it into `T`.
    /// A value that does not fit `T` is reported as a parse failure; the raw
    /// value stays cached.
    pub async fn load_as<T: DeserializeOwned>(&self, name: &str) -> Result<T, LoadError> {
        let value = self.load(name).await?;
        serde_json::from_value(value).map_err(|e| LoadError {
            resource: name.to_string(),
            cause: FetchError::Parse(e.to_string()),
        })
    }

    /// Load and decode a resource, substituting `default` on any failure.
    pub async fn load_with_fallback<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.load_as(name).await {
            Ok(value) => value,
            Err(e) => {
                warn!(resource = name, error = %e.cause, "Using fallback data");
                default
            }
        }
    }

    /// Cached value for a resource, if any
    pub async fn cached(&self, name: &str) -> Option<Value> {
        self.cache.read().await.get(name).cloned()
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    enum Step {
        Respond(Value),
        Fail(FetchError),
        Hang,
    }

    /// Replays scripted outcomes and records when each attempt started.
    #[derive(Default)]
    struct ScriptedFetcher {
        steps: Mutex<VecDeque<Step>>,
        calls: Mutex<Vec<(String, Instant)>>,
    }

    impl ScriptedFetcher {
        fn new(steps: Vec<Step>) -> Self {
            Self {
                steps: Mutex::new(steps.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self::new(Vec::new())
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
        }
    }

    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, _name: &str, url: &str) -> Result<Value, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push((url.to_string(), Instant::now()));
            let step = self.steps.lock().unwrap().pop_front();
            match step {
                Some(Step::Respond(value)) => Ok(value),
                Some(Step::Fail(err)) => Err(err),
                Some(Step::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Value::Null)
                }
                None => Err(FetchError::Network("connection refused".to_string())),
            }
        }
    }

    fn server_error() -> Step {
        Step::Fail(FetchError::Status {
            status: 500,
            reason: "Internal Server Error".to_string(),
        })
    }

    fn loader(steps: Vec<Step>) -> DataLoader<ScriptedFetcher> {
        DataLoader::new(ScriptedFetcher::new(steps), LoaderConfig::default())
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_endpoint_exhausts_all_attempts() {
        let loader = DataLoader::new(ScriptedFetcher::failing(), LoaderConfig::default());

        let err = loader.load("stats").await.unwrap_err();
        assert_eq!(err.resource, "stats");
        assert!(matches!(err.cause, FetchError::Network(_)));
        assert_eq!(loader.fetcher().call_count(), 3);
        assert_eq!(loader.cache_len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_count_follows_retries() {
        let config = LoaderConfig {
            retries: 4,
            ..LoaderConfig::default()
        };
        let loader = DataLoader::new(ScriptedFetcher::failing(), config);

        assert!(loader.load("stats").await.is_err());
        assert_eq!(loader.fetcher().call_count(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_linear() {
        let loader = DataLoader::new(ScriptedFetcher::failing(), LoaderConfig::default());
        let _ = loader.load("stats").await;

        let times = loader.fetcher().call_times();
        assert_eq!(times.len(), 3);
        assert_eq!(times[1] - times[0], Duration::from_millis(1000));
        assert_eq!(times[2] - times[1], Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_two_server_errors() {
        let loader = loader(vec![server_error(), server_error(), Step::Respond(json!({"a": 1}))]);
        let start = Instant::now();

        let value = loader.load("x").await.unwrap();

        assert_eq!(value, json!({"a": 1}));
        assert_eq!(loader.fetcher().call_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(3000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_stops_retrying() {
        let loader = loader(vec![
            server_error(),
            Step::Respond(json!([1, 2])),
            Step::Respond(json!("unused")),
        ]);

        assert_eq!(loader.load_with("x", false).await.unwrap(), json!([1, 2]));
        assert_eq!(loader.fetcher().call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_failed_attempt() {
        let loader = loader(vec![Step::Hang, Step::Respond(json!({"ok": true}))]);
        let start = Instant::now();

        let value = loader.load("slow").await.unwrap();

        assert_eq!(value, json!({"ok": true}));
        // 5000 ms timeout, then 1000 ms backoff
        assert_eq!(start.elapsed(), Duration::from_millis(6000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reported_when_every_attempt_hangs() {
        let loader = loader(vec![Step::Hang, Step::Hang, Step::Hang]);

        let err = loader.load("slow").await.unwrap_err();
        assert_eq!(err.cause, FetchError::Timeout(5000));
    }

    #[tokio::test]
    async fn test_cached_load_fetches_once() {
        let loader = loader(vec![Step::Respond(json!({"n": 1})), Step::Respond(json!({"n": 2}))]);

        assert_eq!(loader.load("x").await.unwrap(), json!({"n": 1}));
        assert_eq!(loader.load("x").await.unwrap(), json!({"n": 1}));
        assert_eq!(loader.fetcher().call_count(), 1);
    }

    #[tokio::test]
    async fn test_uncached_load_always_fetches() {
        let loader = loader(vec![
            Step::Respond(json!({"n": 1})),
            Step::Respond(json!({"n": 2})),
            Step::Respond(json!({"n": 3})),
        ]);

        assert_eq!(loader.load("x").await.unwrap(), json!({"n": 1}));
        assert_eq!(loader.load_with("x", false).await.unwrap(), json!({"n": 2}));
        assert_eq!(loader.load_with("x", false).await.unwrap(), json!({"n": 3}));
        assert_eq!(loader.fetcher().call_count(), 3);
        // Uncached loads do not overwrite the cached value
        assert_eq!(loader.cached("x").await, Some(json!({"n": 1})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_leaves_cache_unchanged() {
        let loader = loader(vec![Step::Respond(json!({"n": 1}))]);
        loader.load("x").await.unwrap();

        assert!(loader.load_with("x", false).await.is_err());
        assert_eq!(loader.cached("x").await, Some(json!({"n": 1})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_returns_default_unchanged() {
        let loader = DataLoader::new(ScriptedFetcher::failing(), LoaderConfig::default());
        let default = json!({"conceptos": [], "nota": "placeholder"});

        let value = loader.load_with_fallback("conceptos_pago", default.clone()).await;
        assert_eq!(value, default);
    }

    #[tokio::test]
    async fn test_fallback_on_shape_mismatch() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Counts {
            verde: u32,
        }

        let loader = loader(vec![Step::Respond(json!({"verde": "many"}))]);
        let value = loader.load_with_fallback("stats", Counts { verde: 7 }).await;
        assert_eq!(value, Counts { verde: 7 });
        // The raw value is still cached
        assert!(loader.cached("stats").await.is_some());
    }

    #[tokio::test]
    async fn test_load_as_decodes() {
        #[derive(Debug, Deserialize)]
        struct Counts {
            verde: u32,
        }

        let loader = loader(vec![Step::Respond(json!({"verde": 5}))]);
        let counts: Counts = loader.load_as("stats").await.unwrap();
        assert_eq!(counts.verde, 5);
    }

    #[tokio::test]
    async fn test_requests_resolved_url() {
        let loader = loader(vec![Step::Respond(json!({}))]);
        loader.load("resumen_financiero").await.unwrap();

        let calls = loader.fetcher().calls.lock().unwrap().clone();
        assert_eq!(
            calls[0].0,
            "http://localhost:8000/apafa-web/data/resumen_financiero.json"
        );
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let loader = loader(vec![Step::Respond(json!(1)), Step::Respond(json!(2))]);
        loader.load("x").await.unwrap();
        loader.clear_cache().await;

        assert_eq!(loader.load("x").await.unwrap(), json!(2));
        assert_eq!(loader.fetcher().call_count(), 2);
    }
}
