use anyhow::Result;
use apafa_core::{DataLoader, Fetcher};
use serde_json::Value;

/// Load one resource through the loader, honoring its retry policy
pub async fn run<F: Fetcher>(loader: &DataLoader<F>, name: &str, no_cache: bool) -> Result<Value> {
    let value = loader.load_with(name, !no_cache).await?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use apafa_core::{DirFetcher, LoaderConfig};
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("stats.json"), r#"{"socios_apafa": 5}"#).unwrap();
        let loader = DataLoader::new(DirFetcher::new(dir.path()), LoaderConfig::default());

        let value = run(&loader, "stats", false).await.unwrap();
        assert_eq!(value, json!({"socios_apafa": 5}));
        assert_eq!(loader.cache_len().await, 1);

        run(&loader, "stats", true).await.unwrap();
        assert_eq!(loader.cache_len().await, 1);
    }

    #[tokio::test]
    async fn test_fetch_unknown_resource_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoaderConfig {
            retries: 0,
            ..LoaderConfig::default()
        };
        let loader = DataLoader::new(DirFetcher::new(dir.path()), config);

        let err = run(&loader, "eventos", false).await.unwrap_err();
        assert!(err.to_string().contains("eventos"));
    }
}
