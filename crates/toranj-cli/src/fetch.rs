//! Result log retrieval from files or URLs

use anyhow::{Context, Result};
use tracing::debug;

/// True when `source` should be fetched over HTTP
pub fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Read a result log from a path or an `http(s)://` URL
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
pub async fn read_log(source: &str) -> Result<String> {
    let bytes = if is_url(source) {
        debug!("Fetching results from {}", source);
        let response = reqwest::get(source)
            .await
            .with_context(|| format!("Failed to fetch {}", source))?
            .error_for_status()
            .with_context(|| format!("Server refused {}", source))?;
        response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {}", source))?
            .to_vec()
    } else {
        debug!("Reading results from {}", source);
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read results file: {}", source))?
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn recognises_urls() {
        assert!(is_url("https://example.org/results.txt"));
        assert!(is_url("http://localhost:8000/a"));
        assert!(!is_url("results/http.txt"));
        assert!(!is_url("ftp://example.org/a"));
    }

    #[tokio::test]
    async fn reads_files_lossily() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, b"heat_cpp,1,10,1.0,0\n\xff\n").unwrap();

        let text = read_log(path.to_str().unwrap()).await.unwrap();

        assert!(text.starts_with("heat_cpp,1,10,1.0,0\n"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = read_log("/definitely/not/here.txt").await.unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
