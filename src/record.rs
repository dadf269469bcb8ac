use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use tokio::io::AsyncWriteExt;

const HEADER: &str = "batch_index,address,tx_digest,timestamp\n";

/// Append-only CSV of confirmed-successful submissions. Audit trail only:
/// never read back for resume decisions. Single-writer usage assumed.
pub struct SuccessLog {
    path: PathBuf,
}

impl SuccessLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn append(
        &self,
        batch_index: usize,
        addresses: &[String],
        tx_digest: &str,
    ) -> eyre::Result<()> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut rows = String::new();
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            rows.push_str(HEADER);
        }
        for address in addresses {
            rows.push_str(&format!("{batch_index},{address},{tx_digest},{timestamp}\n"));
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(rows.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_header_once_and_one_row_per_address() {
        let dir = tempfile::tempdir().unwrap();
        let log = SuccessLog::new(dir.path().join("out.csv"));

        let first = vec!["0xaa".to_string(), "0xbb".to_string()];
        log.append(1, &first, "digest1").await.unwrap();

        let second = vec!["0xcc".to_string()];
        log.append(3, &second, "digest3").await.unwrap();

        let contents = tokio::fs::read_to_string(dir.path().join("out.csv"))
            .await
            .unwrap();
        let lines: Vec<&str> = contents.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], HEADER.trim_end());
        assert!(lines[1].starts_with("1,0xaa,digest1,"));
        assert!(lines[2].starts_with("1,0xbb,digest1,"));
        assert!(lines[3].starts_with("3,0xcc,digest3,"));
    }
}
