use std::path::Path;

use tokio::io::AsyncBufReadExt;

use crate::{
    constants::{ADDRESS_HEX_DIGITS, ADDRESS_PREFIX},
    error::Error,
};

pub async fn read_file_lines(path: impl AsRef<Path>) -> eyre::Result<Vec<String>> {
    let file = tokio::fs::read(path).await?;
    let mut lines = file.lines();

    let mut contents = vec![];
    while let Some(line) = lines.next_line().await? {
        contents.push(line);
    }

    Ok(contents)
}

/// Trims whitespace and strips surrounding quote characters. Idempotent.
pub fn clean_entry(raw: &str) -> String {
    raw.trim().trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// Lowercases and left-pads a `0x`-prefixed address to the canonical
/// 64-hex-digit form. Entries without the prefix are returned untouched
/// so the node can reject them at build time.
pub fn normalize_address(addr: &str) -> String {
    let Some(hex_part) = addr.strip_prefix(ADDRESS_PREFIX) else {
        return addr.to_string();
    };

    let hex_part = hex_part.to_ascii_lowercase();
    if hex_part.len() >= ADDRESS_HEX_DIGITS {
        return format!("{ADDRESS_PREFIX}{hex_part}");
    }

    format!(
        "{ADDRESS_PREFIX}{}{hex_part}",
        "0".repeat(ADDRESS_HEX_DIGITS - hex_part.len())
    )
}

/// Loads the recipient list from a one-address-per-line file. Blank lines
/// are dropped; a single header line is skipped iff the first non-blank
/// raw line does not start with the address prefix. The check runs before
/// trimming or quote-stripping, so a quoted or padded first address counts
/// as a header. No deduplication.
pub async fn load_address_list(path: impl AsRef<Path>) -> Result<Vec<String>, Error> {
    let path = path.as_ref();

    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let lines = read_file_lines(path)
        .await
        .map_err(|e| Error::configuration(format!("failed to read {}: {e}", path.display())))?;

    let mut entries: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| !l.trim().is_empty())
        .collect();

    if let Some(first) = entries.first() {
        if !first.starts_with(ADDRESS_PREFIX) {
            entries.remove(0);
        }
    }

    Ok(entries
        .iter()
        .map(|l| normalize_address(&clean_entry(l)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Write;

    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = load_address_list("does/not/exist.csv").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn header_line_is_skipped() {
        let file = write_file("address\n0xaa\n0xbb\n");
        let list = load_address_list(file.path()).await.unwrap();
        assert_eq!(list.len(), 2);
    }

    #[tokio::test]
    async fn no_header_means_nothing_is_skipped() {
        let file = write_file("0xaa\n0xbb\n0xcc\n");
        let list = load_address_list(file.path()).await.unwrap();
        assert_eq!(list.len(), 3);
    }

    #[tokio::test]
    async fn blank_lines_and_quotes_are_stripped() {
        let file = write_file("0xaa\n\n  '0xbb'  \n\n");
        let list = load_address_list(file.path()).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].starts_with("0x"));
        assert!(list[0].ends_with("aa"));
        assert!(list[1].ends_with("bb"));
    }

    #[tokio::test]
    async fn quoted_first_line_counts_as_header() {
        // The prefix check runs on the raw line, so a quoted first address
        // reads as a header and is dropped.
        let file = write_file("\"0xaa\"\n\"0xbb\"\n");
        let list = load_address_list(file.path()).await.unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].ends_with("bb"));
    }

    #[tokio::test]
    async fn padded_first_line_counts_as_header() {
        let file = write_file("  0xaa\n0xbb\n0xcc\n");
        let list = load_address_list(file.path()).await.unwrap();
        assert_eq!(list.len(), 2);
        assert!(list[0].ends_with("bb"));
    }

    #[test]
    fn cleaning_is_idempotent() {
        for raw in ["  \"0xAA\" ", "'0xbb'", "plain", "  spaced  "] {
            let once = clean_entry(raw);
            assert_eq!(clean_entry(&once), once);
        }
    }

    #[test]
    fn normalization_pads_and_lowercases() {
        let got = normalize_address("0xAA");
        assert_eq!(got.len(), 2 + ADDRESS_HEX_DIGITS);
        assert!(got.starts_with("0x00"));
        assert!(got.ends_with("aa"));
    }

    #[test]
    fn non_prefixed_entries_pass_through() {
        assert_eq!(normalize_address("not-an-address"), "not-an-address");
    }
}
