//! Dataset discovery and loading.
//!
//! A dataset is a JSON array of records. It can be given as a single
//! file, or as a directory holding one `<page-slug>.json` per page.

use crate::error::LoadError;
use crate::models::Record;
use crate::pages::Page;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A dataset file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFile {
    pub page: Page,
    pub path: PathBuf,
}

/// Locates and reads page datasets.
pub struct DatasetLoader {
    root: PathBuf,
    max_depth: usize,
}

impl DatasetLoader {
    pub fn new(root: PathBuf) -> Self {
        Self { root, max_depth: 2 }
    }

    /// Find dataset files under the root directory.
    ///
    /// Hidden entries are skipped. When several files map to the same
    /// page, the shallowest one wins.
    pub fn scan(&self) -> Vec<DatasetFile> {
        let mut found: BTreeMap<&'static str, (usize, DatasetFile)> = BTreeMap::new();

        let walker = WalkDir::new(&self.root)
            .max_depth(self.max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name().to_str()));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let Some(page) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Page::from_slug)
            else {
                continue;
            };

            let depth = entry.depth();
            if found.get(page.slug()).map_or(true, |(d, _)| depth < *d) {
                let file = DatasetFile {
                    page,
                    path: path.to_path_buf(),
                };
                found.insert(page.slug(), (depth, file));
            }
        }

        found.into_values().map(|(_, file)| file).collect()
    }

    /// Resolve the dataset for a page and load it.
    pub fn load_page(&self, page: Page) -> Result<Vec<Record>, LoadError> {
        if !self.root.exists() {
            return Err(LoadError::NotFound(self.root.clone()));
        }

        if self.root.is_file() {
            return load_file(&self.root);
        }

        let file = self
            .scan()
            .into_iter()
            .find(|f| f.page == page)
            .ok_or_else(|| LoadError::MissingPage {
                page: page.slug().to_string(),
                dir: self.root.clone(),
            })?;

        load_file(&file.path)
    }
}

/// Read a JSON array of records.
pub fn load_file(path: &Path) -> Result<Vec<Record>, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<Record> =
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if records.is_empty() {
        warn!("Dataset {} is empty", path.display());
    }
    debug!("Loaded {} records from {}", records.len(), path.display());

    Ok(records)
}

fn is_hidden(name: Option<&str>) -> bool {
    name.map_or(false, |n| n.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLETS: &str = r#"[
        {"id": "W-1", "agentName": "Adebayo", "status": "active", "availableBalance": 1500.5},
        {"id": "W-2", "agentName": "Chidi", "status": "frozen", "date": "2024-01-12"}
    ]"#;

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallets.json");
        fs::write(&path, WALLETS).unwrap();

        let records = DatasetLoader::new(path).load_page(Page::AgentWallets).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].date.as_deref(), Some("2024-01-12"));
    }

    #[test]
    fn test_scan_directory_by_slug() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("agent-wallets.json"), WALLETS).unwrap();
        fs::write(dir.path().join("notes.json"), "[]").unwrap();
        fs::create_dir(dir.path().join(".cache")).unwrap();
        fs::write(dir.path().join(".cache/risk-disputes.json"), "[]").unwrap();

        let loader = DatasetLoader::new(dir.path().to_path_buf());
        let files = loader.scan();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].page, Page::AgentWallets);

        assert_eq!(loader.load_page(Page::AgentWallets).unwrap().len(), 2);
        assert!(matches!(
            loader.load_page(Page::RiskDisputes),
            Err(LoadError::MissingPage { .. })
        ));
    }

    #[test]
    fn test_fixture_datasets() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        let loader = DatasetLoader::new(root);

        let pages: Vec<Page> = loader.scan().into_iter().map(|f| f.page).collect();
        assert!(pages.contains(&Page::ReferralFraud));
        assert!(pages.contains(&Page::RiskDisputes));

        let fraud = loader.load_page(Page::ReferralFraud).unwrap();
        assert_eq!(fraud.len(), 4);
        assert_eq!(fraud[0].number("riskScore"), Some(92.0));

        let disputes = loader.load_page(Page::RiskDisputes).unwrap();
        assert_eq!(disputes[2].text("resolvedAt").as_deref(), Some("2024-01-17"));
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = DatasetLoader::new(dir.path().join("nope.json"));
        assert!(matches!(
            missing.load_page(Page::ServiceFees),
            Err(LoadError::NotFound(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(load_file(&bad), Err(LoadError::Parse { .. })));
    }
}
