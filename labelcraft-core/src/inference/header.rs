//! Header row detection over loosely structured sheets

use crate::config::InferenceConfig;

/// Finds the row that holds column titles by counting keyword hits
#[derive(Debug, Clone)]
pub struct HeaderLocator {
    keywords: Vec<String>,
    min_matches: usize,
    window: usize,
}

impl HeaderLocator {
    /// Keywords are compared case-insensitively; duplicates after
    /// normalization count once
    pub fn new(keywords: &[String], min_matches: usize, window: usize) -> Self {
        let mut keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_uppercase())
            .filter(|k| !k.is_empty())
            .collect();
        keywords.sort();
        keywords.dedup();

        Self {
            keywords,
            min_matches,
            window,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Self {
        Self::new(
            &config.header_keywords,
            config.header_min_matches,
            config.header_scan_rows,
        )
    }

    /// Number of rows inspected from the top of a sheet
    pub fn window(&self) -> usize {
        self.window
    }

    /// Index of the first row within the window reaching the threshold
    pub fn locate<S: AsRef<str>>(&self, rows: &[Vec<S>]) -> Option<usize> {
        rows.iter()
            .take(self.window)
            .position(|row| self.matches(row) >= self.min_matches)
    }

    /// Distinct keywords present anywhere in the row
    pub fn matches<S: AsRef<str>>(&self, row: &[S]) -> usize {
        let text = row
            .iter()
            .map(|cell| cell.as_ref().to_uppercase())
            .collect::<Vec<_>>()
            .join(" ");

        self.keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count()
    }
}

impl Default for HeaderLocator {
    fn default() -> Self {
        Self::from_config(&InferenceConfig::default())
    }
}
