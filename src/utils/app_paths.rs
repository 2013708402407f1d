use anyhow::{anyhow, Result};
use chrono::Local;
use std::fs;
use std::path::PathBuf;

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Cannot determine data directory"))?
            .join("pixsearch");

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn exports_dir() -> Result<PathBuf> {
        let dir = Self::data_dir()?.join("exports");
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Timestamped file name for a gallery export of `query`
    pub fn export_file_name(query: &str) -> String {
        let slug: String = query
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        let slug = slug.trim_matches('-');
        let slug = if slug.is_empty() { "gallery" } else { slug };
        format!("{}_{}.html", slug, Local::now().format("%Y%m%d_%H%M%S"))
    }

    pub fn default_export_file(query: &str) -> Result<PathBuf> {
        Ok(Self::exports_dir()?.join(Self::export_file_name(query)))
    }
}
