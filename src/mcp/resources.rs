use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

use crate::error::Result;
use crate::mcp::types::{Resource, ResourceContents};

/// URI under which the category list is exposed.
pub const CATEGORIES_URI: &str = "expense://categories";

/// Category list written when no categories file exists yet. The list is
/// informational for callers; the store never validates against it.
const DEFAULT_CATEGORIES: &[&str] = &[
    "food",
    "transport",
    "housing",
    "utilities",
    "entertainment",
    "health",
    "education",
    "travel",
    "shopping",
    "other",
];

/// Read-only resource serving the static category list from disk.
pub struct CategoryResource {
    path: PathBuf,
}

impl CategoryResource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Write the default category list if no file exists yet. Existing
    /// files are never overwritten.
    pub async fn ensure_seed(&self) -> Result<()> {
        if self.path.exists() {
            debug!("Categories file present at: {:?}", self.path);
            return Ok(());
        }

        info!("Categories file not found, writing default list");
        let content = serde_json::to_string_pretty(DEFAULT_CATEGORIES)?;
        fs::write(&self.path, content).await?;
        Ok(())
    }

    /// Resource descriptor advertised on resources/list.
    pub fn descriptor(&self) -> Resource {
        Resource {
            uri: CATEGORIES_URI.to_string(),
            name: "categories".to_string(),
            description: Some("Allowed expense category names".to_string()),
            mime_type: Some("application/json".to_string()),
        }
    }

    /// Read the category list for a resources/read request.
    pub async fn read(&self) -> Result<ResourceContents> {
        let text = fs::read_to_string(&self.path).await?;
        Ok(ResourceContents {
            uri: CATEGORIES_URI.to_string(),
            mime_type: "application/json".to_string(),
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_resource(temp_dir: &TempDir) -> CategoryResource {
        CategoryResource::new(temp_dir.path().join("categories.json"))
    }

    #[tokio::test]
    async fn test_seed_creates_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let resource = test_resource(&temp_dir);

        resource.ensure_seed().await.unwrap();

        let contents = resource.read().await.unwrap();
        let categories: Vec<String> = serde_json::from_str(&contents.text).unwrap();
        assert!(categories.contains(&"food".to_string()));
        assert_eq!(contents.uri, CATEGORIES_URI);
        assert_eq!(contents.mime_type, "application/json");
    }

    #[tokio::test]
    async fn test_seed_never_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("categories.json");
        tokio::fs::write(&path, r#"["groceries"]"#).await.unwrap();

        let resource = CategoryResource::new(path);
        resource.ensure_seed().await.unwrap();

        let contents = resource.read().await.unwrap();
        assert_eq!(contents.text, r#"["groceries"]"#);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let resource = test_resource(&temp_dir);

        assert!(resource.read().await.is_err());
    }

    #[test]
    fn test_descriptor_shape() {
        let temp_dir = TempDir::new().unwrap();
        let resource = test_resource(&temp_dir);

        let descriptor = resource.descriptor();
        assert_eq!(descriptor.uri, CATEGORIES_URI);
        assert_eq!(descriptor.mime_type.as_deref(), Some("application/json"));
    }
}
