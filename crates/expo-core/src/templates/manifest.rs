//! Project manifest customization (app.json, package.json)

use crate::error::{Result, ToolsError};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Expo app config, relative to the project root
pub const APP_MANIFEST: &str = "app.json";

/// npm package manifest, relative to the project root
pub const PACKAGE_MANIFEST: &str = "package.json";

/// Derive a slug: lower-case, each run of whitespace becomes one hyphen
pub fn slugify(app_name: &str) -> String {
    let mut slug = String::with_capacity(app_name.len());
    let mut in_whitespace = false;

    for c in app_name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }

    slug
}

/// A parsed JSON manifest bound to the file it came from
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    path: PathBuf,
    root: Map<String, Value>,
}

impl ManifestDocument {
    /// Load a manifest; `Ok(None)` when the file does not exist
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ToolsError::io(format!("Failed to read {}", path.display()), e))
            }
        };

        let value: Value =
            serde_json::from_str(&content).map_err(|e| ToolsError::config(path, e))?;

        match value {
            Value::Object(root) => Ok(Some(Self {
                path: path.to_path_buf(),
                root,
            })),
            _ => Err(ToolsError::config(path, "expected a JSON object")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Write back with 2-space indentation
    pub async fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.root)
            .map_err(|e| ToolsError::config(&self.path, e))?;
        fs::write(&self.path, content)
            .await
            .map_err(|e| ToolsError::io(format!("Failed to write {}", self.path.display()), e))
    }

    /// Set `expo.name` and `expo.slug`, creating the `expo` object if absent
    fn apply_app_identity(&mut self, app_name: &str, slug: &str) -> Result<()> {
        let expo = self
            .root
            .entry("expo")
            .or_insert_with(|| Value::Object(Map::new()));

        let Value::Object(expo) = expo else {
            return Err(ToolsError::config(&self.path, "\"expo\" must be an object"));
        };

        expo.insert("name".to_string(), Value::String(app_name.to_string()));
        expo.insert("slug".to_string(), Value::String(slug.to_string()));
        Ok(())
    }

    /// Set `name`, and `description` only when it already holds a truthy value
    fn apply_package_identity(&mut self, app_name: &str, slug: &str) {
        self.root
            .insert("name".to_string(), Value::String(slug.to_string()));

        if self.root.get("description").is_some_and(is_truthy) {
            self.root.insert(
                "description".to_string(),
                Value::String(format!("{} - Expo application", app_name)),
            );
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Rewrite the project's manifests to carry `app_name`.
///
/// Absent manifests are skipped. Both manifests are parsed before either is
/// written, so an invalid one aborts with nothing modified.
pub async fn customize_project(project_root: &Path, app_name: &str) -> Result<()> {
    let slug = slugify(app_name);

    let app = ManifestDocument::load(&project_root.join(APP_MANIFEST)).await?;
    let package = ManifestDocument::load(&project_root.join(PACKAGE_MANIFEST)).await?;

    let mut updated = Vec::new();

    if let Some(mut app) = app {
        app.apply_app_identity(app_name, &slug)?;
        updated.push(app);
    }

    if let Some(mut package) = package {
        package.apply_package_identity(app_name, &slug);
        updated.push(package);
    }

    for manifest in &updated {
        manifest.save().await?;
        tracing::debug!(path = %manifest.path().display(), slug, "customized manifest");
    }

    Ok(())
}
