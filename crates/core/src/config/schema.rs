//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub android: AndroidConfig,
}

/// Project layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Application module directory, relative to the project root
    #[serde(default = "default_app_dir")]
    pub app_dir: String,

    /// Gradle build file name inside the app module
    #[serde(default = "default_gradle_file")]
    pub gradle_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            gradle_file: default_gradle_file(),
        }
    }
}

fn default_app_dir() -> String {
    "app".to_string()
}

fn default_gradle_file() -> String {
    "build.gradle".to_string()
}

/// Build behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuildConfig {
    /// Build type used when none is given on the command line.
    /// When unset the CLI prompts for Debug/Release.
    #[serde(default)]
    pub default_type: Option<String>,
}

/// Android SDK configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AndroidConfig {
    /// Android SDK location; `~` and environment variables are expanded
    #[serde(default = "default_sdk_dir")]
    pub sdk_dir: String,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            sdk_dir: default_sdk_dir(),
        }
    }
}

fn default_sdk_dir() -> String {
    "~/Android/Sdk".to_string()
}

impl AndroidConfig {
    /// SDK directory with shell expansion applied
    pub fn expanded_sdk_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::full(&self.sdk_dir).map_or_else(
            |_| self.sdk_dir.clone(),
            |expanded| expanded.into_owned(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_defaults() {
        let schema = ConfigSchema::default();
        assert_eq!(schema.project.app_dir, "app");
        assert_eq!(schema.project.gradle_file, "build.gradle");
        assert!(schema.build.default_type.is_none());
    }

    #[test]
    fn test_sdk_dir_expansion() {
        let android = AndroidConfig {
            sdk_dir: "/opt/android-sdk".to_string(),
        };
        assert_eq!(android.expanded_sdk_dir(), PathBuf::from("/opt/android-sdk"));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let schema: ConfigSchema = toml::from_str(
            r#"
            [build]
            default_type = "Release"
            "#,
        )
        .unwrap();
        assert_eq!(schema.build.default_type.as_deref(), Some("Release"));
        assert_eq!(schema.project.app_dir, "app");
    }
}
