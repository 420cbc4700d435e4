use crate::error::{Bfi2Error, Result};
use crate::types::settings::Settings;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_SETTINGS_FILE: &str = "bfi2.toml";
pub const DEFAULT_LOCAL_FILE: &str = ".bfi2/local.toml";
pub const DEFAULT_GLOBAL_SETTINGS_FILE: &str = ".config/bfi2/config.toml";

pub fn load_settings(root: &Path) -> Result<Option<Settings>> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_SETTINGS_FILE));
    load_settings_with_global(root, global.as_deref())
}

pub(crate) fn load_settings_with_global(
    root: &Path,
    global_path: Option<&Path>,
) -> Result<Option<Settings>> {
    let repo_path = root.join(DEFAULT_SETTINGS_FILE);
    if !repo_path.exists() {
        return Ok(None);
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    merge_file_if_exists(&mut merged, &repo_path)?;
    merge_file_if_exists(&mut merged, &root.join(DEFAULT_LOCAL_FILE))?;

    let settings: Settings = merged
        .try_into()
        .map_err(|e: toml::de::Error| Bfi2Error::SettingsParse(e.to_string()))?;
    Ok(Some(settings))
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Bfi2Error::SettingsParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_settings_returns_none_when_repo_file_missing() {
        let dir = TempDir::new().expect("temp dir should be created");
        let settings =
            load_settings_with_global(dir.path(), None).expect("load should not fail");
        assert!(settings.is_none());
    }

    #[test]
    fn load_settings_merges_global_repo_and_local_in_order() {
        let root = TempDir::new().expect("root temp dir should be created");
        let global_root = TempDir::new().expect("global temp dir should be created");
        let global_path = global_root.path().join("config.toml");

        fs::write(
            &global_path,
            r#"
[output]
results_dir = "/srv/bfi2/results"

[logging]
level = "warn"
"#,
        )
        .expect("global settings should write");

        fs::write(
            root.path().join(DEFAULT_SETTINGS_FILE),
            r#"
[study]
name = "pilot"
default_persona = "participant"

[logging]
level = "info"
"#,
        )
        .expect("repo settings should write");

        fs::create_dir_all(root.path().join(".bfi2")).expect("local dir should create");
        fs::write(
            root.path().join(DEFAULT_LOCAL_FILE),
            r#"
[study]
default_persona = "rater-07"
"#,
        )
        .expect("local override should write");

        let settings = load_settings_with_global(root.path(), Some(&global_path))
            .expect("load should succeed")
            .expect("merged settings should exist");

        assert_eq!(settings.study.name.as_deref(), Some("pilot"));
        assert_eq!(settings.study.default_persona, "rater-07");
        assert_eq!(settings.logging.level, "info");
        assert_eq!(
            settings.output.results_dir,
            PathBuf::from("/srv/bfi2/results")
        );
    }

    #[test]
    fn load_settings_reports_the_broken_file() {
        let root = TempDir::new().expect("root temp dir should be created");
        fs::write(root.path().join(DEFAULT_SETTINGS_FILE), "[study\nname = ")
            .expect("broken settings should write");

        let err = load_settings_with_global(root.path(), None).expect_err("parse should fail");
        assert!(err.to_string().contains("settings parse error"));
        assert!(err.to_string().contains(DEFAULT_SETTINGS_FILE));
    }
}
