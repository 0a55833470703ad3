use crate::app::cli::Cli;
use crate::app::models::ScanConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[".git", "node_modules", "__pycache__", "venv", ".idea"];

pub const DEFAULT_EXCLUDE_FILES: &[&str] = &[".pyc", ".pyo", ".pyd", ".so", ".dll"];

pub const DEFAULT_TEXT_EXTENSIONS: &[&str] = &[
    ".txt", ".py", ".js", ".html", ".css", ".md", ".json", ".xml", ".yaml", ".yml", ".ini",
    ".conf", ".cfg", ".properties", ".env", ".sql", ".sh", ".bat", ".ps1", ".java", ".cpp",
    ".hpp", ".h", ".c", ".cs", ".php", ".rb", ".pl", ".swift", ".kt", ".ts", ".jsx", ".tsx",
];

/// 1 MiB. Files at or above this are listed without content.
pub const DEFAULT_MAX_CONTENT_SIZE: u64 = 1024 * 1024;

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PresetConfig {
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_files: Option<Vec<String>>,
    pub text_extensions: Option<Vec<String>>,
    pub max_content_size: Option<u64>,
}

fn default_presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("folder_report")
        .join("presets.toml"))
}

/// Load presets from `path`, or from the default location. A missing file
/// yields no presets.
pub fn load_presets_file(path: Option<&Path>) -> Result<HashMap<String, PresetConfig>> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_presets_path()?,
    };

    if !config_path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read presets at {}", config_path.display()))?;

    let parsed: PresetsFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;

    Ok(parsed.presets)
}

/// Preset entries first, then CLI entries, de-duplicated in order.
/// `None` when neither side said anything, so defaults can apply.
fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Option<Vec<String>> {
    if preset_vec.is_none() && cli_vec.is_none() {
        return None;
    }
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    Some(combined)
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn normalize_extension(ext: String) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

/// Combine CLI arguments with the selected preset.
///
/// Preset choice: `--preset`, else the root directory's basename.
pub fn build_config(
    cli: Cli,
    presets: &HashMap<String, PresetConfig>,
    project_name: Option<&str>,
) -> ScanConfig {
    if let Some(name) = cli.preset.as_deref() {
        if !presets.contains_key(name) {
            log::warn!("Preset '{}' not found, using defaults", name);
        }
    }

    let preset_key = cli.preset.as_deref().or(project_name);
    let preset = preset_key
        .and_then(|k| presets.get(k))
        .cloned()
        .unwrap_or_default();

    let text_extensions = preset
        .text_extensions
        .map(|exts| exts.into_iter().map(normalize_extension).collect())
        .unwrap_or_else(|| owned(DEFAULT_TEXT_EXTENSIONS));

    ScanConfig {
        root: cli.path,
        output: cli.output,
        exclude_dirs: merge_vecs(preset.exclude_dirs, cli.exclude_dirs)
            .unwrap_or_else(|| owned(DEFAULT_EXCLUDE_DIRS)),
        exclude_files: merge_vecs(preset.exclude_files, cli.exclude_files)
            .unwrap_or_else(|| owned(DEFAULT_EXCLUDE_FILES)),
        text_extensions,
        max_content_size: preset.max_content_size.unwrap_or(DEFAULT_MAX_CONTENT_SIZE),
    }
}

pub fn resolve_config(cli: Cli) -> Result<ScanConfig> {
    let presets = load_presets_file(cli.presets_file.as_deref())?;

    let project_name = fs::canonicalize(&cli.path)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()));

    Ok(build_config(cli, &presets, project_name.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("folder_report").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_apply_without_presets_or_flags() {
        let config = build_config(cli(&[]), &HashMap::new(), None);
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.output, PathBuf::from("folder_structure_detailed.txt"));
        assert_eq!(config.exclude_dirs, owned(DEFAULT_EXCLUDE_DIRS));
        assert_eq!(config.exclude_files, owned(DEFAULT_EXCLUDE_FILES));
        assert_eq!(config.text_extensions.len(), DEFAULT_TEXT_EXTENSIONS.len());
        assert_eq!(config.max_content_size, 1_048_576);
    }

    #[test]
    fn empty_flag_excludes_nothing() {
        let config = build_config(cli(&["--exclude-dirs"]), &HashMap::new(), None);
        assert!(config.exclude_dirs.is_empty());
        assert_eq!(config.exclude_files, owned(DEFAULT_EXCLUDE_FILES));
    }

    #[test]
    fn cli_values_replace_defaults() {
        let config = build_config(
            cli(&["--exclude-dirs", "target", "dist", "--exclude-files", ".log"]),
            &HashMap::new(),
            None,
        );
        assert_eq!(config.exclude_dirs, vec!["target", "dist"]);
        assert_eq!(config.exclude_files, vec![".log"]);
    }

    #[test]
    fn preset_selected_by_project_name_merges_with_cli() {
        let mut presets = HashMap::new();
        presets.insert(
            "myproj".to_string(),
            PresetConfig {
                exclude_dirs: Some(vec!["target".into(), "dist".into()]),
                text_extensions: Some(vec!["RS".into(), ".toml".into()]),
                max_content_size: Some(4096),
                ..Default::default()
            },
        );

        let config = build_config(
            cli(&["--exclude-dirs", "dist", "build"]),
            &presets,
            Some("myproj"),
        );
        assert_eq!(config.exclude_dirs, vec!["target", "dist", "build"]);
        assert_eq!(config.exclude_files, owned(DEFAULT_EXCLUDE_FILES));
        assert_eq!(config.text_extensions, vec![".rs", ".toml"]);
        assert_eq!(config.max_content_size, 4096);
    }

    #[test]
    fn explicit_preset_wins_over_project_name() {
        let mut presets = HashMap::new();
        presets.insert(
            "web".to_string(),
            PresetConfig {
                exclude_files: Some(vec![".map".into()]),
                ..Default::default()
            },
        );
        presets.insert("myproj".to_string(), PresetConfig::default());

        let config = build_config(cli(&["--preset", "web"]), &presets, Some("myproj"));
        assert_eq!(config.exclude_files, vec![".map"]);
    }

    #[test]
    fn presets_file_is_parsed() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("presets.toml");
        fs::write(
            &path,
            "[web]\nexclude_dirs = [\"dist\"]\nmax_content_size = 2048\n\n[empty]\n",
        )
        .unwrap();

        let presets = load_presets_file(Some(&path)).unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets["web"].exclude_dirs, Some(vec!["dist".to_string()]));
        assert_eq!(presets["web"].max_content_size, Some(2048));
        assert!(presets["empty"].exclude_dirs.is_none());
    }

    #[test]
    fn missing_presets_file_is_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let presets = load_presets_file(Some(&tmp.path().join("nope.toml"))).unwrap();
        assert!(presets.is_empty());
    }

    #[test]
    fn malformed_presets_file_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("presets.toml");
        fs::write(&path, "[web\nexclude_dirs = ").unwrap();
        assert!(load_presets_file(Some(&path)).is_err());
    }
}
