use std::{fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use taskdeck_core::ArchivePolicy;
use time::Duration;

/// Directory name under the platform config dir.
pub const CONFIG_DIR: &str = "taskdeck";
/// File name of the settings file.
pub const CONFIG_FILE: &str = "config.toml";

/// User settings loaded from `config.toml`. Read-only: nothing writes it back.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub tasks: TaskConfig,
}

impl Settings {
    /// Load settings from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Load settings from `<dir>/taskdeck/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the file exists but is invalid.
    pub fn from_config_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_file(dir.as_ref().join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Parse and validate settings from TOML text.
    ///
    /// # Errors
    /// Returns an error on malformed TOML or invalid values.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).context("failed to parse settings")?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        self.tasks.ensure_valid_threshold()
    }

    /// Auto-archive policy derived from the task settings.
    #[must_use]
    pub fn archive_policy(&self) -> ArchivePolicy {
        ArchivePolicy {
            enabled: self.tasks.auto_archive,
            after: Duration::hours(i64::from(self.tasks.archive_after_hours)),
        }
    }
}

/// View shown at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultView {
    /// Sorted task list.
    #[default]
    List,
    /// Month calendar.
    Calendar,
}

impl DefaultView {
    /// String representation used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Calendar => "calendar",
        }
    }
}

impl fmt::Display for DefaultView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefaultView {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(Self::List),
            "calendar" => Ok(Self::Calendar),
            other => bail!("unknown view '{other}' (expected list or calendar)"),
        }
    }
}

/// `[appearance]` block.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppearanceConfig {
    /// Dark theme preference; carried for front-ends, unused by the core.
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub default_view: DefaultView,
}

/// `[notifications]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NotificationConfig {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default = "enabled")]
    pub task_reminders: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            task_reminders: true,
        }
    }
}

/// `[tasks]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TaskConfig {
    /// Hide completed tasks after `archive_after_hours`.
    #[serde(default)]
    pub auto_archive: bool,
    #[serde(default = "default_archive_after_hours")]
    pub archive_after_hours: u32,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            auto_archive: false,
            archive_after_hours: default_archive_after_hours(),
        }
    }
}

impl TaskConfig {
    fn ensure_valid_threshold(&self) -> Result<()> {
        if self.archive_after_hours == 0 {
            bail!("tasks.archive_after_hours must be greater than zero");
        }
        Ok(())
    }
}

const fn enabled() -> bool {
    true
}

const fn default_archive_after_hours() -> u32 {
    24
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn missing_config_returns_defaults() -> Result<()> {
        let dir = tempdir()?;
        let settings = Settings::from_config_dir(dir.path())?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.appearance.default_view, DefaultView::List);
        assert!(settings.notifications.enabled);
        assert!(!settings.tasks.auto_archive);
        assert_eq!(settings.tasks.archive_after_hours, 24);
        Ok(())
    }

    #[test]
    fn load_config_with_all_sections() -> Result<()> {
        let dir = tempdir()?;
        let cfg_dir = dir.path().join(CONFIG_DIR);
        fs::create_dir_all(&cfg_dir)?;
        let mut file = fs::File::create(cfg_dir.join(CONFIG_FILE))?;
        writeln!(
            file,
            "[appearance]\ndark_mode = true\ndefault_view = \"calendar\"\n\n[notifications]\ntask_reminders = false\n\n[tasks]\nauto_archive = true\narchive_after_hours = 48"
        )?;

        let settings = Settings::from_config_dir(dir.path())?;
        assert!(settings.appearance.dark_mode);
        assert_eq!(settings.appearance.default_view, DefaultView::Calendar);
        assert!(settings.notifications.enabled);
        assert!(!settings.notifications.task_reminders);

        let policy = settings.archive_policy();
        assert!(policy.enabled);
        assert_eq!(policy.after, Duration::hours(48));
        Ok(())
    }

    #[test]
    fn zero_archive_threshold_is_rejected() {
        let Err(err) = Settings::from_toml("[tasks]\narchive_after_hours = 0") else {
            panic!("zero threshold should error");
        };
        assert!(err.to_string().contains("archive_after_hours"));
    }

    #[test]
    fn unknown_view_is_rejected() {
        assert!(Settings::from_toml("[appearance]\ndefault_view = \"kanban\"").is_err());
        assert!("kanban".parse::<DefaultView>().is_err());
        assert!(matches!("Calendar".parse::<DefaultView>(), Ok(DefaultView::Calendar)));
    }

    #[test]
    fn malformed_file_reports_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[tasks\nauto_archive = ")?;
        let Err(err) = Settings::from_file(&path) else {
            panic!("malformed toml should error");
        };
        assert!(err.to_string().contains("broken.toml"));
        Ok(())
    }
}
