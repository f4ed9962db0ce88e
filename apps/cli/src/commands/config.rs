//! 配置管理命令
//!
//! 查找、校验和打印机械臂配置文件。

use anyhow::{Context, Result};
use clap::Subcommand;
use servo_arm_control::ArmProfile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 配置目录
fn config_dir() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine config directory"))?;

    path.push("servo-arm");
    Ok(path)
}

/// 默认配置文件路径
pub fn default_profile_path() -> Result<PathBuf> {
    let mut path = config_dir()?;
    path.push("profile.toml");
    Ok(path)
}

/// 配置来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSource {
    /// 命令行指定
    Explicit(PathBuf),
    /// 默认路径
    ConfigDir(PathBuf),
    /// 内置配置
    Builtin,
}

impl std::fmt::Display for ProfileSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileSource::Explicit(path) | ProfileSource::ConfigDir(path) => {
                write!(f, "{}", path.display())
            },
            ProfileSource::Builtin => write!(f, "(built-in)"),
        }
    }
}

/// 查找配置来源：`--profile` > 默认路径 > 内置
pub fn locate_profile(explicit: Option<&Path>) -> Result<ProfileSource> {
    if let Some(path) = explicit {
        return Ok(ProfileSource::Explicit(path.to_path_buf()));
    }

    match default_profile_path() {
        Ok(path) if path.exists() => Ok(ProfileSource::ConfigDir(path)),
        _ => Ok(ProfileSource::Builtin),
    }
}

/// 加载配置
pub fn load_profile(source: &ProfileSource) -> Result<ArmProfile> {
    let profile = match source {
        ProfileSource::Explicit(path) | ProfileSource::ConfigDir(path) => ArmProfile::load(path)
            .with_context(|| format!("Failed to load profile {}", path.display()))?,
        ProfileSource::Builtin => ArmProfile::builtin().context("Built-in profile is invalid")?,
    };
    info!("Using profile {}", source);
    Ok(profile)
}

/// 查找并加载配置
pub fn resolve_profile(explicit: Option<&Path>) -> Result<ArmProfile> {
    load_profile(&locate_profile(explicit)?)
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 校验配置
    Check,

    /// 打印生效的配置（TOML）
    Show,

    /// 打印默认配置文件路径
    Path,

    /// 把内置配置写到默认路径（或指定路径）
    Init {
        /// 目标文件
        #[arg(long)]
        path: Option<PathBuf>,

        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, profile: Option<&Path>) -> Result<()> {
        match self {
            ConfigCommand::Check => Self::check_(profile),

            ConfigCommand::Show => Self::show_(profile),

            ConfigCommand::Path => {
                println!("{}", default_profile_path()?.display());
                Ok(())
            },

            ConfigCommand::Init { path, force } => Self::init_(path, force),
        }
    }

    fn check_(profile: Option<&Path>) -> Result<()> {
        let source = locate_profile(profile)?;
        let profile = load_profile(&source)?;
        let warnings = profile.validate().context("Profile validation failed")?;

        println!("Profile: {}", source);
        for warning in &warnings {
            println!("  warning: {}", warning);
        }
        println!(
            "Profile OK: {} named poses, {} tasks, {} warnings",
            profile.poses.len(),
            profile.tasks.len(),
            warnings.len()
        );
        Ok(())
    }

    fn show_(profile: Option<&Path>) -> Result<()> {
        let profile = resolve_profile(profile)?;
        print!("{}", profile.to_toml_string()?);
        Ok(())
    }

    fn init_(path: Option<PathBuf>, force: bool) -> Result<()> {
        let path = match path {
            Some(path) => path,
            None => default_profile_path()?,
        };

        if path.exists() && !force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        ArmProfile::builtin()?.save(&path)?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_profile_wins() {
        let source = locate_profile(Some(Path::new("/tmp/arm.toml"))).unwrap();
        assert_eq!(source, ProfileSource::Explicit(PathBuf::from("/tmp/arm.toml")));
    }

    #[test]
    fn test_missing_explicit_profile_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_profile(Some(&dir.path().join("missing.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("profile.toml");

        ConfigCommand::Init {
            path: Some(path.clone()),
            force: false,
        }
        .execute(None)
        .unwrap();
        assert_eq!(
            resolve_profile(Some(&path)).unwrap(),
            ArmProfile::builtin().unwrap()
        );

        // 已存在且未指定 --force
        let again = ConfigCommand::Init {
            path: Some(path.clone()),
            force: false,
        }
        .execute(None);
        assert!(again.is_err());
    }
}
