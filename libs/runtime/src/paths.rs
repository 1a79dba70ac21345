use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the server home directory into an absolute path.
///
/// - `explicit = Some(..)`: a leading `~` is expanded to the user's home,
///   relative paths are joined onto the current working directory.
/// - `explicit = None`: `<user home>/<default_subdir>`.
///
/// When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match explicit {
        Some(raw) => expand(&raw)?,
        None => user_home()?.join(default_subdir),
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("cannot create home dir {}", resolved.display()))?;
    }
    Ok(resolved)
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("unable to determine the user home directory"))
}

fn expand(raw: &str) -> Result<PathBuf> {
    let raw = raw.trim();
    let path = if raw == "~" {
        user_home()?
    } else if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        user_home()?.join(rest)
    } else {
        PathBuf::from(raw)
    };

    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("current_dir unavailable")?;
    Ok(cwd.join(Path::new(&path)))
}
