use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

/// Resolve the application home directory into an absolute path.
///
/// - `None` → `$HOME/<default_subdir>`
/// - `~` or `~/...` → expanded against `$HOME`
/// - relative paths → joined with the current working directory
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let home = || dirs::home_dir().ok_or_else(|| anyhow!("cannot determine user home directory"));

    let path = match configured.as_deref().map(str::trim) {
        None | Some("") => home()?.join(default_subdir),
        Some("~") => home()?,
        Some(p) if p.starts_with("~/") || p.starts_with("~\\") => home()?.join(&p[2..]),
        Some(p) => {
            let p = PathBuf::from(p);
            if p.is_absolute() {
                p
            } else {
                std::env::current_dir()
                    .context("cannot read current directory")?
                    .join(p)
            }
        }
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("failed to create home dir {}", path.display()))?;
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("store-home");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".x", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.exists());
    }

    #[test]
    fn tilde_is_expanded() {
        let resolved = resolve_home_dir(Some("~/.storefront-test".into()), ".x", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".storefront-test"));
    }

    #[test]
    fn empty_falls_back_to_default_subdir() {
        let resolved = resolve_home_dir(Some("  ".into()), ".storefront", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".storefront"));
    }
}
