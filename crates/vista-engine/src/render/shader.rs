//! WGSL source loading.
//!
//! Shader files are optional: a missing or malformed file is a recoverable
//! error and callers fall back to the built-in source.

use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};

/// Built-in shape shader (`vs_main` / `fs_main`, view uniform at group 0 binding 0).
pub const BUILTIN_SHAPE_WGSL: &str = include_str!("shaders/shape.wgsl");

/// Entry points every shape shader must define.
pub const ENTRY_POINTS: [&str; 2] = ["vs_main", "fs_main"];

/// Reads a WGSL file and checks it looks like a shape shader.
///
/// This is a cheap structural check; full validation happens when wgpu
/// compiles the module.
pub fn load_wgsl(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read shader {}", path.display()))?;

    check_source(&src).with_context(|| format!("invalid shader {}", path.display()))?;
    Ok(src)
}

/// Loads `path` when given, falling back to the built-in shader on any error.
pub fn load_wgsl_or_builtin(path: Option<&Path>) -> Cow<'static, str> {
    let Some(path) = path else {
        return Cow::Borrowed(BUILTIN_SHAPE_WGSL);
    };

    match load_wgsl(path) {
        Ok(src) => {
            log::info!("loaded shader {}", path.display());
            Cow::Owned(src)
        }
        Err(e) => {
            log::warn!("{e:#}; using built-in shader");
            Cow::Borrowed(BUILTIN_SHAPE_WGSL)
        }
    }
}

fn check_source(src: &str) -> Result<()> {
    anyhow::ensure!(!src.trim().is_empty(), "source is empty");

    for entry in ENTRY_POINTS {
        anyhow::ensure!(src.contains(entry), "missing entry point `{entry}`");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("vista-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn builtin_declares_uniforms_and_entry_points() {
        check_source(BUILTIN_SHAPE_WGSL).unwrap();
        for field in ["size:", "scale:", "location:"] {
            assert!(BUILTIN_SHAPE_WGSL.contains(field), "{field}");
        }
    }

    #[test]
    fn loads_valid_file() {
        let path = temp_file("ok.wgsl", BUILTIN_SHAPE_WGSL);
        let src = load_wgsl(&path).unwrap();
        assert_eq!(src, BUILTIN_SHAPE_WGSL);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_wgsl("/definitely/not/here.wgsl").unwrap_err();
        assert!(format!("{err:#}").contains("failed to read shader"));
    }

    #[test]
    fn rejects_empty_and_incomplete_sources() {
        let empty = temp_file("empty.wgsl", "  \n");
        assert!(load_wgsl(&empty).is_err());
        std::fs::remove_file(empty).ok();

        let partial = temp_file("partial.wgsl", "@vertex fn vs_main() {}");
        let err = load_wgsl(&partial).unwrap_err();
        assert!(format!("{err:#}").contains("fs_main"));
        std::fs::remove_file(partial).ok();
    }

    #[test]
    fn falls_back_to_builtin() {
        assert_eq!(load_wgsl_or_builtin(None), BUILTIN_SHAPE_WGSL);
        let src = load_wgsl_or_builtin(Some(Path::new("/definitely/not/here.wgsl")));
        assert!(matches!(src, Cow::Borrowed(_)));
    }
}
