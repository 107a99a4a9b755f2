use std::path::{Component, Path, PathBuf};

/// Directory name used when a device identifier is absent or unusable.
pub const FALLBACK_IDENTIFIER: &str = "unknown";

/// Errors that can occur during path confinement
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' escapes root directory '{root}'")]
    PathTraversal { path: PathBuf, root: PathBuf },
}

/// Turns an untrusted device identifier into a single safe path segment.
///
/// Blank input maps to [`FALLBACK_IDENTIFIER`]. Otherwise the input is trimmed
/// and every run of characters outside `[A-Za-z0-9._-]` becomes one `_`.
/// The segments `.` and `..` also map to the fallback, since they would name
/// the base directory itself or its parent.
///
/// The function is total and idempotent.
pub fn sanitize_identifier(raw: Option<&str>) -> String {
    let trimmed = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return FALLBACK_IDENTIFIER.to_string(),
    };

    let mut safe = String::with_capacity(trimmed.len());
    let mut in_run = false;
    for c in trimmed.chars() {
        if is_safe_char(c) {
            safe.push(c);
            in_run = false;
        } else if !in_run {
            safe.push('_');
            in_run = true;
        }
    }

    if safe == "." || safe == ".." {
        return FALLBACK_IDENTIFIER.to_string();
    }
    safe
}

/// Derives the storage directory of a device: `normalize(base_dir / sanitize(device_id))`.
pub fn device_root(base_dir: &Path, device_id: Option<&str>) -> PathBuf {
    normalize(&base_dir.join(sanitize_identifier(device_id)))
}

/// Checks a requested file name against the strict allow-list
/// `^[A-Za-z0-9._-]+\.<extension>$`.
///
/// The extension comparison is case-sensitive. Names are rejected, never
/// repaired.
pub fn validate_file_name(name: &str, extension: &str) -> bool {
    let Some(stem) = name
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };

    !stem.is_empty() && stem.chars().all(is_safe_char)
}

/// Confines `candidate` to `root`.
///
/// Both paths are made absolute and lexically normalized. The candidate is
/// accepted only when it lies strictly below the root; the root itself is
/// rejected.
///
/// # Returns
///
/// * `Ok(PathBuf)` - The normalized absolute candidate path
/// * `Err(PathSecurityError::PathTraversal)` - If the candidate is not under root
pub fn confine(root: &Path, candidate: &Path) -> Result<PathBuf, PathSecurityError> {
    let root = normalize(root);
    let path = normalize(candidate);

    if path != root && path.starts_with(&root) {
        Ok(path)
    } else {
        Err(PathSecurityError::PathTraversal { path, root })
    }
}

/// Makes a path absolute (against the current directory) and resolves `.` and
/// `..` lexically, without touching the filesystem.
///
/// `..` at the filesystem root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => Path::new(std::path::MAIN_SEPARATOR_STR).join(path),
        }
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            Component::Normal(segment) => normalized.push(segment),
        }
    }
    normalized
}

fn is_safe_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTILE_IDS: &[&str] = &[
        "../../etc",
        "a/../../b",
        "..",
        ".",
        "/",
        "/etc/passwd",
        "..\\..\\windows",
        "  ",
        "",
        "AA:BB:CC:DD:EE:FF",
        "dev ice\t\n",
        "名前/../x",
        "....//....//",
    ];

    #[test]
    fn test_sanitize_blank_falls_back() {
        assert_eq!(sanitize_identifier(None), "unknown");
        assert_eq!(sanitize_identifier(Some("")), "unknown");
        assert_eq!(sanitize_identifier(Some(" \t\n")), "unknown");
    }

    #[test]
    fn test_sanitize_replaces_runs() {
        assert_eq!(sanitize_identifier(Some("AA:BB:CC")), "AA_BB_CC");
        assert_eq!(sanitize_identifier(Some("  a b  ")), "a_b");
        assert_eq!(sanitize_identifier(Some("a::/ /b")), "a_b");
        assert_eq!(sanitize_identifier(Some("../../etc")), ".._.._etc");
        assert_eq!(sanitize_identifier(Some("dev-01_x.y")), "dev-01_x.y");
        assert_eq!(sanitize_identifier(Some("é")), "_");
    }

    #[test]
    fn test_sanitize_dot_segments_fall_back() {
        assert_eq!(sanitize_identifier(Some("..")), "unknown");
        assert_eq!(sanitize_identifier(Some(" . ")), "unknown");
        assert_eq!(sanitize_identifier(Some("...")), "...");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for id in HOSTILE_IDS {
            let once = sanitize_identifier(Some(id));
            assert_eq!(sanitize_identifier(Some(&once)), once, "input {id:?}");
        }
    }

    #[test]
    fn test_device_root_stays_under_base() {
        let base = Path::new("/recordings");
        for id in HOSTILE_IDS {
            let root = device_root(base, Some(id));
            assert!(root.starts_with(base), "{id:?} -> {}", root.display());
            assert_ne!(root, base, "{id:?} resolved to the base itself");
            assert_eq!(root.parent(), Some(base), "{id:?} nested deeper");
        }
        assert!(device_root(base, None).starts_with(base));
    }

    #[test]
    fn test_device_root_scenarios() {
        let base = Path::new("/recordings");
        assert_eq!(
            device_root(base, Some("AA:BB:CC")),
            PathBuf::from("/recordings/AA_BB_CC")
        );
        assert_eq!(device_root(base, Some("")), PathBuf::from("/recordings/unknown"));
    }

    #[test]
    fn test_device_root_normalizes_base() {
        let root = device_root(Path::new("/data/./x/../recordings"), Some("dev"));
        assert_eq!(root, PathBuf::from("/data/recordings/dev"));
    }

    #[test]
    fn test_validate_file_name_accepts() {
        assert!(validate_file_name("rec.mp3", "mp3"));
        assert!(validate_file_name("20240101_120000_1704110400_abc_0.mp3", "mp3"));
        assert!(validate_file_name("a-b.c_d.mp3", "mp3"));
    }

    #[test]
    fn test_validate_file_name_rejects() {
        for name in [
            "../secret.mp3",
            "a/b.mp3",
            "a\\b.mp3",
            "noext",
            "",
            ".mp3",
            "rec.MP3",
            "rec.mp3.wav",
            "rec mp3.mp3",
            "rec%2F.mp3",
            "rec.mp3\0",
        ] {
            assert!(!validate_file_name(name, "mp3"), "accepted {name:?}");
        }
    }

    #[test]
    fn test_confine_accepts_descendants() {
        let root = Path::new("/recordings/dev");
        let ok = confine(root, Path::new("/recordings/dev/2024-01-01/rec.mp3")).unwrap();
        assert_eq!(ok, PathBuf::from("/recordings/dev/2024-01-01/rec.mp3"));

        let ok = confine(root, Path::new("/recordings/dev/x/../rec.mp3")).unwrap();
        assert_eq!(ok, PathBuf::from("/recordings/dev/rec.mp3"));
    }

    #[test]
    fn test_confine_rejects_escapes() {
        let root = Path::new("/recordings/dev");
        for candidate in [
            "/recordings/dev/../other/rec.mp3",
            "/recordings/device2/rec.mp3",
            "/recordings/dev",
            "/recordings/dev/.",
            "/etc/passwd",
        ] {
            assert!(
                matches!(
                    confine(root, Path::new(candidate)),
                    Err(PathSecurityError::PathTraversal { .. })
                ),
                "accepted {candidate}"
            );
        }
    }

    #[test]
    fn test_normalize_relative_is_absolute() {
        let normalized = normalize(Path::new("a/./b/../c"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("a/c"));
    }

    #[test]
    fn test_normalize_parent_at_root() {
        assert_eq!(normalize(Path::new("/../../x")), PathBuf::from("/x"));
    }
}
