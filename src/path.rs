//! Asset path helpers.
//!
//! Paths in a Tiled document are relative to the document itself. These
//! helpers work on plain strings so that `\` separators written by editors on
//! Windows behave the same everywhere.

use std::path::Path;

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// True if `path` starts with a separator, or with a drive letter on Windows.
pub fn is_absolute(path: &str) -> bool {
    let mut chars = path.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if cfg!(windows) && first.is_ascii_alphabetic() && chars.next() == Some(':') {
        return true;
    }
    is_separator(first)
}

/// Joins with exactly one `/`. An empty operand yields the other one.
pub fn join_paths(a: &str, b: &str) -> String {
    if a.is_empty() {
        return b.to_owned();
    }
    if b.is_empty() {
        return a.to_owned();
    }

    let a = a.strip_suffix(is_separator).unwrap_or(a);
    let b = b.strip_prefix(is_separator).unwrap_or(b);
    format!("{a}/{b}")
}

/// Everything before the last separator, or `""` when there is none.
pub fn directory_of(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Resolves `rel_path` against `base_dir`.
///
/// Prefers the joined candidate when it exists, then `rel_path` relative to
/// the working directory. When neither exists the joined candidate is
/// returned anyway and the caller deals with the failed load.
pub fn resolve(base_dir: &str, rel_path: &str) -> String {
    if rel_path.is_empty() || is_absolute(rel_path) {
        return rel_path.to_owned();
    }

    let candidate = join_paths(base_dir, rel_path);
    if Path::new(&candidate).exists() {
        return candidate;
    }
    if Path::new(rel_path).exists() {
        return rel_path.to_owned();
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn absolute_paths() {
        assert!(is_absolute("/assets/map.tmj"));
        assert!(is_absolute("\\assets\\map.tmj"));
        assert!(!is_absolute("assets/map.tmj"));
        assert!(!is_absolute(""));
    }

    #[test]
    fn join_trims_one_separator_each_side() {
        assert_eq!(join_paths("maps/", "/tiles.png"), "maps/tiles.png");
        assert_eq!(join_paths("maps", "tiles.png"), "maps/tiles.png");
        assert_eq!(join_paths("maps\\", "tiles.png"), "maps/tiles.png");
        assert_eq!(join_paths("", "tiles.png"), "tiles.png");
        assert_eq!(join_paths("maps", ""), "maps");
    }

    #[test]
    fn directory_of_uses_last_separator() {
        assert_eq!(directory_of("assets/maps/map.tmj"), "assets/maps");
        assert_eq!(directory_of("assets\\maps\\map.tmj"), "assets\\maps");
        assert_eq!(directory_of("map.tmj"), "");
    }

    #[test]
    fn resolve_prefers_existing_candidate() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().to_str().unwrap();
        fs::write(dir.path().join("tiles.png"), b"x").unwrap();

        assert_eq!(resolve(base, "tiles.png"), format!("{base}/tiles.png"));
    }

    #[test]
    fn resolve_falls_back_to_joined_candidate() {
        assert_eq!(
            resolve("no/such/dir", "missing_image.png"),
            "no/such/dir/missing_image.png"
        );
        assert_eq!(resolve("no/such/dir", ""), "");
        assert_eq!(resolve("no/such/dir", "/abs.png"), "/abs.png");
    }

    #[test]
    fn resolve_falls_back_to_working_directory() {
        // tests run from the package root
        assert_eq!(resolve("no/such/dir", "Cargo.toml"), "Cargo.toml");
    }
}
