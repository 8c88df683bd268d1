//! Static files written into a freshly generated project.
//!
//! Bodies live in `templates/` next to this crate's manifest and are embedded
//! at compile time.

use std::path::{Path, PathBuf};

use crate::error::{Result, ScaffoldError};

/// A file written verbatim to a path relative to the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    /// Path relative to the project root, `/`-separated.
    pub path: &'static str,
    /// File contents.
    pub contents: &'static str,
}

pub const TAILWIND_CONFIG: Template = Template {
    path: "tailwind.config.js",
    contents: include_str!("../templates/tailwind.config.js"),
};

pub const GLOBALS_CSS: Template = Template {
    path: "src/styles/globals.css",
    contents: include_str!("../templates/globals.css"),
};

pub const APP_TSX: Template = Template {
    path: "src/App.tsx",
    contents: include_str!("../templates/App.tsx"),
};

pub const MAIN_TSX: Template = Template {
    path: "src/main.tsx",
    contents: include_str!("../templates/main.tsx"),
};

pub const INDEX_HTML: Template = Template {
    path: "index.html",
    contents: include_str!("../templates/index.html"),
};

pub const UTILS_TS: Template = Template {
    path: "src/lib/utils.ts",
    contents: include_str!("../templates/utils.ts"),
};

pub const GITIGNORE: Template = Template {
    path: ".gitignore",
    contents: include_str!("../templates/gitignore"),
};

/// Every template, in the order the pipeline writes them.
pub const ALL: [Template; 7] = [
    TAILWIND_CONFIG,
    GLOBALS_CSS,
    APP_TSX,
    MAIN_TSX,
    INDEX_HTML,
    UTILS_TS,
    GITIGNORE,
];

/// Write `template` under `root`, creating parent directories.
///
/// An existing file at the target path is overwritten.
pub fn write_template(root: &Path, template: &Template) -> Result<PathBuf> {
    let path = template
        .path
        .split('/')
        .fold(root.to_path_buf(), |path, part| path.join(part));

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ScaffoldError::TemplateWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(&path, template.contents).map_err(|source| ScaffoldError::TemplateWrite {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = template.contents.len(), "template written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_parents() {
        let dir = tempdir().unwrap();
        let path = write_template(dir.path(), &UTILS_TS).unwrap();
        assert_eq!(path, dir.path().join("src").join("lib").join("utils.ts"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), UTILS_TS.contents);
    }

    #[test]
    fn test_write_overwrites_existing() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<p>old</p>").unwrap();
        write_template(dir.path(), &INDEX_HTML).unwrap();
        let written = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert_eq!(written, INDEX_HTML.contents);
    }

    #[test]
    fn test_write_fails_when_parent_is_a_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("src"), "not a directory").unwrap();
        let err = write_template(dir.path(), &APP_TSX).unwrap_err();
        assert!(matches!(err, ScaffoldError::TemplateWrite { .. }));
    }

    #[test]
    fn test_templates_are_distinct_and_wired() {
        let mut paths: Vec<&str> = ALL.iter().map(|t| t.path).collect();
        paths.sort_unstable();
        paths.dedup();
        assert_eq!(paths.len(), ALL.len());

        assert!(MAIN_TSX.contents.contains("./styles/globals.css"));
        assert!(UTILS_TS.contents.contains("export function cn"));
        assert!(TAILWIND_CONFIG.contents.contains("tailwindcss-animate"));
        assert!(GITIGNORE.contents.contains("node_modules/"));
    }
}
