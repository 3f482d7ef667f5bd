use tracing::debug;

use super::archive::TemplateEntry;
use crate::core::error::GenerateError;

/// Root folder names the template ships under, by download method.
pub const KNOWN_ROOTS: [&str; 3] = [
    "universal-mod-template-master",
    "universal-mod-template-main",
    "universal-mod-template",
];

/// Find the single top-level folder the template content lives in.
///
/// Known names win; then the first top-level directory entry; then the
/// leading folder of the first entry's path.
pub fn detect_root(entries: &[TemplateEntry], known_roots: &[String]) -> Result<String, GenerateError> {
    for name in known_roots {
        let prefix = format!("{}/", name);
        if entries.iter().any(|e| e.path.starts_with(&prefix)) {
            debug!("Using known template root: {}", name);
            return Ok(name.clone());
        }
    }

    let top_level_dir = entries
        .iter()
        .filter(|e| e.is_directory)
        .map(|e| e.path.trim_end_matches('/'))
        .find(|name| !name.is_empty() && !name.contains('/'));
    if let Some(name) = top_level_dir {
        debug!("Using detected template root: {}", name);
        return Ok(name.to_string());
    }

    let first_segment = entries
        .first()
        .and_then(|e| e.path.split_once('/'))
        .map(|(head, _)| head)
        .filter(|head| !head.is_empty());
    match first_segment {
        Some(name) => {
            debug!("Using template root from first entry: {}", name);
            Ok(name.to_string())
        }
        None => Err(GenerateError::RootNotFound),
    }
}

/// Path of `path` below `root`, or `None` for the root marker itself and
/// for entries outside the root.
pub fn relative_to<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    path.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|rest| !rest.is_empty())
}
