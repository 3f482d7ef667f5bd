pub const PACKAGE_PLACEHOLDER: &str = "com.examplemod";
pub const PACKAGE_PATH_PLACEHOLDER: &str = "com/examplemod";
pub const MOD_ID_PLACEHOLDER: &str = "examplemod";
pub const MOD_NAME_PLACEHOLDER: &str = "Example Mod";
pub const GAME_VERSION_PLACEHOLDER: &str = "1.21.5";

/// `com.example.mymod` -> `com/example/mymod`.
pub fn package_path(package_name: &str) -> String {
    package_name.replace('.', "/")
}

/// Replace every run of path segments equal to the placeholder package path
/// with `package_path`. Partial segments (`com/examplemodding`) are left alone.
pub fn rewrite_package_path(path: &str, package_path: &str) -> String {
    let placeholder: Vec<&str> = PACKAGE_PATH_PLACEHOLDER.split('/').collect();
    let segments: Vec<&str> = path.split('/').collect();

    let mut out: Vec<&str> = Vec::with_capacity(segments.len());
    let mut i = 0;
    while i < segments.len() {
        if segments[i..].starts_with(&placeholder) {
            out.push(package_path);
            i += placeholder.len();
        } else {
            out.push(segments[i]);
            i += 1;
        }
    }
    out.join("/")
}

/// Ordered literal replacement table.
///
/// Applied in a single left-to-right scan: at each position the first
/// placeholder in table order that matches is replaced, and replacement text
/// is never scanned again.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    pairs: Vec<(&'static str, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: &'static str, replacement: impl Into<String>) -> Self {
        self.pairs.push((placeholder, replacement.into()));
        self
    }

    /// The template's table, in its fixed order.
    pub fn for_mod(
        package_name: &str,
        mod_id: &str,
        mod_name: &str,
        game_version: Option<&str>,
    ) -> Self {
        let table = Self::new()
            .with(PACKAGE_PLACEHOLDER, package_name)
            .with(PACKAGE_PATH_PLACEHOLDER, package_path(package_name))
            .with(MOD_ID_PLACEHOLDER, mod_id)
            .with(MOD_NAME_PLACEHOLDER, mod_name);
        match game_version {
            Some(id) => table.with(GAME_VERSION_PLACEHOLDER, id),
            None => table,
        }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        'scan: while let Some(ch) = rest.chars().next() {
            for (placeholder, replacement) in &self.pairs {
                if rest.starts_with(placeholder) {
                    out.push_str(replacement);
                    rest = &rest[placeholder.len()..];
                    continue 'scan;
                }
            }
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }

        out
    }
}
