/// Java major version needed to build a mod for `minecraft_version`.
///
/// Releases before 1.12 natively targeted Java 5 and 6, but the downgrade
/// toolchain used by the template cannot emit those, so they stay on 8.
pub fn required_java_for_minecraft_version(minecraft_version: &str) -> u32 {
    let mut parts = minecraft_version.split('.');
    let major = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);
    let minor = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);
    let patch = parts
        .next()
        .and_then(|p| p.parse::<u32>().ok())
        .unwrap_or(0);

    match (major, minor) {
        (0, _) | (1, 0..=5) => 8,
        (1, 6..=11) => 8,
        (1, 12..=16) => 8,
        (1, 17) => 16,
        (1, 18..=19) => 17,
        (1, 20) if patch <= 4 => 17,
        _ => 21,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn java_required_by_minecraft_version() {
        assert_eq!(required_java_for_minecraft_version("1.16.5"), 8);
        assert_eq!(required_java_for_minecraft_version("1.17"), 16);
        assert_eq!(required_java_for_minecraft_version("1.20.4"), 17);
        assert_eq!(required_java_for_minecraft_version("1.20.6"), 21);
        assert_eq!(required_java_for_minecraft_version("1.8"), 8);
    }

    #[test]
    fn legacy_bands_are_pinned_to_java_8() {
        assert_eq!(required_java_for_minecraft_version("1.5.2"), 8);
        assert_eq!(required_java_for_minecraft_version("1.6.1"), 8);
        assert_eq!(required_java_for_minecraft_version("1.11.2"), 8);
        assert_eq!(required_java_for_minecraft_version("0.30"), 8);
    }

    #[test]
    fn band_edges() {
        assert_eq!(required_java_for_minecraft_version("1.17.1"), 16);
        assert_eq!(required_java_for_minecraft_version("1.18"), 17);
        assert_eq!(required_java_for_minecraft_version("1.20"), 17);
        assert_eq!(required_java_for_minecraft_version("1.20.5"), 21);
        assert_eq!(required_java_for_minecraft_version("1.21"), 21);
        assert_eq!(required_java_for_minecraft_version("2.0"), 21);
    }
}
