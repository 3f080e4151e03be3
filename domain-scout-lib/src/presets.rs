//! Built-in TLD presets for candidate generation.
//!
//! A preset is a named, ordered zone list. Order matters: it is the order in
//! which candidates are generated and therefore the tie-break order when
//! results are later de-duplicated.

use std::collections::HashMap;

/// Name of the preset used when nothing else is configured.
pub const DEFAULT_PRESET: &str = "popular";

/// The default, ordered TLD list (a dozen common zones).
pub fn default_tlds() -> Vec<String> {
    get_preset_tlds(DEFAULT_PRESET).unwrap_or_else(|| vec!["com".to_string()])
}

/// Get a built-in preset by name (case-insensitive).
///
/// # Examples
///
/// ```rust
/// use domain_scout_lib::get_preset_tlds;
///
/// let tlds = get_preset_tlds("classic").unwrap();
/// assert_eq!(tlds[0], "com");
/// ```
pub fn get_preset_tlds(preset: &str) -> Option<Vec<String>> {
    let tlds: Option<Vec<&str>> = match preset.to_lowercase().as_str() {
        "popular" => Some(vec![
            "com", "net", "org", "io", "co", "ai", "app", "dev", "me", "xyz", "tech", "info",
        ]),
        "classic" => Some(vec!["com", "net", "org", "info", "biz"]),
        "startup" => Some(vec!["com", "io", "ai", "app", "dev", "co", "xyz"]),
        "country" => Some(vec!["us", "uk", "de", "fr", "ca", "au", "nl", "in"]),
        "creative" => Some(vec!["design", "art", "studio", "media", "ink"]),
        "shop" | "ecommerce" => Some(vec!["shop", "store", "market", "sale", "buy"]),
        _ => None,
    };
    tlds.map(|v| v.into_iter().map(String::from).collect())
}

/// Resolve a preset, checking user-defined presets first.
pub fn get_preset_tlds_with_custom(
    preset: &str,
    custom_presets: Option<&HashMap<String, Vec<String>>>,
) -> Option<Vec<String>> {
    let preset_lower = preset.to_lowercase();

    if let Some(custom_map) = custom_presets {
        if let Some(custom_tlds) = custom_map
            .get(preset)
            .or_else(|| custom_map.get(&preset_lower))
        {
            return Some(custom_tlds.clone());
        }
    }

    get_preset_tlds(&preset_lower)
}

/// Names of the built-in presets, sorted.
pub fn get_available_presets() -> Vec<&'static str> {
    vec!["classic", "country", "creative", "popular", "shop", "startup"]
}

/// Normalize a TLD list: trim, lowercase, strip leading dots, drop empties
/// and duplicates while keeping first-seen order.
pub fn normalize_tlds<S: AsRef<str>>(tlds: &[S]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tlds.iter()
        .map(|t| t.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// A TLD entry is a short run of ASCII letters, digits and hyphens.
pub fn is_valid_tld(tld: &str) -> bool {
    !tld.is_empty()
        && tld.len() <= 63
        && !tld.starts_with('-')
        && !tld.ends_with('-')
        && tld.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tlds() {
        let tlds = default_tlds();
        assert_eq!(tlds.len(), 12);
        assert_eq!(tlds[0], "com");
        assert_eq!(tlds[1], "net");
    }

    #[test]
    fn test_preset_case_insensitive() {
        assert_eq!(get_preset_tlds("CLASSIC"), get_preset_tlds("classic"));
        assert_eq!(get_preset_tlds("shop"), get_preset_tlds("ecommerce"));
        assert!(get_preset_tlds("nope").is_none());
    }

    #[test]
    fn test_all_presets_valid() {
        for name in get_available_presets() {
            let tlds = get_preset_tlds(name).unwrap();
            assert!(!tlds.is_empty(), "preset '{}' is empty", name);
            assert!(tlds.iter().all(|t| is_valid_tld(t)), "preset '{}' has a bad TLD", name);
        }
    }

    #[test]
    fn test_custom_preset_wins() {
        let mut custom = HashMap::new();
        custom.insert("classic".to_string(), vec!["dev".to_string()]);
        assert_eq!(
            get_preset_tlds_with_custom("classic", Some(&custom)),
            Some(vec!["dev".to_string()])
        );
        assert_eq!(
            get_preset_tlds_with_custom("startup", Some(&custom)),
            get_preset_tlds("startup")
        );
    }

    #[test]
    fn test_normalize_tlds() {
        let tlds = normalize_tlds(&[" .COM", "net", "", "com", "io "]);
        assert_eq!(tlds, vec!["com", "net", "io"]);
    }

    #[test]
    fn test_is_valid_tld() {
        assert!(is_valid_tld("com"));
        assert!(is_valid_tld("xn--p1ai"));
        assert!(!is_valid_tld(""));
        assert!(!is_valid_tld("co.uk"));
        assert!(!is_valid_tld("-com"));
    }
}
