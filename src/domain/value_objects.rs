//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

/// Label under which relays whose address yields no geolocation match
/// are counted.
///
/// The sentinel participates in top-N ranking like any real country.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Normalize a raw country name into a label safe for the munin protocol.
///
/// Munin field names cannot carry spaces or apostrophes, and comma
/// qualifiers ("Taiwan, Province of China") collapse to the prefix
/// before the comma.
///
/// # Examples
/// ```
/// use tor_munin::domain::value_objects::simplify;
///
/// assert_eq!(simplify("United States"), "United_States");
/// assert_eq!(simplify("Taiwan, Province of China"), "Taiwan");
/// ```
pub fn simplify(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| if c == ' ' || c == '\'' { '_' } else { c })
        .collect();

    match cleaned.split_once(',') {
        Some((prefix, _)) => prefix.to_string(),
        None => cleaned,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_replaces_spaces() {
        assert_eq!(simplify("United States"), "United_States");
    }

    #[test]
    fn test_simplify_truncates_at_comma() {
        assert_eq!(simplify("Taiwan, Province of China"), "Taiwan");
        assert_eq!(simplify("Korea, Republic of"), "Korea");
    }

    #[test]
    fn test_simplify_replaces_apostrophes() {
        assert_eq!(simplify("Côte d'Ivoire"), "Côte_d_Ivoire");
    }

    #[test]
    fn test_simplify_empty_string() {
        assert_eq!(simplify(""), "");
    }

    #[test]
    fn test_simplify_plain_name_unchanged() {
        assert_eq!(simplify("Germany"), "Germany");
    }

    #[test]
    fn test_simplify_unicode_preserved() {
        assert_eq!(simplify("São Tomé and Príncipe"), "São_Tomé_and_Príncipe");
    }

    #[test]
    fn test_simplify_output_is_metric_safe() {
        let inputs = [
            "United States",
            "Taiwan, Province of China",
            "Côte d'Ivoire",
            "Lao People's Democratic Republic",
            "Bonaire, Sint Eustatius and Saba",
            "",
        ];

        for input in inputs {
            let label = simplify(input);
            assert!(!label.contains(' '), "space in {:?}", label);
            assert!(!label.contains('\''), "apostrophe in {:?}", label);
            assert!(!label.contains(','), "comma in {:?}", label);
        }
    }
}
