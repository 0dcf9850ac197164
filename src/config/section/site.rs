//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! alternatives = ["de", "fr"]   # Alts served under /<alt>/...
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Alternate/locale identifiers. Each becomes a URL prefix.
    pub alternatives: Vec<String>,
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_site_alternatives() {
        let config = test_parse_config("[site]\nalternatives = [\"de\", \"fr\"]");
        assert_eq!(config.site.alternatives, vec!["de", "fr"]);

        let config = test_parse_config("");
        assert!(config.site.alternatives.is_empty());
    }
}
