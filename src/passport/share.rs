use std::fmt::Display;

use chrono::NaiveDate;
use rand::{Rng, distr::Alphanumeric};
use serde::{Deserialize, Serialize};

use crate::shared::Locale;

/// 22 base62 characters, roughly 131 bits of entropy.
pub const SHARE_HASH_LEN: usize = 22;
const MAX_SHARE_HASH_LEN: usize = 64;

/// Opaque token used in public passport links.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareHash(String);

impl ShareHash {
    /// Fresh token from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let token = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SHARE_HASH_LEN)
            .map(char::from)
            .collect();
        Self(token)
    }

    /// Accepts tokens found in links, including shorter legacy ones.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let well_formed = !value.is_empty()
            && value.len() <= MAX_SHARE_HASH_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        well_formed.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `{base_url}/{locale}/passport/view/{hash}`
    pub fn url(&self, base_url: &str, locale: Locale) -> String {
        format!(
            "{}/{}/passport/view/{}",
            base_url.trim_end_matches('/'),
            locale,
            self.0
        )
    }

    /// Text handed to the barcode encoder: `CP-{YYYYMMDD}-{HASH8}`.
    pub fn barcode_payload(&self, travel_date: NaiveDate) -> String {
        let prefix: String = self.0.chars().take(8).collect();
        format!(
            "CP-{}-{}",
            travel_date.format("%Y%m%d"),
            prefix.to_ascii_uppercase()
        )
    }
}

impl Display for ShareHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
