use std::hash::Hasher;

use anyhow::{Result, bail};
use twox_hash::XxHash64;

/// A resolved CLI seed and the token it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// Phrase as typed, for hashed seeds.
    pub phrase: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, phrase: None }
    }

    #[must_use]
    pub fn from_phrase(phrase: &str) -> Self {
        Self {
            seed: phrase_seed(phrase),
            phrase: Some(phrase.to_string()),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        match &self.phrase {
            Some(phrase) => format!("{phrase} ({})", self.seed),
            None => self.seed.to_string(),
        }
    }
}

/// Stable seed for a free-form phrase.
#[must_use]
pub fn phrase_seed(phrase: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(phrase.trim().to_ascii_lowercase().as_bytes());
    hasher.finish()
}

/// Resolve CLI seed tokens.
///
/// Accepts decimal integers (negative values use their magnitude), `0x` hex
/// literals and `phrase:<text>` tokens hashed to a seed. Duplicates are
/// dropped, keeping first-seen order.
///
/// # Errors
///
/// Returns an error for a token that matches none of those forms.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved: Vec<SeedInfo> = Vec::new();

    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
        {
            match u64::from_str_radix(&hex.replace('_', ""), 16) {
                Ok(value) => SeedInfo::from_numeric(value),
                Err(_) => bail!("Unrecognized seed token: {token}"),
            }
        } else if let Some(phrase) = token.strip_prefix("phrase:") {
            if phrase.trim().is_empty() {
                bail!("Empty seed phrase");
            }
            SeedInfo::from_phrase(phrase)
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if !resolved.iter().any(|existing| existing.seed == info.seed) {
            resolved.push(info);
        }
    }

    if resolved.is_empty() {
        bail!("No seeds provided");
    }
    Ok(resolved)
}
