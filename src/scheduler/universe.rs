//! Token universe assembly for one evaluation cycle.

use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{FALLBACK_TOKEN_SLICE, MAX_DIVERSITY_TOKENS, MAX_UNIVERSE_TOKENS};

use super::traits::{DiscoveredToken, TokenDiscovery};

/// The bounded token set considered for signal generation in one cycle.
///
/// Ordered, address-deduplicated (case-insensitive), at most
/// [`MAX_UNIVERSE_TOKENS`] entries. Built fresh every cycle.
#[derive(Debug, Clone, Default)]
pub struct TokenUniverse {
    tokens: Vec<String>,
    discovered: usize,
    metadata: HashMap<String, DiscoveredToken>,
}

impl TokenUniverse {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// How many tokens discovery returned, before dedup and truncation.
    pub fn discovered_count(&self) -> usize {
        self.discovered
    }

    /// Discovery metadata for a token, matched case-insensitively.
    pub fn metadata_for(&self, address: &str) -> Option<&DiscoveredToken> {
        self.metadata.get(&address.to_lowercase())
    }
}

/// Assembles the per-cycle token universe from discovery output, caller
/// input, and a diversity sample.
pub struct UniverseBuilder {
    discovery: Arc<dyn TokenDiscovery>,
    default_tokens: Vec<String>,
    diversity_tokens: Vec<String>,
}

impl UniverseBuilder {
    pub fn new(
        discovery: Arc<dyn TokenDiscovery>,
        default_tokens: Vec<String>,
        diversity_tokens: Vec<String>,
    ) -> Self {
        Self {
            discovery,
            default_tokens,
            diversity_tokens,
        }
    }

    /// Build the universe for one cycle.
    ///
    /// Discovery failure is logged and treated as an empty result; this
    /// never fails the cycle.
    pub async fn build(&self, requested: Option<&[String]>) -> TokenUniverse {
        let seed = requested.unwrap_or(&[]);

        let discovered = match self.discovery.discover(seed).await {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!("Token discovery failed, continuing with fallback: {e}");
                Vec::new()
            }
        };
        let discovered_count = discovered.len();

        let mut tokens: Vec<String> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut metadata: HashMap<String, DiscoveredToken> = HashMap::new();

        if !discovered.is_empty() {
            for token in discovered {
                let key = token.address.to_lowercase();
                if seen.insert(key.clone()) {
                    tokens.push(token.address.clone());
                    metadata.insert(key, token);
                }
            }
        } else {
            // Fallback: caller-supplied tokens, else a slice of the defaults.
            let fallback: Vec<&String> = if !seed.is_empty() {
                seed.iter().collect()
            } else {
                self.default_tokens
                    .iter()
                    .take(FALLBACK_TOKEN_SLICE)
                    .collect()
            };
            for address in fallback {
                if seen.insert(address.to_lowercase()) {
                    tokens.push(address.clone());
                }
            }
        }

        for address in self.diversity_sample() {
            if seen.insert(address.to_lowercase()) {
                tokens.push(address);
            }
        }

        tokens.truncate(MAX_UNIVERSE_TOKENS);

        debug!(
            "Token universe assembled: {} tokens ({} discovered)",
            tokens.len(),
            discovered_count
        );

        TokenUniverse {
            tokens,
            discovered: discovered_count,
            metadata,
        }
    }

    /// Up to [`MAX_DIVERSITY_TOKENS`] tokens sampled from the secondary
    /// registry for venue/router diversity.
    fn diversity_sample(&self) -> Vec<String> {
        let mut rng = rand::thread_rng();
        self.diversity_tokens
            .choose_multiple(&mut rng, MAX_DIVERSITY_TOKENS)
            .cloned()
            .collect()
    }
}
