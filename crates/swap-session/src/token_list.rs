//! Static token catalog, loaded once and never mutated.

use alloy_primitives::Address;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

/// Immutable token value. Identity is the address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub address: Address,
    pub chain_id: u64,
    pub coingecko_id: String,
    pub decimals: u32,
    #[serde(rename = "logoURI")]
    pub logo_uri: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to read token list {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("token list is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

pub struct TokenCatalog {
    tokens: Vec<Token>,
}

static BUNDLED: OnceLock<TokenCatalog> = OnceLock::new();

impl TokenCatalog {
    /// The catalog shipped with the crate, mainnet tokens that pair with the
    /// native wrapped asset.
    pub fn bundled() -> &'static TokenCatalog {
        BUNDLED.get_or_init(|| {
            TokenCatalog::from_json(include_str!("tokens.json"))
                .expect("bundled token list is valid")
        })
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let tokens: Vec<Token> = serde_json::from_str(text)?;
        Ok(Self { tokens })
    }

    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(&path).map_err(|e| CatalogError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;
        Self::from_json(&text)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn find_by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.tokens.iter().find(|t| t.symbol == symbol)
    }

    pub fn find_by_address(&self, address: Address) -> Option<&Token> {
        self.tokens.iter().find(|t| t.address == address)
    }

    /// Tokens selectable opposite the given one. One side of every pair must
    /// be the native wrapped asset until token-to-token swaps are enabled.
    pub fn selectable(&self, opposite: Option<&Token>, native_symbol: &str) -> Vec<&Token> {
        if opposite.map(|t| t.symbol == native_symbol).unwrap_or(false) {
            self.tokens.iter().filter(|t| t.symbol != native_symbol).collect()
        } else {
            self.tokens.iter().filter(|t| t.symbol == native_symbol).collect()
        }
    }
}
