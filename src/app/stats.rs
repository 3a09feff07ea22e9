use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use std::fmt;
use tiktoken_rs::CoreBPE;

/// BPE encodings available for the token estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenEncoding {
    #[default]
    #[value(name = "cl100k_base")]
    Cl100kBase,
    #[value(name = "p50k_base")]
    P50kBase,
    #[value(name = "r50k_base")]
    R50kBase,
    #[value(name = "o200k_base")]
    O200kBase,
}

impl TokenEncoding {
    fn load(self) -> Result<CoreBPE> {
        let bpe = match self {
            TokenEncoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            TokenEncoding::P50kBase => tiktoken_rs::p50k_base(),
            TokenEncoding::R50kBase => tiktoken_rs::r50k_base(),
            TokenEncoding::O200kBase => tiktoken_rs::o200k_base(),
        };
        bpe.with_context(|| format!("Failed to load {} encoding", self))
    }

    pub fn count_tokens(self, text: &str) -> Result<usize> {
        Ok(self.load()?.encode_with_special_tokens(text).len())
    }
}

impl fmt::Display for TokenEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenEncoding::Cl100kBase => "cl100k_base",
            TokenEncoding::P50kBase => "p50k_base",
            TokenEncoding::R50kBase => "r50k_base",
            TokenEncoding::O200kBase => "o200k_base",
        };
        write!(f, "{}", name)
    }
}

/// Size figures printed after the document is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub lines: usize,
    pub chars: usize,
    pub bytes: usize,
    pub encoding: TokenEncoding,
    pub tokens: Option<usize>,
}

impl DocumentStats {
    pub fn measure(document: &str, encoding: TokenEncoding) -> Self {
        let tokens = match encoding.count_tokens(document) {
            Ok(count) => Some(count),
            Err(e) => {
                log::warn!("Could not count tokens: {:#}", e);
                None
            }
        };

        Self {
            lines: document.matches('\n').count(),
            chars: document.chars().count(),
            bytes: document.len(),
            encoding,
            tokens,
        }
    }
}

impl fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Summary Statistics:")?;
        writeln!(f, "Total Lines: {}", self.lines)?;
        writeln!(f, "Total Characters: {}", self.chars)?;
        writeln!(f, "Total Bytes: {}", self.bytes)?;
        match self.tokens {
            Some(tokens) => writeln!(f, "Approximate Tokens ({}): {}", self.encoding, tokens),
            None => writeln!(f, "Approximate Tokens ({}): unavailable", self.encoding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_lines_chars_and_bytes() {
        let stats = DocumentStats::measure("héllo\nwörld\n", TokenEncoding::Cl100kBase);
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.chars, 12);
        assert_eq!(stats.bytes, 14);
    }

    #[test]
    fn token_count_is_reported() {
        let stats = DocumentStats::measure("fn main() { println!(\"hi\"); }", TokenEncoding::default());
        let tokens = stats.tokens.expect("cl100k_base is bundled");
        assert!(tokens > 0 && tokens < 30);
    }

    #[test]
    fn every_encoding_loads() {
        for encoding in TokenEncoding::value_variants() {
            assert!(encoding.count_tokens("Hello, world!").unwrap() > 0);
        }
    }

    #[test]
    fn empty_document() {
        let stats = DocumentStats::measure("", TokenEncoding::P50kBase);
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.bytes, 0);
        assert_eq!(stats.tokens, Some(0));
    }

    #[test]
    fn report_layout() {
        let stats = DocumentStats {
            lines: 3,
            chars: 40,
            bytes: 41,
            encoding: TokenEncoding::R50kBase,
            tokens: None,
        };
        assert_eq!(
            stats.to_string(),
            "\nSummary Statistics:\nTotal Lines: 3\nTotal Characters: 40\nTotal Bytes: 41\nApproximate Tokens (r50k_base): unavailable\n"
        );
    }

    #[test]
    fn encoding_names_match_cli_values() {
        for encoding in TokenEncoding::value_variants() {
            let value = encoding.to_possible_value().unwrap();
            assert_eq!(value.get_name(), encoding.to_string());
        }
    }
}
