//! Short code generation.
//!
//! Codes are [`CODE_LENGTH`] characters drawn from a 62-symbol alphabet using
//! the operating system's cryptographically secure random source.
//!
//! # Distribution
//!
//! Every output character consumes two random bytes, read as a big-endian `u16`
//! and reduced modulo 62. Since `65536 % 62 == 2`, the first two alphabet symbols
//! are picked with probability `1058/65536` instead of `1057/65536`. The bias is
//! below 0.1% per symbol and is accepted for short link codes.

/// Number of characters in every generated short code.
pub const CODE_LENGTH: usize = 5;

/// Symbols a short code is built from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors raised while generating a short code.
#[derive(Debug, thiserror::Error)]
pub enum CodeGenError {
    #[error("random source unavailable: {0}")]
    RandomSource(#[from] getrandom::Error),
}

/// Source of fresh short codes.
///
/// The production implementation is [`RandomCodeGenerator`]; tests swap in a
/// mock to force collisions or random source failures.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a new candidate code. Uniqueness is not guaranteed.
    fn generate(&self) -> Result<String, CodeGenError>;
}

/// [`CodeGenerator`] backed by the OS random number generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> Result<String, CodeGenError> {
        generate_code()
    }
}

/// Generates a random short code.
///
/// # Errors
///
/// Returns [`CodeGenError::RandomSource`] if the system random number generator
/// cannot be read. There is no fallback to a weaker source.
pub fn generate_code() -> Result<String, CodeGenError> {
    let mut buffer = [0u8; CODE_LENGTH * 2];
    getrandom::fill(&mut buffer)?;

    Ok(encode(&buffer))
}

/// Maps random bytes onto the alphabet, two bytes per output character.
fn encode(bytes: &[u8; CODE_LENGTH * 2]) -> String {
    bytes
        .chunks_exact(2)
        .map(|pair| {
            let value = u16::from_be_bytes([pair[0], pair[1]]) as usize;
            ALPHABET[value % ALPHABET.len()] as char
        })
        .collect()
}

/// Returns true if `code` has the exact shape of a generated code.
pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| ALPHABET.contains(&b))
}
