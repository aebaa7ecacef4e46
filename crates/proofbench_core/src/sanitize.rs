//! Input sanitization before anything reaches the symbolic sandbox
//!
//! Purely lexical: no knowledge of mathematical meaning.

use crate::error::SanitizeError;

pub const MAX_EXPR_LENGTH: usize = 500;
pub const MAX_CLAIM_LENGTH: usize = 1000;

const BLOCKED_PATTERNS: &[&str] = &["eval", "exec", "import", "__", "subprocess"];

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '+' | '-' | '*' | '/' | '^' | '(' | ')' | '.' | ',' | '_' | '='
        )
}

/// Validate an algebraic expression and return it trimmed
pub fn sanitize_expr(expr: &str) -> Result<String, SanitizeError> {
    let trimmed = expr.trim();

    if trimmed.is_empty() {
        return Err(SanitizeError::Empty);
    }

    if trimmed.chars().count() > MAX_EXPR_LENGTH {
        return Err(SanitizeError::TooLong {
            max: MAX_EXPR_LENGTH,
        });
    }

    if !trimmed.chars().all(is_allowed_char) {
        return Err(SanitizeError::InvalidCharacters);
    }

    let lowered = trimmed.to_lowercase();
    if let Some(pattern) = BLOCKED_PATTERNS
        .iter()
        .copied()
        .find(|p| lowered.contains(p))
    {
        return Err(SanitizeError::DisallowedPattern(pattern));
    }

    Ok(trimmed.to_string())
}

/// Trim a natural-language claim and cap its length
pub fn sanitize_claim(claim: &str) -> String {
    claim.trim().chars().take(MAX_CLAIM_LENGTH).collect()
}
