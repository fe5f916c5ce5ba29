use sha2::{Digest, Sha256};

/// Stable short identifier for a normalized signature.
///
/// First 12 hex chars of sha256 over the signature text. Identical
/// signatures produce identical ids across runs, which is what downstream
/// dedup ("is there already an issue for this group today") keys off.
pub fn signature_id(signature: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(signature.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}

/// Truncate a string to at most `max` characters.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}
