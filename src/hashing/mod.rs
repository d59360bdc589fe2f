//! Query normalization and content hashing for cache keys.

/// Normalizes a query for fingerprinting: lowercased, surrounding whitespace removed.
///
/// Inner whitespace and punctuation are preserved, so `"Paris?"` and `"Paris ?"` stay
/// distinct.
#[inline]
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase().trim().to_string()
}

/// Returns the 32-byte BLAKE3 hash of the normalized query.
#[inline]
pub fn hash_query(query: &str) -> [u8; 32] {
    *blake3::hash(normalize_query(query).as_bytes()).as_bytes()
}

/// Returns the BLAKE3 hash of the normalized query as 64 lowercase hex characters.
#[inline]
pub fn hash_query_hex(query: &str) -> String {
    blake3::hash(normalize_query(query).as_bytes())
        .to_hex()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_normalize_query_lowercases_and_trims() {
        assert_eq!(normalize_query("  Paris?  "), "paris?");
        assert_eq!(normalize_query("\tWHAT IS RUST\n"), "what is rust");
    }

    #[test]
    fn test_normalize_query_keeps_inner_whitespace() {
        assert_eq!(normalize_query("a  b"), "a  b");
    }

    #[test]
    fn test_hash_query_case_and_whitespace_insensitive() {
        assert_eq!(hash_query("Paris?"), hash_query(" paris? "));
        assert_eq!(hash_query("PARIS?"), hash_query("paris?\n"));
    }

    #[test]
    fn test_hash_query_uniqueness() {
        let queries = [
            "What is the capital of France?",
            "What is the capital of Germany?",
            "What is the capital of France",
            "What is the  capital of France?",
        ];

        let hashes: HashSet<_> = queries.iter().map(|q| hash_query(q)).collect();
        assert_eq!(hashes.len(), queries.len());
    }

    #[test]
    fn test_hash_query_unicode_lowercasing() {
        assert_eq!(hash_query("AÇÃO"), hash_query("ação"));
    }

    #[test]
    fn test_hash_query_hex_shape() {
        let hex = hash_query_hex("test");
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_query_hex_matches_raw_hash() {
        let raw = hash_query("Some Question");
        let hex = hash_query_hex("some question");
        let expected: String = raw.iter().map(|b| format!("{:02x}", b)).collect();
        assert_eq!(hex, expected);
    }

    #[test]
    fn test_hash_query_empty_string() {
        let hash = hash_query("   ");
        assert_eq!(hash, hash_query(""));
        assert!(!hash.iter().all(|&b| b == 0));
    }
}
