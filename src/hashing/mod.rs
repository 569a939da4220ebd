use blake3::Hasher;

/// Computes the analysis-cache key for a content pair plus request options.
///
/// Field separators prevent ambiguity between adjacent inputs; the options
/// fingerprint is included so a different language/strategy hint never reuses
/// a stale analysis.
#[inline]
pub fn hash_analysis_key(content1: &str, content2: &str, options_fingerprint: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(content1.as_bytes());
    hasher.update(b"|");
    hasher.update(content2.as_bytes());
    hasher.update(b"|");
    hasher.update(options_fingerprint.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Computes the embedding-cache key for a content + model pair.
///
/// The model name participates so switching embedding models never serves
/// vectors from the wrong space.
#[inline]
pub fn hash_embedding_key(content: &str, model: &str) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(content.as_bytes());
    hasher.update(b"|");
    hasher.update(model.as_bytes());
    *hasher.finalize().as_bytes()
}

/// Hex-encodes a 32-byte hash for use as a string cache key.
#[inline]
pub fn hash_to_hex(hash: &[u8; 32]) -> String {
    let mut out = String::with_capacity(64);
    for byte in hash {
        out.push_str(&format!("{:02x}", byte));
    }
    out
}

/// Computes a 64-bit content fingerprint, truncated from a 256-bit BLAKE3
/// hash.
///
/// 64 bits is plenty for in-memory dedup pre-checks; collisions degrade to a
/// recomputation, never to a wrong score.
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let bytes: [u8; 8] = hash.as_bytes()[0..8]
        .try_into()
        .expect("BLAKE3 always produces at least 8 bytes");
    u64::from_le_bytes(bytes)
}
