//! Index name generation.

use rand::Rng;

/// Length of the random suffix appended to index names.
pub const INDEX_SUFFIX_LEN: usize = 8;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Derive an index name of the form `{base}-{suffix}`.
///
/// The suffix is drawn uniformly from lowercase letters and digits. Uniqueness
/// is probabilistic; neither the store nor the vendor is consulted.
pub fn unique_index_name(base: &str) -> String {
    unique_index_name_with(&mut rand::thread_rng(), base)
}

/// Same as [`unique_index_name`] with a caller-supplied RNG.
pub fn unique_index_name_with<R: Rng + ?Sized>(rng: &mut R, base: &str) -> String {
    let suffix: String = (0..INDEX_SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("{}-{}", base, suffix)
}
