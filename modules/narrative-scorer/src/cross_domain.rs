//! CrossDomain: rewards narratives that are corroborated both onchain and
//! offchain, with a secondary bonus for offchain-subtype spread (spec §4.3).

/// `n_on`/`n_off` are onchain/offchain member counts; `distinct_offchain_tags`
/// is how many distinct offchain `SourceTag`s appear; `subtype_cap` is the
/// count at which the spread term saturates (spec default: 3).
pub fn cross_domain(n_on: usize, n_off: usize, distinct_offchain_tags: usize, subtype_cap: f64) -> f64 {
    if n_on == 0 || n_off == 0 {
        return 0.0;
    }
    let balance = 2.0 * (n_on.min(n_off) as f64) / ((n_on + n_off) as f64);
    let spread = (distinct_offchain_tags as f64 / subtype_cap).min(1.0);
    0.7 * balance + 0.3 * spread
}
