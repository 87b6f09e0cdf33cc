//! Country Ranking - top-N selection over aggregated counts
//!
//! Pure domain service turning a label→count table into the ordered
//! result both the config and fetch paths emit.

use crate::domain::entities::CountryCount;
use std::collections::HashMap;

/// Select the `max_n` most frequent labels from `counts`.
///
/// Selection ranks by count descending with ties broken by label
/// ascending, so equal counts at the cutoff resolve the same way on
/// every run. The selected set is returned sorted by label ascending,
/// which is the presentation order of the emitted metrics.
pub fn select_top(counts: HashMap<String, u64>, max_n: usize) -> Vec<CountryCount> {
    let mut ranked: Vec<CountryCount> = counts
        .into_iter()
        .map(|(country, count)| CountryCount { country, count })
        .collect();

    ranked.sort_unstable_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    ranked.truncate(max_n);

    ranked.sort_unstable_by(|a, b| a.country.cmp(&b.country));
    ranked
}
