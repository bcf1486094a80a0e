use crate::pasranges_info::SiteRecord;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;

/// Ranks two sites of the same group: the higher expression wins; on ties, the smaller
/// `(chrom, position, strand)` tuple wins. Returns [Ordering::Greater] if `a` ranks above `b`.
pub fn rank_sites(a: &SiteRecord, b: &SiteRecord) -> Ordering {
    a.expression()
        .total_cmp(&b.expression())
        .then_with(|| {
            (b.chrom.as_str(), b.position, b.strand).cmp(&(a.chrom.as_str(), a.position, a.strand))
        })
}

/// Selects one representative record per group in a single pass.
///
/// Records are grouped by `key`. Within each group, the record ranking highest by [rank_sites] is
/// the representative. The result has one flag per input record, in input order, with exactly one
/// `true` per group. Since the ranking is a total order on expression and position, the selection
/// does not depend on the input order, except between records that agree on all of them.
///
/// ### Arguments
///
/// * `records`: all records; a group must be complete for its representative to be correct, so
///   partitioned inputs have to be merged before selecting.
/// * `key`: the grouping key of a record, e.g. its gene symbol.
pub fn select_representatives<K, F>(records: &[SiteRecord], key: F) -> Vec<bool>
where
    K: Eq + Hash,
    F: Fn(&SiteRecord) -> K,
{
    let mut best: HashMap<K, usize> = HashMap::new();
    for (idx, rec) in records.iter().enumerate() {
        best.entry(key(rec))
            .and_modify(|b| {
                if rank_sites(rec, &records[*b]) == Ordering::Greater {
                    *b = idx;
                }
            })
            .or_insert(idx);
    }

    let mut flags = vec![false; records.len()];
    for idx in best.values() {
        flags[*idx] = true;
    }
    // one representative per group, never zero
    assert_eq!(flags.iter().filter(|f| **f).count(), best.len());
    debug!(
        "selected {} representative sites out of {} records",
        best.len(),
        records.len()
    );
    flags
}

/// Marks the most expressed site of every gene in the `most_expressed` annotation of each record.
/// All records are kept.
pub fn flag_most_expressed(records: &mut [SiteRecord]) {
    let flags = select_representatives(records, |r| r.gene.clone());
    for (rec, flag) in records.iter_mut().zip(flags) {
        rec.annotations.most_expressed = Some(flag);
    }
}
