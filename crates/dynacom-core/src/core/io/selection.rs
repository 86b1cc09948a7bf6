use std::fmt;

/// A residue that took part in the analysis, identified by chain and residue number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueMember {
    pub chain_id: String,
    pub residue_number: i64,
}

impl ResidueMember {
    pub fn new(chain_id: impl Into<String>, residue_number: i64) -> Self {
        Self {
            chain_id: chain_id.into(),
            residue_number,
        }
    }

    /// Residue number immediately followed by chain id, e.g. `"12A"`.
    fn sort_key(&self) -> String {
        format!("{}{}", self.residue_number, self.chain_id)
    }
}

/// A run of consecutive residue numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResidueRange {
    Single(i64),
    Span(i64, i64),
}

impl ResidueRange {
    pub fn start(&self) -> i64 {
        match *self {
            Self::Single(n) | Self::Span(n, _) => n,
        }
    }

    pub fn end(&self) -> i64 {
        match *self {
            Self::Single(n) | Self::Span(_, n) => n,
        }
    }

    /// Every residue number covered by the range.
    pub fn numbers(&self) -> impl Iterator<Item = i64> {
        self.start()..=self.end()
    }
}

impl fmt::Display for ResidueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(n) => write!(f, "{n}"),
            Self::Span(start, end) => write!(f, "{start}-{end}"),
        }
    }
}

/// Sorts and deduplicates residue numbers, then collapses consecutive runs.
///
/// `[10, 11, 12, 15, 20, 21]` becomes `[Span(10, 12), Single(15), Span(20, 21)]`.
pub fn collapse_ranges(numbers: &[i64]) -> Vec<ResidueRange> {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut ranges = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return ranges;
    };

    let (mut start, mut end) = (first, first);
    for n in iter {
        if n == end + 1 {
            end = n;
        } else {
            ranges.push(range(start, end));
            (start, end) = (n, n);
        }
    }
    ranges.push(range(start, end));
    ranges
}

fn range(start: i64, end: i64) -> ResidueRange {
    if start == end {
        ResidueRange::Single(start)
    } else {
        ResidueRange::Span(start, end)
    }
}

/// The residues of one cluster, grouped by chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSelection {
    pub label: usize,
    pub chains: Vec<(String, Vec<ResidueRange>)>,
}

/// Groups members by cluster label, then by chain, collapsing residue numbers into ranges.
///
/// Clusters appear in order of first appearance in `labels`. Within a cluster, chains
/// appear in the order they first occur among the member keys `"{number}{chain}"` sorted
/// as strings, so that output matches existing selection scripts.
///
/// `labels` and `members` are paired by position; any surplus on either side is ignored.
pub fn group_by_cluster(labels: &[usize], members: &[ResidueMember]) -> Vec<ClusterSelection> {
    let mut clusters: Vec<(usize, Vec<&ResidueMember>)> = Vec::new();
    for (&label, member) in labels.iter().zip(members) {
        match clusters.iter_mut().find(|(l, _)| *l == label) {
            Some((_, list)) => list.push(member),
            None => clusters.push((label, vec![member])),
        }
    }

    clusters
        .into_iter()
        .map(|(label, mut list)| {
            list.sort_by_cached_key(|m| m.sort_key());

            let mut chains: Vec<(String, Vec<i64>)> = Vec::new();
            for member in list {
                match chains.iter_mut().find(|(id, _)| *id == member.chain_id) {
                    Some((_, numbers)) => numbers.push(member.residue_number),
                    None => chains.push((member.chain_id.clone(), vec![member.residue_number])),
                }
            }

            ClusterSelection {
                label,
                chains: chains
                    .into_iter()
                    .map(|(id, numbers)| (id, collapse_ranges(&numbers)))
                    .collect(),
            }
        })
        .collect()
}

/// Builds a PyMOL selection line with every residue number listed explicitly.
///
/// `[Span(10, 12), Single(15)]` on chain `A` gives `select resi +10+11+12+15 and chain A`.
pub fn selection_command(ranges: &[ResidueRange], chain: &str) -> String {
    let mut command = String::from("select resi ");
    for n in ranges.iter().flat_map(ResidueRange::numbers) {
        command.push('+');
        command.push_str(&n.to_string());
    }
    command.push_str(" and chain ");
    command.push_str(chain);
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use ResidueRange::{Single, Span};

    #[test]
    fn collapse_ranges_run_length_encodes_consecutive_numbers() {
        assert_eq!(
            collapse_ranges(&[10, 11, 12, 15, 20, 21]),
            vec![Span(10, 12), Single(15), Span(20, 21)]
        );
    }

    #[test]
    fn collapse_ranges_sorts_and_deduplicates() {
        assert_eq!(collapse_ranges(&[3, 1, 2, 2, -1]), vec![Single(-1), Span(1, 3)]);
        assert!(collapse_ranges(&[]).is_empty());
    }

    #[test]
    fn range_display_and_expansion() {
        assert_eq!(Span(4, 6).to_string(), "4-6");
        assert_eq!(Single(9).to_string(), "9");
        assert_eq!(Span(4, 6).numbers().collect::<Vec<_>>(), vec![4, 5, 6]);
    }

    #[test]
    fn selection_command_expands_spans() {
        assert_eq!(
            selection_command(&[Span(10, 12), Single(15)], "A"),
            "select resi +10+11+12+15 and chain A"
        );
    }

    #[test]
    fn group_by_cluster_orders_clusters_by_first_appearance() {
        let members = vec![
            ResidueMember::new("A", 1),
            ResidueMember::new("A", 2),
            ResidueMember::new("A", 3),
            ResidueMember::new("A", 4),
        ];
        let groups = group_by_cluster(&[2, 1, 1, 2], &members);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, 2);
        assert_eq!(groups[0].chains, vec![("A".to_string(), vec![Single(1), Single(4)])]);
        assert_eq!(groups[1].label, 1);
        assert_eq!(groups[1].chains, vec![("A".to_string(), vec![Span(2, 3)])]);
    }

    #[test]
    fn group_by_cluster_orders_chains_by_sorted_member_keys() {
        // Keys sort as "10B" < "5A", so chain B is listed first.
        let members = vec![ResidueMember::new("A", 5), ResidueMember::new("B", 10)];
        let groups = group_by_cluster(&[1, 1], &members);
        let chain_order: Vec<_> = groups[0].chains.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(chain_order, vec!["B", "A"]);
    }
}
