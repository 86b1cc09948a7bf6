//! Text and CSV output of community analyses.
//!
//! The text report lists, for every community count that was computed, one PyMOL
//! selection command per chain and cluster. Its layout is consumed by existing
//! visualisation scripts and must stay byte-stable.

use super::selection::{ResidueMember, group_by_cluster, selection_command};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

const ITERATION_RULE: &str = "#############################################################";
const CLUSTER_RULE: &str = "----------------------------------------------------------";

/// Formats a score the way Python's `repr` prints a float.
///
/// Integral values keep a trailing `.0`; magnitudes below `1e-4` or from `1e16` upwards
/// use exponent notation with a signed, at least two-digit exponent.
pub fn format_score(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{value:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{mantissa}e{sign}{digits:0>2}")
            }
            None => formatted,
        };
    }

    let formatted = format!("{value}");
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

/// Writes the selection report for every labelling, in ascending community count.
///
/// # Arguments
///
/// * `writer` - Destination of the report text.
/// * `labelings` - Cluster labels per requested community count, aligned with `members`.
/// * `scores` - Calinski–Harabasz scores; counts without a score print `NA`.
/// * `members` - The residue behind each label position.
///
/// # Errors
///
/// Returns any error raised by `writer`.
pub fn write_report<W: Write>(
    writer: &mut W,
    labelings: &BTreeMap<usize, Vec<usize>>,
    scores: &BTreeMap<usize, f64>,
    members: &[ResidueMember],
) -> io::Result<()> {
    for (&k, labels) in labelings {
        let distinct: BTreeSet<usize> = labels.iter().copied().collect();
        let score = scores
            .get(&k)
            .map_or_else(|| "NA".to_string(), |&s| format_score(s));

        write!(writer, "{ITERATION_RULE}\n\n")?;
        writeln!(writer, "Clustering iteration id - C{}", k.saturating_sub(1))?;
        writeln!(writer, "number of communities - {}", distinct.len())?;
        writeln!(writer, "CH Score - {score}")?;

        for cluster in group_by_cluster(labels, members) {
            write!(writer, "{CLUSTER_RULE}\n\n")?;
            write!(writer, "cluster {}\n\n", cluster.label)?;
            for (chain, ranges) in &cluster.chains {
                writeln!(writer, "{}", selection_command(ranges, chain))?;
            }
            write!(writer, "{CLUSTER_RULE}\n\n")?;
        }
    }
    writer.flush()
}

#[derive(Serialize)]
struct ScoreRow {
    community_count: usize,
    ch_score: f64,
}

/// Writes the `(community count, score)` table as CSV, ascending by count.
///
/// # Errors
///
/// Returns a [`csv::Error`] if serialization or the underlying writer fails.
pub fn write_scores_csv<W: Write>(writer: W, scores: &BTreeMap<usize, f64>) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (&community_count, &ch_score) in scores {
        csv_writer.serialize(ScoreRow {
            community_count,
            ch_score,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members() -> Vec<ResidueMember> {
        vec![
            ResidueMember::new("A", 1),
            ResidueMember::new("A", 2),
            ResidueMember::new("A", 3),
            ResidueMember::new("B", 1),
        ]
    }

    #[test]
    fn scores_print_like_python_floats() {
        assert_eq!(format_score(200.0), "200.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(12.345), "12.345");
        assert_eq!(format_score(-3.5), "-3.5");
        assert_eq!(format_score(1.5e-5), "1.5e-05");
        assert_eq!(format_score(1e16), "1e+16");
        assert_eq!(format_score(2.5e120), "2.5e+120");
        assert_eq!(format_score(f64::NAN), "nan");
    }

    #[test]
    fn report_lists_each_labelling_with_selection_lines() {
        let labelings = BTreeMap::from([(2, vec![1, 1, 2, 2]), (3, vec![1, 2, 3, 3])]);
        let scores = BTreeMap::from([(2, 12.5)]);
        let mut out = Vec::new();
        write_report(&mut out, &labelings, &scores, &members()).unwrap();

        let expected = "\
#############################################################

Clustering iteration id - C1
number of communities - 2
CH Score - 12.5
----------------------------------------------------------

cluster 1

select resi +1+2 and chain A
----------------------------------------------------------

----------------------------------------------------------

cluster 2

select resi +1 and chain B
select resi +3 and chain A
----------------------------------------------------------

#############################################################

Clustering iteration id - C2
number of communities - 3
CH Score - NA
----------------------------------------------------------

cluster 1

select resi +1 and chain A
----------------------------------------------------------

----------------------------------------------------------

cluster 2

select resi +2 and chain A
----------------------------------------------------------

----------------------------------------------------------

cluster 3

select resi +1 and chain B
select resi +3 and chain A
----------------------------------------------------------

";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn chains_follow_string_order_of_number_chain_keys() {
        let members = vec![ResidueMember::new("A", 3), ResidueMember::new("B", 1)];
        let labelings = BTreeMap::from([(2, vec![1, 1])]);
        let mut out = Vec::new();
        write_report(&mut out, &labelings, &BTreeMap::new(), &members).unwrap();
        let text = String::from_utf8(out).unwrap();
        let b = text.find("chain B").unwrap();
        let a = text.find("chain A").unwrap();
        assert!(b < a);
    }

    #[test]
    fn empty_labelings_write_nothing() {
        let mut out = Vec::new();
        write_report(&mut out, &BTreeMap::new(), &BTreeMap::new(), &members()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn score_table_is_written_in_ascending_count_order() {
        let scores = BTreeMap::from([(3, 4.25), (2, 200.0)]);
        let mut out = Vec::new();
        write_scores_csv(&mut out, &scores).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "community_count,ch_score\n2,200.0\n3,4.25\n"
        );
    }
}
