use crate::cli::AnalyzeArgs;
use crate::config::{AppConfig, PartialDciConfig};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use dynacom::core::io::report::{write_report, write_scores_csv};
use dynacom::core::io::{StructureFormat, load_structure};
use dynacom::engine::progress::ProgressReporter;
use dynacom::workflows::{self, dci::DciResult};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: AnalyzeArgs, show_progress: bool) -> Result<()> {
    let partial_config = PartialDciConfig::load(args.config.as_deref())?;

    info!("Loading input structure from {:?}", &args.file);
    let protein = load_structure(&args.file, args.format)?;

    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(&args, &protein.id)?;
    log_format(&config);

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting dynamic community analysis...");
    let result = workflows::dci::run(&protein, &config.core_config, &reporter);
    progress_handler.finish();
    let result = result?;

    print_summary(&result);
    write_outputs(&result, &config);
    Ok(())
}

fn log_format(config: &AppConfig) {
    let format = config
        .format
        .or_else(|| StructureFormat::from_path(&config.input_path));
    info!(
        format = ?format,
        cutoff = config.core_config.cutoff,
        chain = ?config.core_config.chain,
        n_communities = ?config.core_config.n_communities,
        "Resolved analysis settings"
    );
}

fn print_summary(result: &DciResult) {
    let communities = &result.communities;
    println!(
        "Analysed {} residues; best partition has {} communities.",
        result.node_count(),
        communities.community_count()
    );
    for (k, score) in communities.ranked.iter().take(3) {
        println!("  {k:>2} communities: CH score {score:.4}");
    }
}

/// Write failures are logged and otherwise ignored; the analysis itself succeeded.
fn write_outputs(result: &DciResult, config: &AppConfig) {
    let communities = &result.communities;

    let report = File::create(&config.report_path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_report(
            &mut writer,
            &communities.labelings,
            &communities.scores,
            &result.members,
        )
    });
    match report {
        Ok(()) => println!("✓ Selection report written to: {}", config.report_path.display()),
        Err(e) => warn!("Could not write report {:?}: {}", config.report_path, e),
    }

    if communities.scores.is_empty() {
        return;
    }
    match write_scores(&config.scores_path, &communities.scores) {
        Ok(()) => println!("✓ Score table written to: {}", config.scores_path.display()),
        Err(e) => warn!("Could not write score table {:?}: {}", config.scores_path, e),
    }
}

fn write_scores(path: &Path, scores: &BTreeMap<usize, f64>) -> anyhow::Result<()> {
    let file = File::create(path)?;
    write_scores_csv(BufWriter::new(file), scores)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    fn helix_pdb(len: usize) -> String {
        (0..len)
            .map(|i| {
                let t = i as f64 * 100f64.to_radians();
                let wobble = ((i * 7) % 5) as f64 * 0.05;
                format!(
                    "ATOM  {:>5}  CA  ALA A{:>4}    {:>8.3}{:>8.3}{:>8.3}  1.00  0.00           C",
                    i + 1,
                    i + 1,
                    2.3 * t.cos() + wobble,
                    2.3 * t.sin(),
                    1.5 * i as f64 - wobble
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn analyze_args(argv: &[&str]) -> AnalyzeArgs {
        let mut full = vec!["dynacom", "analyze"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Analyze(args) => args,
            _ => panic!("Expected 'analyze' subcommand"),
        }
    }

    #[test]
    fn sweep_writes_report_and_score_table() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("helix.pdb");
        fs::write(&input, helix_pdb(12)).unwrap();
        let report = dir.path().join("report.txt");
        let scores = dir.path().join("scores.csv");

        let args = analyze_args(&[
            input.to_str().unwrap(),
            "--report",
            report.to_str().unwrap(),
            "--scores",
            scores.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let text = fs::read_to_string(&report).unwrap();
        assert!(text.starts_with("#############################################################\n\nClustering iteration id - C1\n"));
        assert!(text.contains("Clustering iteration id - C10\n"));
        assert!(text.contains("and chain A\n"));

        let table = fs::read_to_string(&scores).unwrap();
        assert!(table.starts_with("community_count,ch_score\n2,"));
    }

    #[test]
    fn fixed_count_writes_report_without_scores() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("helix.pdb");
        fs::write(&input, helix_pdb(8)).unwrap();
        let report = dir.path().join("report.txt");
        let scores = dir.path().join("scores.csv");

        let args = analyze_args(&[
            input.to_str().unwrap(),
            "--n-com",
            "3",
            "--report",
            report.to_str().unwrap(),
            "--scores",
            scores.to_str().unwrap(),
        ]);
        run(args, false).unwrap();

        let text = fs::read_to_string(&report).unwrap();
        assert!(text.contains("Clustering iteration id - C2\n"));
        assert!(text.contains("CH Score - NA\n"));
        assert!(!scores.exists());
    }

    #[test]
    fn unwritable_report_does_not_fail_the_command() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("helix.pdb");
        fs::write(&input, helix_pdb(8)).unwrap();

        let args = analyze_args(&[
            input.to_str().unwrap(),
            "--n-com",
            "2",
            "--report",
            "/nonexistent/dir/report.txt",
        ]);
        assert!(run(args, false).is_ok());
    }

    #[test]
    fn unknown_chain_fails_the_command() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("helix.pdb");
        fs::write(&input, helix_pdb(8)).unwrap();

        let args = analyze_args(&[input.to_str().unwrap(), "--chain", "Q"]);
        assert!(matches!(run(args, false), Err(crate::error::CliError::Core(_))));
    }
}
