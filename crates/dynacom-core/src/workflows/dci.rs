use crate::core::io::selection::ResidueMember;
use crate::core::models::protein::Protein;
use crate::engine::community::{CommunityMode, Communities, detect_communities};
use crate::engine::config::DciConfig;
use crate::engine::error::EngineError;
use crate::engine::gnm::{CrossCorrelation, KirchhoffMatrix};
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use tracing::{info, instrument};

/// Everything a dynamic community analysis produced.
#[derive(Debug, Clone)]
pub struct DciResult {
    /// The residue behind every network node, in node order.
    pub members: Vec<ResidueMember>,
    /// Alpha-carbon coordinates, in node order.
    pub coordinates: Vec<Point3<f64>>,
    /// Kirchhoff matrix, normal modes and normalized cross-correlation.
    pub correlation: CrossCorrelation,
    pub communities: Communities,
}

impl DciResult {
    pub fn node_count(&self) -> usize {
        self.members.len()
    }

    /// Mean-square fluctuation of every node, proportional to its predicted B-factor.
    pub fn fluctuations(&self) -> Vec<f64> {
        self.correlation.modes().fluctuations()
    }
}

/// Runs dynamic community identification on the first model of `protein`.
///
/// Nodes are the alpha-carbons of the standard residues of the first model, optionally
/// restricted to one chain. Contacts closer than the configured cutoff are joined by
/// springs; the normalized cross-correlation of the resulting normal modes is clustered
/// into communities.
///
/// # Arguments
///
/// * `protein` - The parsed structure; only its first model is analysed.
/// * `config` - Cutoff, chain restriction and optional fixed community count.
/// * `reporter` - Receives a start and finish event for every phase.
///
/// # Errors
///
/// Returns [`EngineError::Config`] for invalid parameters, [`EngineError::ChainNotFound`]
/// for an unknown chain, [`EngineError::EmptyModel`] when there is no model or no
/// alpha-carbon, and [`EngineError::Validation`] when the community count does not fit
/// the number of selected residues.
#[instrument(skip_all, name = "dci_workflow")]
pub fn run(
    protein: &Protein,
    config: &DciConfig,
    reporter: &ProgressReporter,
) -> Result<DciResult, EngineError> {
    config.validate()?;

    let (members, coordinates) =
        reporter.phase("Selection", || select_nodes(protein, config.chain.as_deref()))?;
    let n = members.len();
    info!(
        id = %protein.id,
        nodes = n,
        cutoff = config.cutoff,
        "Selected alpha-carbons for the network model"
    );

    let mode = CommunityMode::from(config.n_communities);
    match mode {
        CommunityMode::Fixed(k) if k > n => {
            return Err(EngineError::Validation(format!(
                "community count {k} exceeds the number of residues ({n})"
            )));
        }
        CommunityMode::Sweep if n < 3 => {
            return Err(EngineError::Validation(format!(
                "sweeping community counts needs at least 3 residues, got {n}"
            )));
        }
        _ => {}
    }

    let correlation = reporter.phase("Gaussian network model", || {
        let kirchhoff = KirchhoffMatrix::build(&coordinates, config.cutoff)?;
        reporter.report(Progress::Message(format!(
            "Contact network with {n} nodes built"
        )));
        Ok::<_, EngineError>(kirchhoff.decompose().cross_correlation())
    })?;

    let communities = reporter.phase("Community detection", || {
        detect_communities(&correlation.distance_matrix(), mode)
    })?;

    info!(
        communities = communities.community_count(),
        labelings = communities.labelings.len(),
        "Dynamic community analysis complete"
    );
    Ok(DciResult {
        members,
        coordinates,
        correlation,
        communities,
    })
}

fn select_nodes(
    protein: &Protein,
    chain: Option<&str>,
) -> Result<(Vec<ResidueMember>, Vec<Point3<f64>>), EngineError> {
    let model = protein.model(0).ok_or(EngineError::EmptyModel)?;
    let keys = match chain {
        Some(id) => model
            .chain_calpha_atoms(id)
            .ok_or_else(|| EngineError::ChainNotFound(id.to_string()))?,
        None => model.calpha_atoms(),
    };

    let (members, coordinates): (Vec<_>, Vec<_>) = keys
        .into_iter()
        .filter_map(|key| {
            let atom = model.atom(key)?;
            let residue_key = atom.residue()?;
            let residue = model.residue(residue_key)?;
            let chain = model.chain_of(residue_key)?;
            Some((ResidueMember::new(chain.id.as_str(), residue.number), atom.position))
        })
        .unzip();

    if members.is_empty() {
        return Err(EngineError::EmptyModel);
    }
    Ok((members, coordinates))
}
