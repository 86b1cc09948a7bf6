use super::model::Model;
use thiserror::Error;
use tracing::debug;

/// Frames below this count keep the B-factors read from the file.
pub const MIN_ENSEMBLE_FRAMES: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("frame {frame} has {found} standard atoms, but the first frame has {expected}")]
pub struct FrameMismatch {
    pub frame: usize,
    pub expected: usize,
    pub found: usize,
}

/// Replaces each standard atom's B-factor by the spread of its position across frames.
///
/// For more than two frames, atom `i` of every frame gets
/// `sqrt(var(x) + var(y) + var(z))`, using population variances over the `i`-th
/// standard atom of each frame. Het atoms are left as read.
///
/// # Return
///
/// Returns `Ok(true)` when the B-factors were overwritten, `Ok(false)` when the
/// ensemble is too small for the rule to apply.
///
/// # Errors
///
/// Returns [`FrameMismatch`] if the frames do not all hold the same number of standard atoms.
pub fn apply_ensemble_disorder(models: &mut [Model]) -> Result<bool, FrameMismatch> {
    if models.len() < MIN_ENSEMBLE_FRAMES {
        return Ok(false);
    }

    let frames: Vec<_> = models.iter().map(Model::positions).collect();
    let expected = frames[0].len();
    if let Some((index, frame)) = frames
        .iter()
        .enumerate()
        .find(|(_, frame)| frame.len() != expected)
    {
        return Err(FrameMismatch {
            frame: models[index].id,
            expected,
            found: frame.len(),
        });
    }

    let n = frames.len() as f64;
    let disorder: Vec<f64> = (0..expected)
        .map(|i| {
            (0..3)
                .map(|axis| {
                    let mean = frames.iter().map(|f| f[i][axis]).sum::<f64>() / n;
                    frames
                        .iter()
                        .map(|f| (f[i][axis] - mean).powi(2))
                        .sum::<f64>()
                        / n
                })
                .sum::<f64>()
                .sqrt()
        })
        .collect();

    for model in models.iter_mut() {
        model.set_b_factors(&disorder);
    }
    debug!(
        frames = models.len(),
        atoms = expected,
        "Overwrote B-factors with ensemble positional spread"
    );
    Ok(true)
}
