//! Region resolution: pairing each layout descriptor with its loaded tensor.

use crate::error::WeightError;
use crate::tensor::SourceWeightTensor;
use cimgen_config::{CimConfig, ConfigError, FcRegion, LayoutRegion, ResolvedPaths};

/// Every region of the layout table together with its source tensor.
#[derive(Debug, Clone)]
pub struct ResolvedLayout {
    /// Convolutional regions, in table order.
    pub conv: Vec<(LayoutRegion, SourceWeightTensor)>,
    /// The fully connected region, if configured.
    pub fc: Option<(FcRegion, SourceWeightTensor)>,
}

/// Loads the weight file of every region and checks its declared shape.
///
/// A convolutional tensor must be `[oc][line][1][ic]` with exactly 16 output
/// channels per covered array column and 16 input channels per covered array
/// row. The FC tensor must be rank 2. Line extents are left to the remapper,
/// which reports the exact out-of-range index.
pub fn resolve_regions(
    config: &CimConfig,
    paths: &ResolvedPaths,
) -> Result<ResolvedLayout, WeightError> {
    let mut conv = Vec::with_capacity(config.regions.len());
    for (index, region) in config.regions.iter().enumerate() {
        let path = paths.weight_file(&region.source);
        let tensor = SourceWeightTensor::load(&path)?;
        check_conv_shape(index, region, &tensor)?;
        tracing::debug!(index, path = %path.display(), shape = ?tensor.shape(), "loaded region weights");
        conv.push((region.clone(), tensor));
    }

    let fc = match &config.fc {
        Some(fc) => {
            let path = paths.weight_file(&fc.source);
            let tensor = SourceWeightTensor::load(&path)?;
            if tensor.rank() != 2 {
                return Err(ConfigError::ValidationError(format!(
                    "fc weights {} must be rank 2, got shape {:?}",
                    path.display(),
                    tensor.shape()
                ))
                .into());
            }
            tracing::debug!(path = %path.display(), shape = ?tensor.shape(), "loaded fc weights");
            Some((fc.clone(), tensor))
        }
        None => None,
    };

    Ok(ResolvedLayout { conv, fc })
}

fn check_conv_shape(
    index: usize,
    region: &LayoutRegion,
    tensor: &SourceWeightTensor,
) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRegion { index, reason };
    let shape = tensor.shape();
    if shape.len() != 4 {
        return Err(invalid(format!(
            "weights `{}` must be rank 4 [oc][line][1][ic], got shape {shape:?}",
            region.source
        )));
    }
    if shape[2] != 1 {
        return Err(invalid(format!(
            "weights `{}` must have a unit third axis, got shape {shape:?}",
            region.source
        )));
    }
    if shape[0] != region.output_channels() {
        return Err(invalid(format!(
            "block spans {} output channels but `{}` has {}",
            region.output_channels(),
            region.source,
            shape[0]
        )));
    }
    if shape[3] != region.input_channels() {
        return Err(invalid(format!(
            "block spans {} input channels but `{}` has {}",
            region.input_channels(),
            region.source,
            shape[3]
        )));
    }
    Ok(())
}
