//! Hand-off of a series to a spatial grid expander.

use ndarray::{Array3, Axis};
use sht_core::{ErrorInfo, GridExpander, ShtError, SpharmUnit};

use crate::series::SpharmCoeff;

/// Time series of regular latitude/longitude grids, indexed `[epoch, lat, lon]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereGrid {
    /// Gridded values.
    pub data: Array3<f64>,
    /// Epochs carried over from the series.
    pub epochs: Vec<f64>,
    /// Unit carried over from the series.
    pub unit: SpharmUnit,
}

impl SphereGrid {
    /// Number of epochs.
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    /// True when no epoch is present.
    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }
}

impl SpharmCoeff {
    /// Expands every epoch through `expander` at `resolution` degrees.
    pub fn expand(
        &self,
        resolution: f64,
        lmax_calc: Option<usize>,
        expander: &dyn GridExpander,
    ) -> Result<SphereGrid, ShtError> {
        if !(resolution.is_finite() && resolution > 0.0) {
            return Err(ShtError::invalid_parameter(
                "resolution",
                &resolution.to_string(),
                "a positive number of degrees",
            ));
        }

        let mut data: Option<Array3<f64>> = None;
        for (row, cilm) in self.coeffs().outer_iter().enumerate() {
            let grid = expander.expand(cilm, resolution, lmax_calc)?;
            let out = data.get_or_insert_with(|| {
                let (lat, lon) = grid.dim();
                Array3::zeros((self.len(), lat, lon))
            });
            let mut slot = out.index_axis_mut(Axis(0), row);
            if slot.shape() != grid.shape() {
                let info = ErrorInfo::new(
                    "expanded-shape",
                    format!(
                        "epoch {row} expanded to {:?}, previous epochs to {:?}",
                        grid.shape(),
                        slot.shape()
                    ),
                );
                return Err(ShtError::Shape(info));
            }
            slot.assign(&grid);
        }

        let data = data.ok_or_else(|| {
            ShtError::Shape(ErrorInfo::new("empty-series", "nothing to expand"))
        })?;
        tracing::debug!(epochs = self.len(), resolution, "expanded series to grids");
        Ok(SphereGrid {
            data,
            epochs: self.epochs().to_vec(),
            unit: self.unit(),
        })
    }
}
