use ndarray::{Array3, Array4, ArrayD, IxDyn};
use sht_coeff::{SeriesOverrides, SeriesParts, SpharmCoeff};
use sht_core::{
    CoeffGrid, FilterKernel, LoadedRecord, ShtError, SmoothKind, SpharmUnit,
};

fn batch(epochs: usize, lmax: usize) -> Array4<f64> {
    Array4::from_shape_fn((epochs, 2, lmax + 1, lmax + 1), |(e, cs, l, m)| {
        if m > l || (cs == 1 && m == 0) {
            0.0
        } else {
            (e as f64 + 1.0) * 1e-10 + l as f64 * 1e-11 - m as f64 * 1e-12
        }
    })
}

fn series(epochs: &[f64]) -> SpharmCoeff {
    let coeffs = batch(epochs.len(), 4);
    let errors = coeffs.mapv(|v| v * 0.1);
    SpharmCoeff::from_parts(
        SeriesParts::new(coeffs, epochs.to_vec(), SpharmUnit::Stokes)
            .with_errors(errors)
            .with_error_kind("calibrated")
            .with_name("GSM: CSR\n"),
    )
    .unwrap()
}

#[test]
fn single_grid_is_a_series_of_length_one() {
    let grid = Array3::<f64>::zeros((2, 6, 6));
    let s = SpharmCoeff::from_grid(grid, 2005.5, SpharmUnit::Stokes).unwrap();
    assert_eq!(s.len(), 1);
    assert_eq!(s.epochs(), &[2005.5]);
    assert_eq!(s.lmax(), 5);
    assert_eq!(s.coeffs().shape(), &[1, 2, 6, 6]);
}

#[test]
fn rank_three_dynamic_input_is_promoted() {
    let grid = ArrayD::<f64>::zeros(IxDyn(&[2, 3, 3]));
    let s = SpharmCoeff::from_dyn(grid, vec![2010.0], SpharmUnit::Mmewh, None).unwrap();
    assert_eq!(s.len(), 1);
    assert_eq!(s.lmax(), 2);

    let flat = ArrayD::<f64>::zeros(IxDyn(&[3, 3]));
    let err = SpharmCoeff::from_dyn(flat, vec![2010.0], SpharmUnit::Mmewh, None).unwrap_err();
    assert!(matches!(err, ShtError::Shape(_)));
}

#[test]
fn construction_rejects_contract_violations() {
    let bad_cs = SeriesParts::new(Array4::zeros((1, 3, 4, 4)), vec![2003.0], SpharmUnit::Stokes);
    assert!(matches!(SpharmCoeff::from_parts(bad_cs), Err(ShtError::Shape(_))));

    let not_square = SeriesParts::new(Array4::zeros((1, 2, 4, 3)), vec![2003.0], SpharmUnit::Stokes);
    assert!(matches!(SpharmCoeff::from_parts(not_square), Err(ShtError::Shape(_))));

    let epochs = SeriesParts::new(Array4::zeros((2, 2, 4, 4)), vec![2003.0], SpharmUnit::Stokes);
    let err = SpharmCoeff::from_parts(epochs).unwrap_err();
    assert_eq!(err.info().code, "epoch-count");

    let errors = SeriesParts::new(Array4::zeros((2, 2, 4, 4)), vec![2003.0, 2004.0], SpharmUnit::Stokes)
        .with_errors(Array4::zeros((1, 2, 4, 4)));
    let err = SpharmCoeff::from_parts(errors).unwrap_err();
    assert_eq!(err.info().code, "errors-shape");

    let empty = SeriesParts::new(Array4::zeros((0, 2, 4, 4)), vec![], SpharmUnit::Stokes);
    assert!(SpharmCoeff::from_parts(empty).is_err());
}

#[test]
fn records_assemble_in_given_order() {
    let records = vec![
        LoadedRecord {
            epoch: 2004.0,
            coeffs: Array3::from_elem((2, 3, 3), 4.0),
            errors: None,
        },
        LoadedRecord {
            epoch: 2003.0,
            coeffs: Array3::from_elem((2, 3, 3), 3.0),
            errors: None,
        },
    ];
    let s = SpharmCoeff::from_records(records, SpharmUnit::Stokes).unwrap();
    assert_eq!(s.epochs(), &[2004.0, 2003.0]);
    assert_eq!(s.coeffs()[[1, 0, 2, 2]], 3.0);
    assert!(s.errors().is_none());
}

#[test]
fn records_with_partial_errors_are_rejected() {
    let records = vec![
        LoadedRecord {
            epoch: 2004.0,
            coeffs: Array3::zeros((2, 3, 3)),
            errors: Some(Array3::zeros((2, 3, 3))),
        },
        LoadedRecord {
            epoch: 2003.0,
            coeffs: Array3::zeros((2, 3, 3)),
            errors: None,
        },
    ];
    let err = SpharmCoeff::from_records(records, SpharmUnit::Stokes).unwrap_err();
    assert_eq!(err.info().code, "partial-errors");
    assert!(SpharmCoeff::from_records(Vec::new(), SpharmUnit::Stokes).is_err());
}

#[test]
fn with_fields_rederives_lmax_and_can_clear_fields() {
    let s = series(&[2003.0, 2004.0]);
    let wider = s
        .with_fields(SeriesOverrides {
            coeffs: Some(batch(2, 6)),
            errors: Some(None),
            name: Some(None),
            ..SeriesOverrides::default()
        })
        .unwrap();
    assert_eq!(wider.lmax(), 6);
    assert!(wider.errors().is_none());
    assert!(wider.name().is_none());
    assert_eq!(wider.error_kind(), Some("calibrated"));
    assert_eq!(s.lmax(), 4);
    assert!(s.errors().is_some());
}

#[test]
fn sort_is_stable_and_moves_errors_with_coefficients() {
    let s = series(&[2005.0, 2003.0, 2005.0, 2004.0]);
    let sorted = s.sort().unwrap();
    assert_eq!(sorted.epochs(), &[2003.0, 2004.0, 2005.0, 2005.0]);
    for (row, original) in [1usize, 3, 0, 2].into_iter().enumerate() {
        assert_eq!(sorted.grid(row).unwrap(), s.grid(original).unwrap());
        let errors = sorted.errors().unwrap();
        assert_eq!(errors[[row, 0, 2, 1]], s.errors().unwrap()[[original, 0, 2, 1]]);
    }
    assert_eq!(sorted.name(), s.name());
}

#[test]
fn selection_helpers() {
    let s = series(&[2003.0, 2004.0, 2005.0]);
    let one = s.get(2).unwrap();
    assert_eq!(one.epochs(), &[2005.0]);
    assert_eq!(one.grid(0).unwrap(), s.grid(2).unwrap());

    let tail = s.slice(1..3).unwrap();
    assert_eq!(tail.epochs(), &[2004.0, 2005.0]);

    let picked = s.select(&[2, 0]).unwrap();
    assert_eq!(picked.epochs(), &[2005.0, 2003.0]);
    assert_eq!(picked.errors().unwrap().shape()[0], 2);

    assert!(s.get(3).is_err());
    assert!(s.slice(2..2).is_err());
    assert!(s.grid(3).is_none());
}

#[test]
fn remove_mean_field_yields_zero_temporal_mean() {
    let s = series(&[2003.0, 2004.0, 2005.0]);
    let anomaly = s.remove_mean_field().unwrap();
    let mean = anomaly.coeffs().mean_axis(ndarray::Axis(0)).unwrap();
    assert!(mean.iter().all(|v| v.abs() < 1e-24));
    assert_eq!(anomaly.errors(), s.errors());
}

#[test]
fn smoothing_with_zero_radius_is_identity() {
    let s = series(&[2003.0, 2004.0]);
    let smoothed = s.smooth(SmoothKind::Gauss, 0.0).unwrap();
    assert_eq!(smoothed.coeffs(), s.coeffs());
}

#[test]
fn smoothing_scales_errors_and_damps_high_degrees() {
    let s = series(&[2003.0, 2004.0]);
    let smoothed = s.smooth(SmoothKind::Fan, 500.0).unwrap();
    let before = s.coeffs()[[0, 0, 4, 2]];
    let after = smoothed.coeffs()[[0, 0, 4, 2]];
    assert!(after.abs() < before.abs());
    let ratio = after / before;
    let err_ratio = smoothed.errors().unwrap()[[0, 0, 4, 2]] / s.errors().unwrap()[[0, 0, 4, 2]];
    assert!((ratio - err_ratio).abs() < 1e-12);
    assert_eq!(smoothed.coeffs()[[1, 0, 0, 0]], s.coeffs()[[1, 0, 0, 0]]);
}

struct WrongShape;

impl FilterKernel for WrongShape {
    fn weights(&self, _kind: SmoothKind, lmax: usize, _radius: f64) -> Result<CoeffGrid, ShtError> {
        Ok(CoeffGrid::ones((2, lmax, lmax)))
    }
}

#[test]
fn kernel_with_wrong_shape_is_rejected() {
    let s = series(&[2003.0]);
    let err = s.smooth_with(SmoothKind::Gauss, 300.0, &WrongShape).unwrap_err();
    assert_eq!(err.info().code, "weights-shape");
}

#[test]
fn negative_radius_is_a_parameter_error() {
    let s = series(&[2003.0]);
    assert!(matches!(s.smooth(SmoothKind::Gauss, -1.0), Err(ShtError::Parameter(_))));
}

#[test]
fn unit_conversion_retags_and_keeps_errors_positive() {
    let s = series(&[2003.0, 2004.0]);
    let negative = s
        .with_fields(SeriesOverrides {
            errors: Some(Some(s.errors().unwrap().mapv(|v| -v))),
            ..SeriesOverrides::default()
        })
        .unwrap();
    let ewh = negative.unitconvert(SpharmUnit::Mmewh, None).unwrap();
    assert_eq!(ewh.unit(), SpharmUnit::Mmewh);
    assert_eq!(ewh.lmax(), s.lmax());
    assert!(ewh.errors().unwrap().iter().all(|v| *v >= 0.0));
    assert!(ewh.coeffs()[[0, 0, 2, 0]].abs() > s.coeffs()[[0, 0, 2, 0]].abs());
}

#[test]
fn uplift_without_love_numbers_fails() {
    let s = series(&[2003.0]);
    assert!(s.unitconvert(SpharmUnit::Mmupl, None).is_err());
}
