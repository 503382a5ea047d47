use ndarray::{array, Array4};
use sht_coeff::{
    LowDegreeCorrection, ReplaceCoeff, ReplaceLabel, SeriesParts, SpharmCoeff, C20_INDEX,
    C30_CUTOVER_EPOCH, C30_INDEX, DEG1_INDICES,
};
use sht_core::{LowDegreeKind, LowDegreeRecord, LowDegreeSource, ShtError, SpharmUnit};

fn series(epochs: &[f64], with_errors: bool) -> SpharmCoeff {
    let n = epochs.len();
    let coeffs = Array4::from_elem((n, 2, 5, 5), 1.0);
    let mut parts = SeriesParts::new(coeffs, epochs.to_vec(), SpharmUnit::Stokes).with_name("GSM: CSR\n");
    if with_errors {
        parts = parts.with_errors(Array4::from_elem((n, 2, 5, 5), 0.5));
    }
    SpharmCoeff::from_parts(parts).unwrap()
}

struct TrackingProduct;

impl LowDegreeSource for TrackingProduct {
    fn read(&self, kind: LowDegreeKind) -> Result<LowDegreeRecord, ShtError> {
        let epochs = vec![2017.9, 2018.1, 2019.0];
        let record = match kind {
            LowDegreeKind::C20 => LowDegreeRecord {
                epochs,
                values: array![[-4.84e-4], [-4.85e-4], [-4.86e-4]],
                errors: Some(array![[1e-11], [2e-11], [3e-11]]),
                center: "CSR".into(),
            },
            LowDegreeKind::C30 => LowDegreeRecord {
                epochs,
                values: array![[9.5e-7], [9.6e-7], [9.7e-7]],
                errors: None,
                center: "GSFC".into(),
            },
            LowDegreeKind::Deg1 => LowDegreeRecord {
                epochs,
                values: array![[1e-10, 2e-10, 3e-10], [4e-10, 5e-10, 6e-10], [7e-10, 8e-10, 9e-10]],
                errors: None,
                center: "GRACE-OBP".into(),
            },
        };
        Ok(record)
    }
}

#[test]
fn c30_before_cutover_is_left_untouched() {
    let target = series(&[2017.9, 2018.1], false);
    let table = ReplaceCoeff::single(
        C30_INDEX,
        vec![7.0, 8.0],
        vec![2017.9, 2018.1],
        SpharmUnit::Stokes,
    )
    .unwrap();
    assert!(table.targets_c30());
    assert_eq!(table.c30_cutover(), C30_CUTOVER_EPOCH);

    let out = table.apply_to(&target).unwrap();
    assert_eq!(out.coeffs()[[0, 0, 3, 0]], 1.0);
    assert_eq!(out.coeffs()[[1, 0, 3, 0]], 8.0);
    assert_eq!(target.coeffs()[[1, 0, 3, 0]], 1.0);
}

#[test]
fn c30_cutover_can_be_moved() {
    let target = series(&[2017.9, 2018.1], false);
    let table = ReplaceCoeff::single(C30_INDEX, vec![7.0, 8.0], vec![2017.9, 2018.1], SpharmUnit::Stokes)
        .unwrap()
        .with_c30_cutover(2015.0);
    let out = table.apply_to(&target).unwrap();
    assert_eq!(out.coeffs()[[0, 0, 3, 0]], 7.0);
}

#[test]
fn cutover_only_applies_to_c30() {
    let target = series(&[2017.9, 2018.1], false);
    let table = ReplaceCoeff::single(C20_INDEX, vec![7.0, 8.0], vec![2017.9, 2018.1], SpharmUnit::Stokes)
        .unwrap();
    assert!(!table.targets_c30());
    let out = table.apply_to(&target).unwrap();
    assert_eq!(out.coeffs()[[0, 0, 2, 0]], 7.0);
    assert_eq!(out.coeffs()[[1, 0, 2, 0]], 8.0);
}

#[test]
fn unmatched_epoch_fails_naming_it() {
    let target = series(&[2010.0, 2010.5], false);
    let table = ReplaceCoeff::single(C20_INDEX, vec![7.0], vec![2010.0], SpharmUnit::Stokes).unwrap();
    let err = table.apply_to(&target).unwrap_err();
    assert!(matches!(err, ShtError::EpochMatch(_)));
    assert!(err.to_string().contains("2010.5000"));
}

#[test]
fn errors_overwrite_only_when_both_sides_have_them() {
    let with_errors = series(&[2010.0], true);
    let without_errors = series(&[2010.0], false);
    let table = ReplaceCoeff::single(C20_INDEX, vec![7.0], vec![2010.0], SpharmUnit::Stokes)
        .unwrap()
        .with_errors(array![[0.25]])
        .unwrap();

    let out = table.apply_to(&with_errors).unwrap();
    assert_eq!(out.errors().unwrap()[[0, 0, 2, 0]], 0.25);
    assert_eq!(out.errors().unwrap()[[0, 0, 3, 0]], 0.5);

    let out = table.apply_to(&without_errors).unwrap();
    assert!(out.errors().is_none());

    let bare = ReplaceCoeff::single(C20_INDEX, vec![7.0], vec![2010.0], SpharmUnit::Stokes).unwrap();
    let out = bare.apply_to(&with_errors).unwrap();
    assert_eq!(out.errors().unwrap()[[0, 0, 2, 0]], 0.5);
}

#[test]
fn labels_extend_provenance() {
    let target = series(&[2010.0], false);
    let table = ReplaceCoeff::single(C20_INDEX, vec![7.0], vec![2010.0], SpharmUnit::Stokes).unwrap();

    let silent = table.apply_to(&target).unwrap();
    assert_eq!(silent.name(), Some("GSM: CSR\n"));

    let labelled = table.clone().with_label(ReplaceLabel::new("C20", "SLR")).apply_to(&target).unwrap();
    assert_eq!(labelled.name(), Some("GSM: CSR\nC20: SLR\n"));
}

#[test]
fn malformed_labels_are_rejected() {
    let table = ReplaceCoeff::single(C20_INDEX, vec![7.0], vec![2010.0], SpharmUnit::Stokes).unwrap();
    let err = table.clone().with_label_parts(Some(&["C20"][..])).unwrap_err();
    assert!(matches!(err, ShtError::Label(_)));
    assert!(table.clone().with_label_parts(Some(&["C20", "CSR", "x"][..])).is_err());

    let ok = table.clone().with_label_parts(Some(&["C20", "CSR"][..])).unwrap();
    assert_eq!(ok.label(), Some(&ReplaceLabel::new("C20", "CSR")));
    let none = table.with_label_parts::<&str>(None).unwrap();
    assert!(none.label().is_none());
}

#[test]
fn table_shape_and_unit_are_checked() {
    let values = array![[1.0, 2.0]];
    assert!(ReplaceCoeff::new(vec![C20_INDEX], values, vec![2010.0], SpharmUnit::Stokes).is_err());
    assert!(ReplaceCoeff::new(vec![], array![[1.0]], vec![2010.0], SpharmUnit::Stokes).is_err());

    let target = series(&[2010.0], false);
    let ewh = ReplaceCoeff::single(C20_INDEX, vec![7.0], vec![2010.0], SpharmUnit::Mmewh).unwrap();
    assert!(matches!(ewh.apply_to(&target), Err(ShtError::Unit(_))));

    let beyond = ReplaceCoeff::single(sht_coeff::CoeffIndex::cos(6, 0), vec![7.0], vec![2010.0], SpharmUnit::Stokes)
        .unwrap();
    assert!(matches!(beyond.apply_to(&target), Err(ShtError::Shape(_))));
}

#[test]
fn replace_folds_named_corrections_in_order() {
    let target = series(&[2018.1, 2019.0], true);
    let source = TrackingProduct;
    let corrections = [
        LowDegreeCorrection::new(LowDegreeKind::C20, &source),
        LowDegreeCorrection::new(LowDegreeKind::Deg1, &source),
    ];
    let out = target.replace(&corrections, None).unwrap();
    assert_eq!(out.coeffs()[[0, 0, 2, 0]], -4.85e-4);
    assert_eq!(out.errors().unwrap()[[1, 0, 2, 0]], 3e-11);
    for (col, index) in DEG1_INDICES.iter().enumerate() {
        let [cs, l, m] = index.position();
        assert_eq!(out.coeffs()[[1, cs, l, m]], [7e-10, 8e-10, 9e-10][col]);
    }
    assert_eq!(out.name(), Some("GSM: CSR\nC20: CSR\nDEG1: GRACE-OBP\n"));
}

#[test]
fn replace_prefers_explicit_table() {
    let target = series(&[2018.1], false);
    let source = TrackingProduct;
    let table = ReplaceCoeff::single(C20_INDEX, vec![3.0], vec![2018.1], SpharmUnit::Stokes).unwrap();
    let out = target
        .replace(&[LowDegreeCorrection::new(LowDegreeKind::C20, &source)], Some(&table))
        .unwrap();
    assert_eq!(out.coeffs()[[0, 0, 2, 0]], 3.0);
}

#[test]
fn replace_requires_stokes_and_some_correction() {
    let target = series(&[2018.1], false);
    assert!(matches!(target.replace(&[], None), Err(ShtError::Parameter(_))));

    let ewh = target.unitconvert(SpharmUnit::Mmewh, None).unwrap();
    let source = TrackingProduct;
    let err = ewh
        .replace(&[LowDegreeCorrection::new(LowDegreeKind::C30, &source)], None)
        .unwrap_err();
    assert!(matches!(err, ShtError::Unit(_)));
}
