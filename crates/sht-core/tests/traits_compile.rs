use std::path::Path;

use ndarray::{Array2, Array3, ArrayView3, ArrayView4};
use sht_core::{
    CoeffBatch, CoeffGrid, CoefficientLoader, FilterKernel, GiaModel, GridExpander,
    LoadLoveNumbers, LoadedRecord, LowDegreeKind, LowDegreeRecord, LowDegreeSource, ShtError,
    SmoothKind, SpharmUnit, TrendModelSource, UnitConverter,
};

struct DummyLoader;

impl CoefficientLoader for DummyLoader {
    fn load(&self, _path: &Path, lmax: usize) -> Result<LoadedRecord, ShtError> {
        Ok(LoadedRecord {
            epoch: 2005.0,
            coeffs: Array3::zeros((2, lmax + 1, lmax + 1)),
            errors: None,
        })
    }
}

struct DummyTrend;

impl TrendModelSource for DummyTrend {
    fn trend(&self, lmax: usize, _model: GiaModel) -> Result<CoeffGrid, ShtError> {
        Ok(Array3::zeros((2, lmax + 1, lmax + 1)))
    }
}

struct DummyLowDegree;

impl LowDegreeSource for DummyLowDegree {
    fn read(&self, _kind: LowDegreeKind) -> Result<LowDegreeRecord, ShtError> {
        Ok(LowDegreeRecord {
            epochs: vec![2005.0],
            values: Array2::zeros((1, 1)),
            errors: None,
            center: "CSR".into(),
        })
    }
}

struct DummyFilter;

impl FilterKernel for DummyFilter {
    fn weights(&self, _kind: SmoothKind, lmax: usize, _radius: f64) -> Result<CoeffGrid, ShtError> {
        Ok(Array3::ones((2, lmax + 1, lmax + 1)))
    }
}

struct DummyConverter;

impl UnitConverter for DummyConverter {
    fn convert(
        &self,
        coeffs: ArrayView4<'_, f64>,
        _from: SpharmUnit,
        _to: SpharmUnit,
        _love: Option<&LoadLoveNumbers>,
    ) -> Result<CoeffBatch, ShtError> {
        Ok(coeffs.to_owned())
    }
}

struct DummyExpander;

impl GridExpander for DummyExpander {
    fn expand(
        &self,
        _cilm: ArrayView3<'_, f64>,
        resolution: f64,
        _lmax_calc: Option<usize>,
    ) -> Result<Array2<f64>, ShtError> {
        let rows = (180.0 / resolution) as usize;
        Ok(Array2::zeros((rows, rows * 2)))
    }
}

#[test]
fn collaborators_are_object_safe() {
    let loader: Box<dyn CoefficientLoader> = Box::new(DummyLoader);
    let trend: Box<dyn TrendModelSource> = Box::new(DummyTrend);
    let low: Box<dyn LowDegreeSource> = Box::new(DummyLowDegree);
    let filter: Box<dyn FilterKernel> = Box::new(DummyFilter);
    let converter: Box<dyn UnitConverter> = Box::new(DummyConverter);
    let expander: Box<dyn GridExpander> = Box::new(DummyExpander);

    let record = loader.load(Path::new("unused.gfc"), 4).unwrap();
    assert_eq!(record.coeffs.dim(), (2, 5, 5));
    assert_eq!(trend.trend(4, GiaModel::C18).unwrap().dim(), (2, 5, 5));
    assert_eq!(low.read(LowDegreeKind::C20).unwrap().center, "CSR");
    assert_eq!(filter.weights(SmoothKind::Gauss, 4, 300.0).unwrap()[[0, 4, 4]], 1.0);

    let batch = record.coeffs.insert_axis(ndarray::Axis(0));
    let converted = converter
        .convert(batch.view(), SpharmUnit::Stokes, SpharmUnit::Mmewh, None)
        .unwrap();
    assert_eq!(converted.dim(), (1, 2, 5, 5));
    let grid = expander.expand(converted.index_axis(ndarray::Axis(0), 0), 1.0, None).unwrap();
    assert_eq!(grid.dim(), (180, 360));
}
