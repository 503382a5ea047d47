/// Semi-major axis of the reference ellipsoid in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_136.3;
/// Mean density of the Earth in kg/m³.
pub const RHO_EARTH: f64 = 5517.0;
/// Density of fresh water in kg/m³.
pub const RHO_WATER: f64 = 1000.0;
