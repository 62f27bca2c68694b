pub use cgmath;
pub use attribute::{AttributeMap, AttributeValue};
pub use error::{Error, Result};
#[cfg(feature = "serde")]
pub use document::{
    MapDocument, ParameterRecord, PointRecord, PointSequenceRecord, RegulatoryElementRecord,
};
pub use map::RegulatoryElementLayer;
pub use math::BasicPoint3d;
pub use primitive::{Id, LineString3d, Point3d, Polygon3d};
pub use regulatory::{
    BusStop, BusStopPtr, GenericRegulatoryElement, RegisterRegulatoryElement, RegulatoryElement,
    RegulatoryElementData, RegulatoryElementFactory, RegulatoryElementPtr, RoleName,
    RuleParameter, RuleParameterMap,
};

pub mod attribute;
#[cfg(feature = "serde")]
mod document;
mod error;
mod map;
pub mod math;
pub mod primitive;
pub mod regulatory;

/// Registers the regulatory elements defined by this crate with a factory.
///
/// Call this once while setting up the factory used to load maps.
pub fn register_extension_elements(factory: &mut RegulatoryElementFactory) -> Result<()> {
    factory.register::<BusStop>()
}
