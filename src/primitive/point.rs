use super::{Id, Primitive, PrimitiveData};
use crate::attribute::AttributeMap;
use crate::math::BasicPoint3d;

/// A point in the map.
pub type Point3d = Primitive<PointData>;

/// The data of a [Point3d].
#[derive(Clone, Debug)]
pub struct PointData {
    /// The point ID.
    pub id: Id,
    /// The point's attributes.
    pub attributes: AttributeMap,
    /// The position of the point in m.
    pub coords: BasicPoint3d,
}

impl PrimitiveData for PointData {
    fn id(&self) -> Id {
        self.id
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }
}

impl Primitive<PointData> {
    /// Creates a new point without attributes.
    pub fn new(id: Id, coords: BasicPoint3d) -> Self {
        Self::with_attributes(id, AttributeMap::new(), coords)
    }

    /// Creates a new point.
    pub fn with_attributes(id: Id, attributes: AttributeMap, coords: BasicPoint3d) -> Self {
        Self::from_data(PointData {
            id,
            attributes,
            coords,
        })
    }

    /// Gets the position of the point.
    pub fn coords(&self) -> BasicPoint3d {
        self.data().coords
    }

    /// Moves the point.
    pub fn set_coords(&self, coords: BasicPoint3d) {
        self.data_mut().coords = coords;
    }
}
