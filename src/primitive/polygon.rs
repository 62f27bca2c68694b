use super::{coords_of, Id, Point3d, Primitive, PrimitiveData};
use crate::attribute::AttributeMap;
use crate::math::{ring_length, signed_area_xy, BasicPoint3d};

/// A closed ring of points enclosing an area, such as a bus stop.
/// The last point connects back to the first.
pub type Polygon3d = Primitive<PolygonData>;

/// The data of a [Polygon3d].
#[derive(Clone, Debug)]
pub struct PolygonData {
    /// The polygon ID.
    pub id: Id,
    /// The polygon's attributes.
    pub attributes: AttributeMap,
    /// The points of the boundary, without repeating the first point.
    pub points: Vec<Point3d>,
}

impl PrimitiveData for PolygonData {
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

impl Primitive<PolygonData> {
    /// Creates a new polygon without attributes.
    pub fn new(id: Id, points: Vec<Point3d>) -> Self {
        Self::with_attributes(id, AttributeMap::new(), points)
    }

    /// Creates a new polygon.
    pub fn with_attributes(id: Id, attributes: AttributeMap, points: Vec<Point3d>) -> Self {
        Self::from_data(PolygonData {
            id,
            attributes,
            points,
        })
    }

    /// Gets handles to the boundary points.
    pub fn points(&self) -> Vec<Point3d> {
        self.data().points.clone()
    }

    /// Gets the coordinates of the boundary points.
    pub fn coords(&self) -> Vec<BasicPoint3d> {
        coords_of(&self.data().points)
    }

    /// The number of boundary points.
    pub fn len(&self) -> usize {
        self.data().points.len()
    }

    /// Returns true if the polygon has no points.
    pub fn is_empty(&self) -> bool {
        self.data().points.is_empty()
    }

    /// Appends a point to the boundary.
    pub fn push(&self, point: Point3d) {
        self.data_mut().points.push(point);
    }

    /// The length of the closed boundary in m.
    pub fn perimeter(&self) -> f64 {
        ring_length(&self.coords())
    }

    /// The enclosed area projected onto the ground plane, in m^2.
    pub fn area2d(&self) -> f64 {
        signed_area_xy(&self.coords()).abs()
    }
}
