use super::{coords_of, Id, Point3d, Primitive, PrimitiveData};
use crate::attribute::AttributeMap;
use crate::math::{polyline_length, BasicPoint3d};

/// An open sequence of points, such as a stop line or lane border.
pub type LineString3d = Primitive<LineStringData>;

/// The data of a [LineString3d].
#[derive(Clone, Debug)]
pub struct LineStringData {
    /// The line string ID.
    pub id: Id,
    /// The line string's attributes.
    pub attributes: AttributeMap,
    /// The points of the line string, in order.
    pub points: Vec<Point3d>,
}

impl PrimitiveData for LineStringData {
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

impl Primitive<LineStringData> {
    /// Creates a new line string without attributes.
    pub fn new(id: Id, points: Vec<Point3d>) -> Self {
        Self::with_attributes(id, AttributeMap::new(), points)
    }

    /// Creates a new line string.
    pub fn with_attributes(id: Id, attributes: AttributeMap, points: Vec<Point3d>) -> Self {
        Self::from_data(LineStringData {
            id,
            attributes,
            points,
        })
    }

    /// Gets handles to the points of the line string.
    pub fn points(&self) -> Vec<Point3d> {
        self.data().points.clone()
    }

    /// Gets the coordinates of the points of the line string.
    pub fn coords(&self) -> Vec<BasicPoint3d> {
        coords_of(&self.data().points)
    }

    /// The number of points.
    pub fn len(&self) -> usize {
        self.data().points.len()
    }

    /// Returns true if the line string has no points.
    pub fn is_empty(&self) -> bool {
        self.data().points.is_empty()
    }

    /// Appends a point to the end of the line string.
    pub fn push(&self, point: Point3d) {
        self.data_mut().points.push(point);
    }

    /// The length of the line string in m.
    pub fn length(&self) -> f64 {
        polyline_length(&self.coords())
    }
}
