//! Map primitives: points, line strings and polygons.
//!
//! Primitives are shared handles. Cloning a handle does not copy the geometry,
//! and two handles compare equal only if they refer to the same primitive.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::attribute::{AttributeMap, AttributeValue};
use crate::math::BasicPoint3d;

pub use line_string::{LineString3d, LineStringData};
pub use point::{Point3d, PointData};
pub use polygon::{Polygon3d, PolygonData};

mod line_string;
mod point;
mod polygon;

/// Unique ID of a primitive or regulatory element.
pub type Id = i64;

/// The data behind a primitive handle.
pub trait PrimitiveData {
    /// The primitive's ID.
    fn id(&self) -> Id;
    /// The primitive's attributes.
    fn attributes(&self) -> &AttributeMap;
    /// The primitive's attributes, mutably.
    fn attributes_mut(&mut self) -> &mut AttributeMap;
}

/// A shared handle to primitive data.
pub struct Primitive<D>(Rc<RefCell<D>>);

impl<D: PrimitiveData> Primitive<D> {
    /// Wraps primitive data in a new handle.
    pub fn from_data(data: D) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    /// Gets the primitive's ID.
    pub fn id(&self) -> Id {
        self.0.borrow().id()
    }

    /// Gets a copy of an attribute value.
    pub fn attribute(&self, name: &str) -> Option<AttributeValue> {
        self.0.borrow().attributes().get(name).cloned()
    }

    /// Sets an attribute on the primitive.
    /// The change is visible through every handle to this primitive.
    pub fn set_attribute(&self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.0.borrow_mut().attributes_mut().insert(name, value);
    }

    /// Borrows the primitive's attributes.
    pub fn attributes(&self) -> Ref<'_, AttributeMap> {
        Ref::map(self.0.borrow(), |data| data.attributes())
    }

    /// Borrows the underlying data.
    pub fn data(&self) -> Ref<'_, D> {
        self.0.borrow()
    }

    /// Mutably borrows the underlying data.
    pub fn data_mut(&self) -> RefMut<'_, D> {
        self.0.borrow_mut()
    }
}

impl<D> Clone for Primitive<D> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<D> PartialEq for Primitive<D> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<D> Eq for Primitive<D> {}

impl<D: fmt::Debug> fmt::Debug for Primitive<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => data.fmt(f),
            Err(_) => f.write_str("Primitive(<borrowed>)"),
        }
    }
}

/// Collects the coordinates of a sequence of points.
fn coords_of(points: &[Point3d]) -> Vec<BasicPoint3d> {
    points.iter().map(Point3d::coords).collect()
}
