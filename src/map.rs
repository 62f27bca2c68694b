use std::cell::{Ref, RefMut};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use log::debug;

use crate::error::{Error, Result};
use crate::primitive::Id;
use crate::regulatory::{
    RegulatoryElement, RegulatoryElementData, RegulatoryElementFactory, RegulatoryElementPtr,
};

/// The regulatory elements of a map, by ID.
///
/// Elements are shared: the layer holds one handle, and any other structure
/// referring to an element may hold more.
#[derive(Default, Debug)]
pub struct RegulatoryElementLayer {
    elements: BTreeMap<Id, RegulatoryElementPtr>,
}

impl RegulatoryElementLayer {
    /// Creates an empty layer.
    pub fn new() -> Self {
        Default::default()
    }

    /// Reconstructs a layer from persisted element data.
    ///
    /// Each element is built by the factory according to its subtype.
    /// Loading stops at the first element that cannot be built.
    pub fn load(
        factory: &RegulatoryElementFactory,
        datas: impl IntoIterator<Item = RegulatoryElementData>,
    ) -> Result<Self> {
        let mut layer = Self::new();
        for data in datas {
            let id = data.id;
            let element = factory.create(data)?;
            match layer.elements.entry(id) {
                Entry::Vacant(entry) => {
                    entry.insert(element);
                }
                Entry::Occupied(_) => return Err(Error::DuplicateId(id)),
            }
        }
        debug!("Loaded {} regulatory elements", layer.len());
        Ok(layer)
    }

    /// Snapshots the data of every element, in ID order, for persisting.
    /// The snapshots share their primitives with the elements.
    pub fn to_data(&self) -> Vec<RegulatoryElementData> {
        self.elements
            .values()
            .map(|element| element.borrow().data().clone())
            .collect()
    }

    /// Adds an element, returning the element it replaced if one had the same ID.
    pub fn insert(&mut self, element: RegulatoryElementPtr) -> Option<RegulatoryElementPtr> {
        let id = element.borrow().id();
        self.elements.insert(id, element)
    }

    /// Removes the element with the given ID.
    pub fn remove(&mut self, id: Id) -> Option<RegulatoryElementPtr> {
        self.elements.remove(&id)
    }

    /// Gets the element with the given ID.
    pub fn get(&self, id: Id) -> Option<&RegulatoryElementPtr> {
        self.elements.get(&id)
    }

    /// Borrows the element with the given ID, if it is of type `T`.
    ///
    /// Returns `None` while the element is mutably borrowed elsewhere.
    pub fn find<T: RegulatoryElement>(&self, id: Id) -> Option<Ref<'_, T>> {
        let element = self.elements.get(&id)?.try_borrow().ok()?;
        Ref::filter_map(element, |element| element.downcast_ref::<T>()).ok()
    }

    /// Mutably borrows the element with the given ID, if it is of type `T`.
    ///
    /// Returns `None` while the element is borrowed elsewhere.
    pub fn find_mut<T: RegulatoryElement>(&self, id: Id) -> Option<RefMut<'_, T>> {
        let element = self.elements.get(&id)?.try_borrow_mut().ok()?;
        RefMut::filter_map(element, |element| element.downcast_mut::<T>()).ok()
    }

    /// Iterates over the elements in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &RegulatoryElementPtr> {
        self.elements.values()
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns true if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
