use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

use super::{
    GenericRegulatoryElement, RegulatoryElement, RegulatoryElementData, RegulatoryElementPtr,
};
use crate::error::{Error, Result};

/// Builds a regulatory element from its generic data.
type Constructor = fn(RegulatoryElementData) -> Result<RegulatoryElementPtr>;

/// A regulatory element that can be reconstructed from generic data
/// by a [RegulatoryElementFactory].
pub trait RegisterRegulatoryElement: RegulatoryElement + Sized {
    /// The `subtype` attribute identifying this kind of element.
    const RULE_NAME: &'static str;

    /// Reconstructs the element from generic data, checking that
    /// the data has the structure this element requires.
    fn from_data(data: RegulatoryElementData) -> Result<Self>;
}

/// Reconstructs regulatory elements of the registered kinds from generic data,
/// dispatching on their `subtype` attribute.
///
/// The host application builds the factory once at startup and
/// passes it to whatever loads maps.
#[derive(Default, Debug)]
pub struct RegulatoryElementFactory {
    constructors: HashMap<&'static str, Constructor>,
}

impl RegulatoryElementFactory {
    /// Creates a factory with no registered element kinds.
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a kind of regulatory element under its rule name.
    pub fn register<T: RegisterRegulatoryElement>(&mut self) -> Result<()> {
        if self.constructors.contains_key(T::RULE_NAME) {
            return Err(Error::AlreadyRegistered(T::RULE_NAME.to_owned()));
        }
        self.constructors.insert(T::RULE_NAME, construct::<T>);
        debug!("Registered regulatory element subtype {:?}", T::RULE_NAME);
        Ok(())
    }

    /// Returns true if a kind of element is registered under this rule name.
    pub fn is_registered(&self, rule_name: &str) -> bool {
        self.constructors.contains_key(rule_name)
    }

    /// Iterates over the registered rule names, in no particular order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    /// Reconstructs a regulatory element from generic data.
    ///
    /// Data whose subtype is missing or not registered becomes a
    /// [GenericRegulatoryElement]. Data of a registered subtype must satisfy
    /// that element's checks, otherwise the error is returned.
    pub fn create(&self, data: RegulatoryElementData) -> Result<RegulatoryElementPtr> {
        let constructor = data
            .attributes
            .subtype()
            .and_then(|subtype| self.constructors.get(subtype))
            .copied();

        match constructor {
            Some(constructor) => {
                debug!(
                    "Constructing regulatory element {} as {:?}",
                    data.id,
                    data.attributes.subtype()
                );
                constructor(data)
            }
            None => {
                warn!(
                    "No constructor for regulatory element {} with subtype {:?}, \
                     loading it as generic",
                    data.id,
                    data.attributes.subtype()
                );
                Ok(Rc::new(RefCell::new(GenericRegulatoryElement::new(data))))
            }
        }
    }
}

fn construct<T: RegisterRegulatoryElement>(
    data: RegulatoryElementData,
) -> Result<RegulatoryElementPtr> {
    let element = T::from_data(data)?;
    Ok(Rc::new(RefCell::new(element)))
}
