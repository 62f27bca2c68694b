//! Regulatory elements: traffic rules attached to map primitives.
//!
//! Every regulatory element is a typed view over [RegulatoryElementData],
//! which groups the primitives the rule refers to by their role.

use std::any::Any;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::attribute::{name, value, AttributeMap};
use crate::error::{Error, Result};
use crate::primitive::{Id, LineString3d, Point3d, Polygon3d};

pub use bus_stop::{BusStop, BusStopPtr};
pub use factory::{RegisterRegulatoryElement, RegulatoryElementFactory};

mod bus_stop;
mod factory;

/// A shared handle to a regulatory element of any kind.
pub type RegulatoryElementPtr = Rc<RefCell<dyn RegulatoryElement>>;

/// The role a primitive plays in a regulatory element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoleName {
    /// The primitives the rule applies to, e.g. traffic lights or bus stops.
    Refers,
    /// The line at which the rule takes effect, e.g. a stop line.
    RefLine,
    /// Lanelets that have right of way.
    RightOfWay,
    /// Lanelets that must yield.
    Yield,
    /// Primitives that cancel the rule.
    Cancels,
    /// The line at which the rule is cancelled.
    CancelLine,
}

impl RoleName {
    /// Every role, in declaration order.
    pub const ALL: [RoleName; 6] = [
        RoleName::Refers,
        RoleName::RefLine,
        RoleName::RightOfWay,
        RoleName::Yield,
        RoleName::Cancels,
        RoleName::CancelLine,
    ];

    /// The name of the role as it is persisted.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RoleName::Refers => "refers",
            RoleName::RefLine => "ref_line",
            RoleName::RightOfWay => "right_of_way",
            RoleName::Yield => "yield",
            RoleName::Cancels => "cancels",
            RoleName::CancelLine => "cancel_line",
        }
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for RoleName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown role {:?}", s)))
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive referenced by a regulatory element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleParameter {
    Point(Point3d),
    LineString(LineString3d),
    Polygon(Polygon3d),
}

impl RuleParameter {
    /// Gets the ID of the referenced primitive.
    pub fn id(&self) -> Id {
        match self {
            RuleParameter::Point(p) => p.id(),
            RuleParameter::LineString(ls) => ls.id(),
            RuleParameter::Polygon(poly) => poly.id(),
        }
    }
}

impl From<Point3d> for RuleParameter {
    fn from(point: Point3d) -> Self {
        RuleParameter::Point(point)
    }
}

impl From<LineString3d> for RuleParameter {
    fn from(line: LineString3d) -> Self {
        RuleParameter::LineString(line)
    }
}

impl From<Polygon3d> for RuleParameter {
    fn from(poly: Polygon3d) -> Self {
        RuleParameter::Polygon(poly)
    }
}

/// A primitive kind that can be stored as a [RuleParameter].
pub trait FromRuleParameter: Clone + 'static {
    /// Returns the primitive if the parameter holds this kind of primitive.
    fn from_parameter(param: &RuleParameter) -> Option<&Self>;
}

impl FromRuleParameter for Point3d {
    fn from_parameter(param: &RuleParameter) -> Option<&Self> {
        match param {
            RuleParameter::Point(p) => Some(p),
            _ => None,
        }
    }
}

impl FromRuleParameter for LineString3d {
    fn from_parameter(param: &RuleParameter) -> Option<&Self> {
        match param {
            RuleParameter::LineString(ls) => Some(ls),
            _ => None,
        }
    }
}

impl FromRuleParameter for Polygon3d {
    fn from_parameter(param: &RuleParameter) -> Option<&Self> {
        match param {
            RuleParameter::Polygon(poly) => Some(poly),
            _ => None,
        }
    }
}

/// The parameters filling one role, in order.
pub type RuleParameters = SmallVec<[RuleParameter; 2]>;

/// A mapping from role name to the parameters filling that role.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleParameterMap(BTreeMap<String, RuleParameters>);

impl RuleParameterMap {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Default::default()
    }

    /// Gets the parameters of a role.
    pub fn get(&self, role: impl AsRef<str>) -> Option<&RuleParameters> {
        self.0.get(role.as_ref())
    }

    /// Gets the parameters of a role, mutably.
    pub fn get_mut(&mut self, role: impl AsRef<str>) -> Option<&mut RuleParameters> {
        self.0.get_mut(role.as_ref())
    }

    /// Gets the parameters of a role, inserting an empty list if the role is missing.
    pub fn entry(&mut self, role: impl AsRef<str>) -> &mut RuleParameters {
        self.0.entry(role.as_ref().to_owned()).or_default()
    }

    /// Replaces the parameters of a role, returning the old ones.
    pub fn insert(
        &mut self,
        role: impl AsRef<str>,
        params: impl IntoIterator<Item = RuleParameter>,
    ) -> Option<RuleParameters> {
        self.0.insert(role.as_ref().to_owned(), params.into_iter().collect())
    }

    /// Removes a role, returning its parameters.
    pub fn remove(&mut self, role: impl AsRef<str>) -> Option<RuleParameters> {
        self.0.remove(role.as_ref())
    }

    /// Iterates over the parameters of a role that hold primitives of kind `T`.
    /// Parameters of other kinds are skipped.
    pub fn iter_as<'a, T: FromRuleParameter>(
        &'a self,
        role: impl AsRef<str>,
    ) -> impl Iterator<Item = &'a T> + 'a {
        self.get(role)
            .into_iter()
            .flatten()
            .filter_map(T::from_parameter)
    }

    /// Collects handles to the parameters of a role that hold primitives of kind `T`.
    pub fn get_as<T: FromRuleParameter>(&self, role: impl AsRef<str>) -> Vec<T> {
        self.iter_as::<T>(role).cloned().collect()
    }

    /// Iterates over all roles and their parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleParameters)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The number of roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no roles.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<R: AsRef<str>, P: IntoIterator<Item = RuleParameter>> FromIterator<(R, P)>
    for RuleParameterMap
{
    fn from_iter<I: IntoIterator<Item = (R, P)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(role, params)| (role.as_ref().to_owned(), params.into_iter().collect()))
                .collect(),
        )
    }
}

/// The generic data behind every regulatory element.
/// This is the form from which regulatory elements are loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegulatoryElementData {
    /// The element ID.
    pub id: Id,
    /// The element's attributes, including its `type` and `subtype`.
    pub attributes: AttributeMap,
    /// The primitives the element refers to, by role.
    pub parameters: RuleParameterMap,
}

impl RegulatoryElementData {
    /// Creates new regulatory element data.
    pub fn new(id: Id, parameters: RuleParameterMap, attributes: AttributeMap) -> Self {
        Self {
            id,
            attributes,
            parameters,
        }
    }

    /// Sets the `type` and `subtype` attributes of a regulatory element.
    pub fn tag_subtype(&mut self, subtype: &str) {
        self.attributes.insert(name::TYPE, value::REGULATORY_ELEMENT);
        self.attributes.insert(name::SUBTYPE, subtype);
    }
}

/// A regulatory element: a traffic rule attached to map primitives.
pub trait RegulatoryElement: Any + fmt::Debug {
    /// The underlying generic data.
    fn data(&self) -> &RegulatoryElementData;

    /// The underlying generic data, mutably.
    /// Changes made here bypass any checks of the concrete element.
    fn data_mut(&mut self) -> &mut RegulatoryElementData;

    /// Upcasts to [Any], to allow downcasting to the concrete element.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to [Any] mutably.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// The element ID.
    fn id(&self) -> Id {
        self.data().id
    }

    /// The element's attributes.
    fn attributes(&self) -> &AttributeMap {
        &self.data().attributes
    }

    /// The element's attributes, mutably.
    fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.data_mut().attributes
    }

    /// The primitives the element refers to, by role.
    fn parameters(&self) -> &RuleParameterMap {
        &self.data().parameters
    }

    /// The element's `subtype` attribute.
    fn subtype(&self) -> Option<&str> {
        self.attributes().subtype()
    }
}

impl dyn RegulatoryElement {
    /// Downcasts to a concrete element type.
    pub fn downcast_ref<T: RegulatoryElement>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Downcasts to a concrete element type, mutably.
    pub fn downcast_mut<T: RegulatoryElement>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

/// A regulatory element with no structure beyond its data.
/// Used for subtypes that have no registered constructor.
#[derive(Clone, Debug)]
pub struct GenericRegulatoryElement {
    data: RegulatoryElementData,
}

impl GenericRegulatoryElement {
    /// Wraps regulatory element data without checking it.
    pub fn new(data: RegulatoryElementData) -> Self {
        Self { data }
    }

    /// The primitives the element refers to, mutably.
    pub fn parameters_mut(&mut self) -> &mut RuleParameterMap {
        &mut self.data.parameters
    }
}

impl RegulatoryElement for GenericRegulatoryElement {
    fn data(&self) -> &RegulatoryElementData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut RegulatoryElementData {
        &mut self.data
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::BasicPoint3d;

    fn point(id: Id) -> Point3d {
        Point3d::new(id, BasicPoint3d::new(id as f64, 0.0, 0.0))
    }

    #[test]
    fn typed_access_skips_other_kinds() {
        let poly = Polygon3d::new(10, vec![point(1), point(2), point(3)]);
        let line = LineString3d::new(20, vec![point(4), point(5)]);
        let params: RuleParameterMap = [(
            RoleName::Refers,
            vec![
                RuleParameter::from(point(6)),
                poly.clone().into(),
                line.clone().into(),
            ],
        )]
        .into_iter()
        .collect();

        assert_eq!(params.get_as::<Polygon3d>(RoleName::Refers), vec![poly]);
        assert_eq!(params.get_as::<LineString3d>(RoleName::Refers), vec![line]);
        assert_eq!(params.iter_as::<Point3d>(RoleName::Refers).count(), 1);
        assert!(params.get_as::<Polygon3d>(RoleName::RefLine).is_empty());
    }

    #[test]
    fn role_names_round_trip() {
        for role in RoleName::ALL {
            assert_eq!(role.as_str().parse::<RoleName>(), Ok(role));
            assert_eq!(role.to_string(), role.as_ref());
        }
        assert_eq!(RoleName::RightOfWay.as_str(), "right_of_way");
        assert_eq!(RoleName::CancelLine.as_str(), "cancel_line");
        assert!("refers ".parse::<RoleName>().is_err());
    }

    #[test]
    fn parameter_id_is_the_primitive_id() {
        let line = LineString3d::new(20, vec![point(4), point(5)]);
        let poly = Polygon3d::new(10, vec![point(1), point(2), point(3)]);
        assert_eq!(RuleParameter::from(point(6)).id(), 6);
        assert_eq!(RuleParameter::from(line).id(), 20);
        assert_eq!(RuleParameter::from(poly).id(), 10);
    }

    #[test]
    fn roles_are_keyed_by_name() {
        let mut params = RuleParameterMap::new();
        params.entry(RoleName::RefLine).push(point(1).into());
        assert_eq!(params.get("ref_line").map(|p| p.len()), Some(1));

        let old = params.insert(RoleName::RefLine, std::iter::empty());
        assert_eq!(old.map(|p| p.len()), Some(1));
        assert_eq!(params.get(RoleName::RefLine).map(|p| p.len()), Some(0));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn generic_element_downcasts() {
        let mut data = RegulatoryElementData::new(5, RuleParameterMap::new(), AttributeMap::new());
        data.tag_subtype("speed_limit");
        let elem: RegulatoryElementPtr = Rc::new(RefCell::new(GenericRegulatoryElement::new(data)));

        let elem = elem.borrow();
        assert_eq!(elem.id(), 5);
        assert_eq!(elem.subtype(), Some("speed_limit"));
        assert_eq!(elem.attributes().type_(), Some(value::REGULATORY_ELEMENT));
        assert!(elem.downcast_ref::<GenericRegulatoryElement>().is_some());
        assert!(elem.downcast_ref::<BusStop>().is_none());
    }
}
