use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use log::trace;

use super::{
    FromRuleParameter, RegisterRegulatoryElement, RegulatoryElement, RegulatoryElementData,
    RoleName, RuleParameter, RuleParameterMap,
};
use crate::attribute::AttributeMap;
use crate::error::{Error, Result};
use crate::primitive::{Id, LineString3d, Polygon3d};

/// A shared handle to a [BusStop].
pub type BusStopPtr = Rc<RefCell<BusStop>>;

/// A bus stop: one or more areas where buses stop, and the line
/// at which a bus serving them must stop.
///
/// The bus stop areas fill the [RoleName::Refers] role and the stop line
/// fills the [RoleName::RefLine] role.
///
/// A bus stop is checked to have at least one area and exactly one stop line
/// when it is created or loaded. Later edits are not checked; use
/// [BusStop::validate] after editing if the element must stay well formed.
#[derive(Clone, Debug)]
pub struct BusStop {
    data: RegulatoryElementData,
}

impl BusStop {
    /// Creates a new bus stop and returns a shared handle to it.
    ///
    /// # Parameters
    /// * `id` - The element ID
    /// * `attributes` - The element's attributes; `type` and `subtype` are overwritten
    /// * `bus_stops` - The bus stop areas, of which there must be at least one
    /// * `stop_line` - The line at which buses stop
    pub fn make(
        id: Id,
        attributes: AttributeMap,
        bus_stops: Vec<Polygon3d>,
        stop_line: LineString3d,
    ) -> Result<BusStopPtr> {
        let bus_stop = Self::new(id, attributes, bus_stops, stop_line)?;
        Ok(Rc::new(RefCell::new(bus_stop)))
    }

    /// Creates a new bus stop. See [BusStop::make].
    pub fn new(
        id: Id,
        attributes: AttributeMap,
        bus_stops: Vec<Polygon3d>,
        stop_line: LineString3d,
    ) -> Result<Self> {
        let parameters: RuleParameterMap = [
            (RoleName::Refers, bus_stops.into_iter().map(RuleParameter::from).collect()),
            (RoleName::RefLine, vec![RuleParameter::from(stop_line)]),
        ]
        .into_iter()
        .collect();
        let mut data = RegulatoryElementData::new(id, parameters, attributes);
        data.tag_subtype(Self::RULE_NAME);
        Self::from_data(data)
    }

    /// Gets the bus stop areas.
    ///
    /// The returned handles share their geometry with this element,
    /// so the areas can be edited through them.
    pub fn bus_stops(&self) -> Vec<Polygon3d> {
        self.data.parameters.get_as(RoleName::Refers)
    }

    /// Adds a bus stop area. The same area may be added more than once.
    pub fn add_bus_stop(&mut self, bus_stop: Polygon3d) {
        trace!("Bus stop {}: adding area {}", self.data.id, bus_stop.id());
        self.data.parameters.entry(RoleName::Refers).push(bus_stop.into());
    }

    /// Removes the first occurrence of a bus stop area.
    ///
    /// Returns true if the area was found and removed.
    pub fn remove_bus_stop(&mut self, bus_stop: &Polygon3d) -> bool {
        let Some(params) = self.data.parameters.get_mut(RoleName::Refers) else {
            return false;
        };
        let idx = params
            .iter()
            .position(|param| Polygon3d::from_parameter(param) == Some(bus_stop));
        match idx {
            Some(idx) => {
                trace!("Bus stop {}: removing area {}", self.data.id, bus_stop.id());
                params.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Gets the stop line.
    ///
    /// Returns `None` only if the stop line was removed with [BusStop::remove_stop_line].
    pub fn stop_line(&self) -> Option<LineString3d> {
        self.data
            .parameters
            .iter_as::<LineString3d>(RoleName::RefLine)
            .next()
            .cloned()
    }

    /// Sets the stop line, replacing any existing one.
    pub fn set_stop_line(&mut self, stop_line: LineString3d) {
        trace!("Bus stop {}: setting stop line {}", self.data.id, stop_line.id());
        self.data
            .parameters
            .insert(RoleName::RefLine, [RuleParameter::from(stop_line)]);
    }

    /// Removes the stop line.
    /// The bus stop is not well formed again until a new stop line is set.
    pub fn remove_stop_line(&mut self) {
        trace!("Bus stop {}: removing stop line", self.data.id);
        self.data
            .parameters
            .insert(RoleName::RefLine, std::iter::empty());
    }

    /// Checks that the bus stop has at least one area and exactly one stop line.
    pub fn validate(&self) -> Result<()> {
        Self::check(&self.data)
    }

    fn check(data: &RegulatoryElementData) -> Result<()> {
        let params = &data.parameters;
        if params.iter_as::<Polygon3d>(RoleName::Refers).next().is_none() {
            return Err(Error::InvalidInput("No bus stop defined!".to_owned()));
        }
        if params.iter_as::<LineString3d>(RoleName::RefLine).count() != 1 {
            return Err(Error::InvalidInput(
                "There must be exactly one stopline defined!".to_owned(),
            ));
        }
        Ok(())
    }
}

impl RegisterRegulatoryElement for BusStop {
    const RULE_NAME: &'static str = "bus_stop";

    fn from_data(data: RegulatoryElementData) -> Result<Self> {
        Self::check(&data)?;
        Ok(Self { data })
    }
}

impl RegulatoryElement for BusStop {
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
    use crate::attribute::{name, value};
    use crate::math::BasicPoint3d;
    use crate::primitive::Point3d;

    fn point(id: Id, x: f64, y: f64) -> Point3d {
        Point3d::new(id, BasicPoint3d::new(x, y, 0.0))
    }

    fn area(id: Id) -> Polygon3d {
        Polygon3d::new(id, vec![point(1, 0.0, 0.0), point(2, 10.0, 0.0), point(3, 10.0, 3.0)])
    }

    fn line(id: Id) -> LineString3d {
        LineString3d::new(id, vec![point(4, 0.0, 3.0), point(5, 0.0, 6.0)])
    }

    #[test]
    fn tags_type_and_subtype() {
        let attrs: AttributeMap = [(name::SUBTYPE, "stop_sign"), ("name", "Central")]
            .into_iter()
            .collect();
        let bus_stop = BusStop::new(1, attrs, vec![area(10)], line(20)).unwrap();

        assert_eq!(bus_stop.attributes().type_(), Some(value::REGULATORY_ELEMENT));
        assert_eq!(bus_stop.subtype(), Some("bus_stop"));
        assert_eq!(bus_stop.attributes().get("name").map(|v| v.as_str()), Some("Central"));
    }

    #[test]
    fn roles_hold_areas_and_stop_line() {
        let (a, l) = (area(10), line(20));
        let bus_stop = BusStop::new(1, AttributeMap::new(), vec![a.clone()], l.clone()).unwrap();

        let refers = bus_stop.parameters().get(RoleName::Refers).unwrap();
        assert_eq!(refers.as_slice(), &[RuleParameter::Polygon(a)]);
        let ref_line = bus_stop.parameters().get(RoleName::RefLine).unwrap();
        assert_eq!(ref_line.as_slice(), &[RuleParameter::LineString(l)]);
    }

    #[test]
    fn areas_of_other_kinds_are_ignored() {
        let mut bus_stop = BusStop::new(1, AttributeMap::new(), vec![area(10)], line(20)).unwrap();
        bus_stop
            .data_mut()
            .parameters
            .entry(RoleName::Refers)
            .push(line(21).into());

        assert_eq!(bus_stop.bus_stops().len(), 1);
        assert!(bus_stop.validate().is_ok());
    }

    #[test]
    fn remove_from_missing_role() {
        let mut bus_stop = BusStop::new(1, AttributeMap::new(), vec![area(10)], line(20)).unwrap();
        bus_stop.data_mut().parameters.remove(RoleName::Refers);

        assert!(!bus_stop.remove_bus_stop(&area(10)));
        assert!(bus_stop.bus_stops().is_empty());
    }
}
