//! Tests that create and edit a single bus stop.

use assert_approx_eq::assert_approx_eq;
use lanelet_ext::{
    AttributeMap, BasicPoint3d, BusStop, Error, Id, LineString3d, Point3d, Polygon3d,
    RegisterRegulatoryElement, RegulatoryElement, RegulatoryElementData, RoleName, RuleParameter,
    RuleParameterMap,
};

fn point(id: Id, x: f64, y: f64) -> Point3d {
    Point3d::new(id, BasicPoint3d::new(x, y, 0.0))
}

/// A 12 m x 3 m bus bay with its corner at `x`.
fn bay(id: Id, x: f64) -> Polygon3d {
    Polygon3d::new(
        id,
        vec![
            point(id * 10, x, 0.0),
            point(id * 10 + 1, x + 12.0, 0.0),
            point(id * 10 + 2, x + 12.0, 3.0),
            point(id * 10 + 3, x, 3.0),
        ],
    )
}

fn stop_line(id: Id, x: f64) -> LineString3d {
    LineString3d::new(id, vec![point(id * 10, x, 0.0), point(id * 10 + 1, x, 3.5)])
}

/// Test that a bus stop returns the areas and stop line it was created with.
#[test]
fn create_returns_inputs() {
    let (p1, l1) = (bay(1, 0.0), stop_line(2, 12.0));
    let bus_stop = BusStop::make(100, AttributeMap::new(), vec![p1.clone()], l1.clone()).unwrap();

    let bus_stop = bus_stop.borrow();
    assert_eq!(bus_stop.bus_stops(), vec![p1]);
    assert_eq!(bus_stop.stop_line(), Some(l1));
}

/// Test that a bus stop without any areas is rejected.
#[test]
fn create_without_areas_fails() {
    let result = BusStop::new(100, AttributeMap::new(), vec![], stop_line(2, 12.0));
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

/// Test that reconstruction rejects data without exactly one stop line.
#[test]
fn reconstruct_requires_one_stop_line() {
    let stop_lines = [vec![], vec![stop_line(2, 12.0), stop_line(3, 14.0)]];
    for lines in stop_lines {
        let parameters: RuleParameterMap = [
            (RoleName::Refers, vec![RuleParameter::from(bay(1, 0.0))]),
            (RoleName::RefLine, lines.into_iter().map(RuleParameter::from).collect()),
        ]
        .into_iter()
        .collect();
        let mut data = RegulatoryElementData::new(100, parameters, AttributeMap::new());
        data.tag_subtype(BusStop::RULE_NAME);

        let err = BusStop::from_data(data).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidInput("There must be exactly one stopline defined!".to_owned())
        );
    }
}

/// Test that a stop line role holding only other kinds of primitive is rejected.
#[test]
fn reconstruct_ignores_points_as_stop_line() {
    let parameters: RuleParameterMap = [
        (RoleName::Refers, vec![RuleParameter::from(bay(1, 0.0))]),
        (RoleName::RefLine, vec![RuleParameter::from(point(5, 0.0, 0.0))]),
    ]
    .into_iter()
    .collect();
    let data = RegulatoryElementData::new(100, parameters, AttributeMap::new());
    assert!(BusStop::from_data(data).is_err());
}

/// Test that added areas are appended after the existing ones.
#[test]
fn add_bus_stop_appends() {
    let (p1, p2, p3) = (bay(1, 0.0), bay(2, 20.0), bay(3, 40.0));
    let mut bus_stop =
        BusStop::new(100, AttributeMap::new(), vec![p1.clone(), p2.clone()], stop_line(9, 12.0))
            .unwrap();

    bus_stop.add_bus_stop(p3.clone());
    assert_eq!(bus_stop.bus_stops(), vec![p1.clone(), p2, p3]);

    // Duplicates are kept
    bus_stop.add_bus_stop(p1.clone());
    assert_eq!(bus_stop.bus_stops().len(), 4);
    assert_eq!(bus_stop.bus_stops()[3], p1);
}

/// Test that removing an area removes only its first occurrence.
#[test]
fn remove_bus_stop_removes_one() {
    let (p1, p2) = (bay(1, 0.0), bay(2, 20.0));
    let mut bus_stop = BusStop::new(
        100,
        AttributeMap::new(),
        vec![p1.clone(), p2.clone(), p1.clone()],
        stop_line(9, 12.0),
    )
    .unwrap();

    assert!(bus_stop.remove_bus_stop(&p1));
    assert_eq!(bus_stop.bus_stops(), vec![p2.clone(), p1.clone()]);

    // An area with the same geometry is still a different area
    assert!(!bus_stop.remove_bus_stop(&bay(1, 0.0)));
    assert_eq!(bus_stop.bus_stops(), vec![p2, p1]);
}

/// Test that the last area can be removed without an error.
#[test]
fn remove_last_bus_stop() {
    let p1 = bay(1, 0.0);
    let mut bus_stop =
        BusStop::new(1, AttributeMap::new(), vec![p1.clone()], stop_line(2, 12.0)).unwrap();

    assert!(bus_stop.remove_bus_stop(&p1));
    assert!(bus_stop.bus_stops().is_empty());
    assert!(!bus_stop.remove_bus_stop(&p1));
    assert_eq!(
        bus_stop.validate(),
        Err(Error::InvalidInput("No bus stop defined!".to_owned()))
    );
}

/// Test that setting the stop line replaces it.
#[test]
fn set_stop_line_replaces() {
    let mut bus_stop =
        BusStop::new(1, AttributeMap::new(), vec![bay(1, 0.0)], stop_line(2, 12.0)).unwrap();
    let l2 = stop_line(3, 13.0);

    bus_stop.set_stop_line(l2.clone());
    assert_eq!(bus_stop.stop_line(), Some(l2));
    assert_eq!(bus_stop.parameters().get(RoleName::RefLine).map(|p| p.len()), Some(1));
    assert!(bus_stop.validate().is_ok());
}

/// Test that a removed stop line can be set again.
#[test]
fn remove_and_restore_stop_line() {
    let mut bus_stop =
        BusStop::new(1, AttributeMap::new(), vec![bay(1, 0.0)], stop_line(2, 12.0)).unwrap();

    bus_stop.remove_stop_line();
    assert_eq!(bus_stop.stop_line(), None);
    assert!(bus_stop.validate().is_err());

    let l2 = stop_line(3, 13.0);
    bus_stop.set_stop_line(l2.clone());
    assert_eq!(bus_stop.stop_line(), Some(l2));
    assert!(bus_stop.validate().is_ok());
}

/// Test that geometry edited through a returned handle is seen by the bus stop.
#[test]
fn areas_are_shared() {
    let bus_stop =
        BusStop::new(1, AttributeMap::new(), vec![bay(1, 0.0)], stop_line(2, 12.0)).unwrap();
    assert_approx_eq!(bus_stop.bus_stops()[0].area2d(), 36.0);

    bus_stop.bus_stops()[0].push(point(99, -4.0, 1.5));
    assert_eq!(bus_stop.bus_stops()[0].len(), 5);
    assert_approx_eq!(bus_stop.bus_stops()[0].area2d(), 42.0);
}
