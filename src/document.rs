//! The persisted form of a map's regulatory elements.
//!
//! Each primitive is written once, in a table of its kind, and everything
//! that uses it refers to it by ID. Loading builds one handle per table
//! entry, so primitives shared before saving are shared again after loading.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeMap;
use crate::error::{Error, Result};
use crate::map::RegulatoryElementLayer;
use crate::math::BasicPoint3d;
use crate::primitive::{Id, LineString3d, Point3d, Polygon3d, Primitive, PrimitiveData};
use crate::regulatory::{
    RegulatoryElementData, RegulatoryElementFactory, RuleParameter, RuleParameterMap,
};

/// A map's regulatory elements and the primitives they refer to.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub points: Vec<PointRecord>,
    #[serde(default)]
    pub line_strings: Vec<PointSequenceRecord>,
    #[serde(default)]
    pub polygons: Vec<PointSequenceRecord>,
    #[serde(default)]
    pub regulatory_elements: Vec<RegulatoryElementRecord>,
}

/// A persisted point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointRecord {
    pub id: Id,
    #[serde(default)]
    pub attributes: AttributeMap,
    pub coords: BasicPoint3d,
}

/// A persisted line string or polygon, with its points given by ID.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointSequenceRecord {
    pub id: Id,
    #[serde(default)]
    pub attributes: AttributeMap,
    pub points: Vec<Id>,
}

/// A persisted regulatory element, with its parameters given by ID.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegulatoryElementRecord {
    pub id: Id,
    #[serde(default)]
    pub attributes: AttributeMap,
    #[serde(default)]
    pub parameters: BTreeMap<String, Vec<ParameterRecord>>,
}

/// A reference from a regulatory element to a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ParameterRecord {
    Point(Id),
    LineString(Id),
    Polygon(Id),
}

impl MapDocument {
    /// Builds the document for every element of a layer.
    pub fn from_layer(layer: &RegulatoryElementLayer) -> Result<Self> {
        Self::from_data(&layer.to_data())
    }

    /// Builds the document for a set of elements.
    ///
    /// Fails with [Error::DuplicateId] if two different primitives of the
    /// same kind have the same ID, as they could not be told apart on loading.
    pub fn from_data<'a>(
        datas: impl IntoIterator<Item = &'a RegulatoryElementData>,
    ) -> Result<Self> {
        let mut writer = Writer::default();
        for data in datas {
            writer.element(data)?;
        }
        Ok(writer.doc)
    }

    /// Rebuilds the generic data of every element, in document order.
    pub fn to_data(&self) -> Result<Vec<RegulatoryElementData>> {
        let mut points = HashMap::new();
        for record in &self.points {
            let point =
                Point3d::with_attributes(record.id, record.attributes.clone(), record.coords);
            if points.insert(record.id, point).is_some() {
                return Err(Error::DuplicateId(record.id));
            }
        }

        let mut line_strings = HashMap::new();
        for record in &self.line_strings {
            let line = LineString3d::with_attributes(
                record.id,
                record.attributes.clone(),
                lookup_all(&points, &record.points, "point")?,
            );
            if line_strings.insert(record.id, line).is_some() {
                return Err(Error::DuplicateId(record.id));
            }
        }

        let mut polygons = HashMap::new();
        for record in &self.polygons {
            let poly = Polygon3d::with_attributes(
                record.id,
                record.attributes.clone(),
                lookup_all(&points, &record.points, "point")?,
            );
            if polygons.insert(record.id, poly).is_some() {
                return Err(Error::DuplicateId(record.id));
            }
        }

        self.regulatory_elements
            .iter()
            .map(|record| {
                let mut parameters = RuleParameterMap::new();
                for (role, refs) in &record.parameters {
                    let params = refs
                        .iter()
                        .map(|param| match *param {
                            ParameterRecord::Point(id) => {
                                lookup(&points, id, "point").map(RuleParameter::from)
                            }
                            ParameterRecord::LineString(id) => {
                                lookup(&line_strings, id, "line string").map(RuleParameter::from)
                            }
                            ParameterRecord::Polygon(id) => {
                                lookup(&polygons, id, "polygon").map(RuleParameter::from)
                            }
                        })
                        .collect::<Result<Vec<_>>>()?;
                    parameters.insert(role, params);
                }
                Ok(RegulatoryElementData::new(
                    record.id,
                    parameters,
                    record.attributes.clone(),
                ))
            })
            .collect()
    }

    /// Rebuilds a layer from the document. See [RegulatoryElementLayer::load].
    pub fn load(&self, factory: &RegulatoryElementFactory) -> Result<RegulatoryElementLayer> {
        RegulatoryElementLayer::load(factory, self.to_data()?)
    }
}

fn lookup<D>(
    table: &HashMap<Id, Primitive<D>>,
    id: Id,
    kind: &'static str,
) -> Result<Primitive<D>> {
    table.get(&id).cloned().ok_or(Error::UnknownPrimitive { kind, id })
}

fn lookup_all<D>(
    table: &HashMap<Id, Primitive<D>>,
    ids: &[Id],
    kind: &'static str,
) -> Result<Vec<Primitive<D>>> {
    ids.iter().map(|id| lookup(table, *id, kind)).collect()
}

/// Collects primitives into the document tables, once each.
#[derive(Default)]
struct Writer {
    doc: MapDocument,
    points: HashMap<Id, Point3d>,
    line_strings: HashMap<Id, LineString3d>,
    polygons: HashMap<Id, Polygon3d>,
}

impl Writer {
    fn element(&mut self, data: &RegulatoryElementData) -> Result<()> {
        let mut parameters = BTreeMap::new();
        for (role, params) in data.parameters.iter() {
            let refs = params
                .iter()
                .map(|param| self.parameter(param))
                .collect::<Result<Vec<_>>>()?;
            parameters.insert(role.to_owned(), refs);
        }
        self.doc.regulatory_elements.push(RegulatoryElementRecord {
            id: data.id,
            attributes: data.attributes.clone(),
            parameters,
        });
        Ok(())
    }

    fn parameter(&mut self, param: &RuleParameter) -> Result<ParameterRecord> {
        Ok(match param {
            RuleParameter::Point(point) => ParameterRecord::Point(self.point(point)?),
            RuleParameter::LineString(line) => ParameterRecord::LineString(self.line_string(line)?),
            RuleParameter::Polygon(poly) => ParameterRecord::Polygon(self.polygon(poly)?),
        })
    }

    fn point(&mut self, point: &Point3d) -> Result<Id> {
        if first_visit(&mut self.points, point)? {
            let data = point.data();
            self.doc.points.push(PointRecord {
                id: data.id,
                attributes: data.attributes.clone(),
                coords: data.coords,
            });
        }
        Ok(point.id())
    }

    fn line_string(&mut self, line: &LineString3d) -> Result<Id> {
        if first_visit(&mut self.line_strings, line)? {
            let data = line.data();
            let points = self.points_of(&data.points)?;
            self.doc.line_strings.push(PointSequenceRecord {
                id: data.id,
                attributes: data.attributes.clone(),
                points,
            });
        }
        Ok(line.id())
    }

    fn polygon(&mut self, poly: &Polygon3d) -> Result<Id> {
        if first_visit(&mut self.polygons, poly)? {
            let data = poly.data();
            let points = self.points_of(&data.points)?;
            self.doc.polygons.push(PointSequenceRecord {
                id: data.id,
                attributes: data.attributes.clone(),
                points,
            });
        }
        Ok(poly.id())
    }

    fn points_of(&mut self, points: &[Point3d]) -> Result<Vec<Id>> {
        points.iter().map(|point| self.point(point)).collect()
    }
}

/// Marks a primitive as seen. Returns true the first time it is seen,
/// and fails if a different primitive was already seen with its ID.
fn first_visit<D: PrimitiveData>(
    seen: &mut HashMap<Id, Primitive<D>>,
    primitive: &Primitive<D>,
) -> Result<bool> {
    match seen.entry(primitive.id()) {
        Entry::Vacant(entry) => {
            entry.insert(primitive.clone());
            Ok(true)
        }
        Entry::Occupied(entry) if entry.get() == primitive => Ok(false),
        Entry::Occupied(_) => Err(Error::DuplicateId(primitive.id())),
    }
}
