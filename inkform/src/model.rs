use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
    /// Box corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerPoint {
    pub index: usize,
    pub angle: f64,
    pub x: f64,
    pub y: f64,
}

impl CornerPoint {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerData {
    pub count: usize,
    pub angles: Vec<f64>,
    pub corners: Vec<CornerPoint>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleAnalysis {
    pub avg_angle: f64,
    pub variance: f64,
    pub consistency: f64,
    pub rectangle_likeness: f64,
    pub triangle_likeness: f64,
}

/// Per-stroke descriptor. Derived purely from the stroke's points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub aspect_ratio: f64,
    pub straightness: f64,
    pub is_closed: bool,
    pub closure_distance: f64,
    pub bounds: Bounds,
    pub size: f64,
    pub corners: usize,
    pub corner_angles: Vec<f64>,
    pub corner_data: Vec<CornerPoint>,
    pub tip: Option<Point>,
    pub angle_analysis: AngleAnalysis,
    pub point_count: usize,
}

impl Fingerprint {
    pub fn corner_data(&self) -> CornerData {
        CornerData {
            count: self.corners,
            angles: self.corner_angles.clone(),
            corners: self.corner_data.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Line,
    Arc,
    Circle,
    Triangle,
    Rectangle,
}

impl ShapeType {
    pub const ALL: [ShapeType; 5] = [
        ShapeType::Line,
        ShapeType::Arc,
        ShapeType::Circle,
        ShapeType::Triangle,
        ShapeType::Rectangle,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ShapeType::Line => "line",
            ShapeType::Arc => "arc",
            ShapeType::Circle => "circle",
            ShapeType::Triangle => "triangle",
            ShapeType::Rectangle => "rectangle",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShapeType::Line => "Line",
            ShapeType::Arc => "Arc",
            ShapeType::Circle => "Circle",
            ShapeType::Triangle => "Triangle",
            ShapeType::Rectangle => "Rectangle",
        }
    }

    pub fn parse(name: &str) -> Option<ShapeType> {
        ShapeType::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub kind: String,
    pub label: String,
    pub score: u32,
    pub confidence: f64,
    #[serde(default)]
    pub user_primitive: bool,
}

impl RecognitionResult {
    pub fn builtin(shape: ShapeType, score: u32) -> Self {
        RecognitionResult {
            kind: shape.as_str().to_string(),
            label: shape.label().to_string(),
            score,
            confidence: score as f64 / 100.0,
            user_primitive: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeAnalysis {
    pub fingerprint: Fingerprint,
    pub results: Vec<RecognitionResult>,
}

/// Idealized stroke produced by refinement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum RefinedGeometry {
    /// Circles and lines.
    Polyline(Vec<Point>),
    /// Straight edges of rectangles and triangles, closing the loop.
    Segments(Vec<[Point; 2]>),
}

impl RefinedGeometry {
    pub fn points(&self) -> Vec<Point> {
        match self {
            RefinedGeometry::Polyline(pts) => pts.clone(),
            RefinedGeometry::Segments(segs) => {
                let mut out = Vec::with_capacity(segs.len() + 1);
                for (i, [a, b]) in segs.iter().enumerate() {
                    if i == 0 {
                        out.push(*a);
                    }
                    out.push(*b);
                }
                out
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeDef {
    Segment { start: Point, end: Point },
    Circle { center: Point, radius: f64 },
    Polygon { vertices: Vec<Point> },
    Freeform,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: String,
    pub label: String,
    pub bounds: Bounds,
    pub definition: ShapeDef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub index: usize,
    pub stroke: Vec<Point>,
    #[serde(default)]
    pub refined_stroke: Option<Vec<Point>>,
    pub recognized_as: String,
    pub kind: String,
    pub fingerprint: Fingerprint,
    pub bounds: Bounds,
    #[serde(default)]
    pub refined: Option<RefinedGeometry>,
    #[serde(default)]
    pub shape: Option<Shape>,
}

impl Component {
    pub fn is_line(&self) -> bool {
        self.kind == "line" || self.recognized_as == "line"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    Touching,
    Intersecting,
}

impl Relationship {
    pub fn as_str(self) -> &'static str {
        match self {
            Relationship::Touching => "touching",
            Relationship::Intersecting => "intersecting",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub relationship: Relationship,
    pub distance: f64,
    #[serde(default)]
    pub intersection_points: Option<Vec<Point>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Containment {
    pub outer: usize,
    pub inner: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialGraph {
    pub connections: Vec<Connection>,
    pub containment: Vec<Containment>,
}

impl SpatialGraph {
    pub fn count(&self, relationship: Relationship) -> usize {
        self.connections
            .iter()
            .filter(|c| c.relationship == relationship)
            .count()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipHistogram {
    pub touching: usize,
    pub intersecting: usize,
    pub containment: usize,
}

impl RelationshipHistogram {
    pub fn entries(&self) -> [(&'static str, usize); 3] {
        [
            ("touching", self.touching),
            ("intersecting", self.intersecting),
            ("containment", self.containment),
        ]
    }
    pub fn any(&self) -> bool {
        self.touching > 0 || self.intersecting > 0 || self.containment > 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositionFingerprint {
    pub component_types: Vec<String>,
    pub component_count: usize,
    pub type_histogram: BTreeMap<String, usize>,
    pub relationship_histogram: RelationshipHistogram,
    pub topology_hash: String,
    pub canonical_order: Vec<usize>,
    #[serde(default)]
    pub fuzzy_relationships: bool,
}

impl CompositionFingerprint {
    /// Type-sequence portion of the topology hash. Rebuilt from the type list
    /// since type names may themselves contain '-'.
    pub fn type_signature(&self) -> String {
        self.component_types.join("+")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositionMatch {
    pub library_key: String,
    pub label: String,
    pub score: f64,
    pub matched_component_indices: Vec<usize>,
    pub cluster_index: usize,
    pub component_count: usize,
    pub type_score: f64,
    pub relationship_score: f64,
}
