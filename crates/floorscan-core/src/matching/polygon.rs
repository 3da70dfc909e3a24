use geo::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{Coord, LineString, Polygon};

use crate::model::RoomPolygon;

/// A room polygon prepared for repeated containment tests.
pub struct PreparedPolygon<'a> {
    pub source: &'a RoomPolygon,
    shape: Option<Polygon<f64>>,
}

impl<'a> PreparedPolygon<'a> {
    pub fn new(source: &'a RoomPolygon) -> Self {
        let shape = if source.is_degenerate() {
            None
        } else {
            let exterior: Vec<Coord<f64>> = source
                .points
                .iter()
                .map(|[x, y]| Coord {
                    x: *x as f64,
                    y: *y as f64,
                })
                .collect();
            Some(Polygon::new(LineString::new(exterior), vec![]))
        };
        PreparedPolygon { source, shape }
    }

    /// Boundary-inclusive containment. Degenerate polygons contain nothing.
    pub fn contains(&self, (x, y): (i64, i64)) -> bool {
        match &self.shape {
            Some(shape) => {
                let point = Coord {
                    x: x as f64,
                    y: y as f64,
                };
                shape.coordinate_position(&point) != CoordPos::Outside
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> RoomPolygon {
        RoomPolygon::new(vec![[100, 100], [200, 100], [200, 200], [100, 200]])
    }

    #[test]
    fn test_inside() {
        let poly = square();
        assert!(PreparedPolygon::new(&poly).contains((150, 150)));
    }

    #[test]
    fn test_outside() {
        let poly = square();
        assert!(!PreparedPolygon::new(&poly).contains((250, 150)));
    }

    #[test]
    fn test_edge_and_vertex_count_as_inside() {
        let poly = square();
        let prepared = PreparedPolygon::new(&poly);
        assert!(prepared.contains((100, 150)));
        assert!(prepared.contains((150, 200)));
        assert!(prepared.contains((200, 200)));
    }

    #[test]
    fn test_concave_notch() {
        // L-shaped room; the notch at the top right is outside.
        let poly = RoomPolygon::new(vec![
            [0, 0],
            [100, 0],
            [100, 50],
            [50, 50],
            [50, 100],
            [0, 100],
        ]);
        let prepared = PreparedPolygon::new(&poly);
        assert!(prepared.contains((25, 75)));
        assert!(!prepared.contains((75, 75)));
    }

    #[test]
    fn test_degenerate_never_contains() {
        let poly = RoomPolygon::new(vec![[0, 0], [100, 100]]);
        assert!(!PreparedPolygon::new(&poly).contains((50, 50)));
        let empty = RoomPolygon::empty();
        assert!(!PreparedPolygon::new(&empty).contains((0, 0)));
    }
}
