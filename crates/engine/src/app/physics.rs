use super::collision::ObstacleRect;
use super::Vec2;

/// Axis-aligned box described by its center and half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: Vec2 {
                x: size.x / 2.0,
                y: size.y / 2.0,
            },
        }
    }

    pub fn from_obstacle(rect: &ObstacleRect) -> Self {
        Self::new(rect.center, rect.size)
    }

    pub fn min_x(&self) -> f32 {
        self.center.x - self.half.x
    }

    pub fn max_x(&self) -> f32 {
        self.center.x + self.half.x
    }

    pub fn min_y(&self) -> f32 {
        self.center.y - self.half.y
    }

    pub fn max_y(&self) -> f32 {
        self.center.y + self.half.y
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x() < other.max_x()
            && self.max_x() > other.min_x()
            && self.min_y() < other.max_y()
            && self.max_y() > other.min_y()
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.min_x()
            && point.x <= self.max_x()
            && point.y >= self.min_y()
            && point.y <= self.max_y()
    }
}

/// Uniform-grid spatial index over static obstacles. Buckets are keyed by
/// integer cell coordinates; an obstacle registers in every cell its box
/// touches, so queries only scan nearby candidates.
#[derive(Debug)]
pub struct ObstacleIndex {
    cell_size: f32,
    boxes: Vec<Aabb>,
    buckets: std::collections::HashMap<(i32, i32), Vec<usize>>,
}

impl ObstacleIndex {
    pub fn new(obstacles: &[ObstacleRect], cell_size: f32) -> Self {
        let cell_size = if cell_size > 0.0 { cell_size } else { 64.0 };
        let boxes: Vec<Aabb> = obstacles.iter().map(Aabb::from_obstacle).collect();
        let mut buckets: std::collections::HashMap<(i32, i32), Vec<usize>> =
            std::collections::HashMap::new();

        for (index, aabb) in boxes.iter().enumerate() {
            let (cx0, cy0) = cell_of(aabb.min_x(), aabb.min_y(), cell_size);
            let (cx1, cy1) = cell_of(aabb.max_x(), aabb.max_y(), cell_size);
            for cy in cy0..=cy1 {
                for cx in cx0..=cx1 {
                    buckets.entry((cx, cy)).or_default().push(index);
                }
            }
        }

        Self {
            cell_size,
            boxes,
            buckets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Whether `aabb` overlaps any indexed obstacle.
    pub fn collides(&self, aabb: &Aabb) -> bool {
        let (cx0, cy0) = cell_of(aabb.min_x(), aabb.min_y(), self.cell_size);
        let (cx1, cy1) = cell_of(aabb.max_x(), aabb.max_y(), self.cell_size);
        for cy in cy0..=cy1 {
            for cx in cx0..=cx1 {
                let Some(bucket) = self.buckets.get(&(cx, cy)) else {
                    continue;
                };
                for &index in bucket {
                    if self.boxes[index].overlaps(aabb) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

fn cell_of(x: f32, y: f32, cell_size: f32) -> (i32, i32) {
    ((x / cell_size).floor() as i32, (y / cell_size).floor() as i32)
}

/// Moves a box by `delta`, resolving each axis independently so a blocked
/// axis does not kill motion on the free one. Returns the final center,
/// clamped so the box stays inside the world bounds.
pub fn resolve_movement(
    body: Aabb,
    delta: Vec2,
    index: &ObstacleIndex,
    world_width: f32,
    world_height: f32,
) -> Vec2 {
    let mut position = body.center;

    if delta.x != 0.0 {
        let candidate = Aabb {
            center: Vec2 {
                x: position.x + delta.x,
                y: position.y,
            },
            half: body.half,
        };
        if !index.collides(&candidate) {
            position.x = candidate.center.x;
        }
    }

    if delta.y != 0.0 {
        let candidate = Aabb {
            center: Vec2 {
                x: position.x,
                y: position.y + delta.y,
            },
            half: body.half,
        };
        if !index.collides(&candidate) {
            position.y = candidate.center.y;
        }
    }

    position.x = position.x.clamp(body.half.x, (world_width - body.half.x).max(body.half.x));
    position.y = position.y.clamp(body.half.y, (world_height - body.half.y).max(body.half.y));
    position
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(center: (f32, f32), size: (f32, f32)) -> ObstacleRect {
        ObstacleRect {
            center: Vec2 {
                x: center.0,
                y: center.1,
            },
            size: Vec2 {
                x: size.0,
                y: size.1,
            },
        }
    }

    fn body_at(x: f32, y: f32) -> Aabb {
        Aabb::new(Vec2 { x, y }, Vec2 { x: 10.0, y: 10.0 })
    }

    #[test]
    fn aabb_overlap_is_exclusive_at_touching_edges() {
        let a = Aabb::new(Vec2 { x: 0.0, y: 0.0 }, Vec2 { x: 10.0, y: 10.0 });
        let touching = Aabb::new(Vec2 { x: 10.0, y: 0.0 }, Vec2 { x: 10.0, y: 10.0 });
        let overlapping = Aabb::new(Vec2 { x: 9.0, y: 0.0 }, Vec2 { x: 10.0, y: 10.0 });
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
    }

    #[test]
    fn contains_point_includes_boundary() {
        let a = Aabb::new(Vec2 { x: 0.0, y: 0.0 }, Vec2 { x: 4.0, y: 4.0 });
        assert!(a.contains_point(Vec2 { x: 2.0, y: 2.0 }));
        assert!(a.contains_point(Vec2 { x: 0.0, y: 0.0 }));
        assert!(!a.contains_point(Vec2 { x: 2.1, y: 0.0 }));
    }

    #[test]
    fn index_finds_collisions_across_bucket_boundaries() {
        let obstacles = vec![rect((100.0, 100.0), (120.0, 20.0))];
        let index = ObstacleIndex::new(&obstacles, 64.0);
        assert!(index.collides(&body_at(150.0, 100.0)));
        assert!(!index.collides(&body_at(150.0, 200.0)));
    }

    #[test]
    fn empty_index_never_collides() {
        let index = ObstacleIndex::new(&[], 64.0);
        assert!(index.is_empty());
        assert!(!index.collides(&body_at(0.0, 0.0)));
    }

    #[test]
    fn free_movement_applies_full_delta() {
        let index = ObstacleIndex::new(&[], 64.0);
        let end = resolve_movement(
            body_at(100.0, 100.0),
            Vec2 { x: 5.0, y: -3.0 },
            &index,
            1500.0,
            1000.0,
        );
        assert_eq!(end, Vec2 { x: 105.0, y: 97.0 });
    }

    #[test]
    fn blocked_axis_slides_along_the_free_one() {
        // Wall to the right of the body: x movement blocked, y free.
        let obstacles = vec![rect((130.0, 100.0), (20.0, 200.0))];
        let index = ObstacleIndex::new(&obstacles, 64.0);
        let end = resolve_movement(
            body_at(100.0, 100.0),
            Vec2 { x: 15.0, y: 8.0 },
            &index,
            1500.0,
            1000.0,
        );
        assert_eq!(end.x, 100.0);
        assert_eq!(end.y, 108.0);
    }

    #[test]
    fn movement_clamps_to_world_bounds() {
        let index = ObstacleIndex::new(&[], 64.0);
        let end = resolve_movement(
            body_at(12.0, 12.0),
            Vec2 { x: -50.0, y: -50.0 },
            &index,
            1500.0,
            1000.0,
        );
        assert_eq!(end, Vec2 { x: 10.0, y: 10.0 });

        let end = resolve_movement(
            body_at(1495.0, 995.0),
            Vec2 { x: 50.0, y: 50.0 },
            &index,
            1500.0,
            1000.0,
        );
        assert_eq!(end, Vec2 { x: 1490.0, y: 990.0 });
    }

    #[test]
    fn diagonal_into_a_corner_stops_both_axes() {
        let obstacles = vec![
            rect((130.0, 100.0), (20.0, 200.0)),
            rect((100.0, 130.0), (200.0, 20.0)),
        ];
        let index = ObstacleIndex::new(&obstacles, 64.0);
        let end = resolve_movement(
            body_at(100.0, 100.0),
            Vec2 { x: 15.0, y: 15.0 },
            &index,
            1500.0,
            1000.0,
        );
        assert_eq!(end, Vec2 { x: 100.0, y: 100.0 });
    }
}
