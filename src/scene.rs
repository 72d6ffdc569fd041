use nalgebra::{Point3, Vector3};

use crate::math;

#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(u32);

/// Primitive shapes.
#[derive(Debug)]
pub enum Prim {
    /// A sphere with the given center and radius.
    Sphere { center: Point3<f32>, radius: f32 },

    /// A horizontal plane at the given height, bounding everything below it.
    Plane { height: f32 },

    /// An axis-aligned box at the origin with the given half-extents.
    Box { half_extents: Vector3<f32> },
}

/// Nodes in the scene graph.
#[derive(Debug)]
pub enum Node {
    /// Primitive shapes.
    Prim { prim: Prim },

    /// The union of a group of nodes.
    Union { nodes: Vec<NodeId> },

    /// Subtracting the right node from the left.
    Subtract { left: NodeId, right: NodeId },

    /// A smooth union of two nodes.
    SmoothUnion { k: f32, left: NodeId, right: NodeId },

    /// Evaluate the node in a cell that repeats with this period. Axes whose
    /// period is zero or less are not repeated.
    Repeat { period: Vector3<f32>, node: NodeId },
}

/// A signed distance to the scene. Negative values are inside of an object,
/// and the ordering puts NaN values after everything else.
#[derive(Debug, Default, Clone, Copy)]
pub struct Distance(pub f32);

impl Scene {
    #[inline]
    fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Fetch a node from the scene.
    #[inline]
    pub fn node(&self, NodeId(id): NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Construct a sphere with this center and radius.
    pub fn sphere(&mut self, center: Point3<f32>, radius: f32) -> NodeId {
        self.add_node(Node::Prim {
            prim: Prim::Sphere { center, radius },
        })
    }

    /// Construct a horizontal ground plane at this height.
    pub fn plane(&mut self, height: f32) -> NodeId {
        self.add_node(Node::Prim {
            prim: Prim::Plane { height },
        })
    }

    /// Construct an axis-aligned box at the origin with these half-extents.
    pub fn rect(&mut self, half_extents: Vector3<f32>) -> NodeId {
        self.add_node(Node::Prim {
            prim: Prim::Box { half_extents },
        })
    }

    /// Construct the union of a group of nodes.
    pub fn union(&mut self, nodes: Vec<NodeId>) -> NodeId {
        assert!(!nodes.is_empty(), "no nodes given to `union`");
        self.add_node(Node::Union { nodes })
    }

    /// Construct the subtraction of the right node from the left.
    pub fn subtract(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.add_node(Node::Subtract { left, right })
    }

    /// Construct the smooth union of a group of nodes by splitting the group
    /// into a tree of pairwise blends, each with blend radius `k`.
    pub fn smooth_union(&mut self, k: f32, nodes: &[NodeId]) -> NodeId {
        match nodes.len() {
            0 => panic!("no nodes given to `smooth_union`"),
            1 => nodes[0],
            len => {
                let (ls, rs) = nodes.split_at(len / 2);
                let left = self.smooth_union(k, ls);
                let right = self.smooth_union(k, rs);
                self.add_node(Node::SmoothUnion { k, left, right })
            }
        }
    }

    /// Repeat the node in cells of this period, centered on the origin.
    pub fn repeat(&mut self, period: Vector3<f32>, node: NodeId) -> NodeId {
        self.add_node(Node::Repeat { period, node })
    }

    /// Evaluate the distance field rooted at `root` at `point`.
    pub fn distance(&self, root: NodeId, point: &Point3<f32>) -> Distance {
        self.node(root).distance(self, point)
    }
}

impl Prim {
    /// The signed distance from `point` to the surface of the primitive.
    pub fn distance(&self, point: &Point3<f32>) -> Distance {
        match self {
            Prim::Sphere { center, radius } => Distance((point - center).norm() - radius),

            Prim::Plane { height } => Distance(point.y - height),

            Prim::Box { half_extents } => {
                let q = point.coords.abs() - half_extents;
                let outside = Vector3::new(q.x.max(0.), q.y.max(0.), q.z.max(0.)).norm();
                Distance(outside + q.x.max(q.y).max(q.z).min(0.))
            }
        }
    }
}

impl Node {
    /// The signed distance from `point` to this node of the scene.
    pub fn distance(&self, scene: &Scene, point: &Point3<f32>) -> Distance {
        match self {
            Node::Prim { prim } => prim.distance(point),

            Node::Union { nodes } => nodes
                .iter()
                .map(|node| scene.node(*node).distance(scene, point))
                .min()
                .unwrap_or(Distance(f32::INFINITY)),

            Node::Subtract { left, right } => {
                let left = scene.node(*left).distance(scene, point);
                let right = scene.node(*right).distance(scene, point);
                Distance(left.0.max(-right.0))
            }

            Node::SmoothUnion { k, left, right } => {
                let left = scene.node(*left).distance(scene, point);
                let right = scene.node(*right).distance(scene, point);
                Distance(math::smin(left.0, right.0, *k))
            }

            Node::Repeat { period, node } => {
                let mut cell = *point;
                if period.x > 0. {
                    cell.x = math::wrap(cell.x, period.x);
                }
                if period.y > 0. {
                    cell.y = math::wrap(cell.y, period.y);
                }
                if period.z > 0. {
                    cell.z = math::wrap(cell.z, period.z);
                }
                scene.node(*node).distance(scene, &cell)
            }
        }
    }
}

impl PartialEq for Distance {
    fn eq(&self, other: &Distance) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Distance {}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Distance) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Distance {
    fn cmp(&self, other: &Distance) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or_else(|| {
            if self.0.is_nan() {
                std::cmp::Ordering::Greater
            } else {
                std::cmp::Ordering::Less
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::{Point3, Vector3};

    use super::{Distance, Scene};

    #[test]
    fn test_distance_ord() {
        assert!(Distance(1.) < Distance(2.));
        assert!(Distance(-1.) < Distance(1.));
        assert!(Distance(1.) < Distance(f32::NAN));
        assert!(Distance(f32::INFINITY) < Distance(f32::NAN));
    }

    #[test]
    fn test_sphere() {
        let mut scene = Scene::default();
        let root = scene.sphere(Point3::new(0., 1., 0.), 1.);

        assert_eq!(scene.distance(root, &Point3::new(0., 3., 0.)).0, 1.);
        assert_eq!(scene.distance(root, &Point3::new(0., 2., 0.)).0, 0.);
        assert_eq!(scene.distance(root, &Point3::new(0., 1., 0.)).0, -1.);
    }

    #[test]
    fn test_sphere_lipschitz() {
        let mut scene = Scene::default();
        let root = scene.sphere(Point3::new(0.5, -1., 2.), 1.5);

        let points = [
            Point3::origin(),
            Point3::new(0.5, -1., 2.),
            Point3::new(3., 4., -5.),
            Point3::new(-2., 0.25, 1.),
            Point3::new(0.5, 0.5, 2.),
        ];

        // the field never changes faster than the distance traveled
        for p in &points {
            for q in &points {
                let dp = scene.distance(root, p).0;
                let dq = scene.distance(root, q).0;
                assert!((dp - dq).abs() <= (p - q).norm() + 1e-6);
            }
        }
    }

    #[test]
    fn test_plane() {
        let mut scene = Scene::default();
        let root = scene.plane(0.);

        assert_eq!(scene.distance(root, &Point3::new(10., 2.5, -3.)).0, 2.5);
        assert_eq!(scene.distance(root, &Point3::new(0., -1., 0.)).0, -1.);
    }

    #[test]
    fn test_box() {
        let mut scene = Scene::default();
        let root = scene.rect(Vector3::new(1., 2., 3.));

        // distance to a face
        assert_eq!(scene.distance(root, &Point3::new(3., 0., 0.)).0, 2.);

        // the center is one unit from the nearest face
        assert_eq!(scene.distance(root, &Point3::origin()).0, -1.);

        // distance to a corner
        assert_abs_diff_eq!(
            scene.distance(root, &Point3::new(2., 3., 4.)).0,
            3f32.sqrt(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_union() {
        let mut scene = Scene::default();
        let a = scene.sphere(Point3::new(-2., 0., 0.), 1.);
        let b = scene.sphere(Point3::new(2., 0., 0.), 1.);
        let root = scene.union(vec![a, b]);

        // each probe sees the closer sphere
        assert_eq!(scene.distance(root, &Point3::new(-2., 0., 0.)).0, -1.);
        assert_eq!(scene.distance(root, &Point3::new(2., 2., 0.)).0, 1.);
        assert_eq!(scene.distance(root, &Point3::origin()).0, 1.);
    }

    #[test]
    fn test_subtract() {
        let mut scene = Scene::default();
        let outer = scene.sphere(Point3::origin(), 1.);
        let inner = scene.sphere(Point3::origin(), 0.5);
        let root = scene.subtract(outer, inner);

        // the carved-out core is outside the shell
        assert_eq!(scene.distance(root, &Point3::origin()).0, 0.5);

        // midway through the shell wall
        assert_eq!(scene.distance(root, &Point3::new(0.75, 0., 0.)).0, -0.25);

        // outside is unchanged
        assert_eq!(scene.distance(root, &Point3::new(2., 0., 0.)).0, 1.);
    }

    #[test]
    fn test_smooth_union() {
        let mut scene = Scene::default();
        let a = scene.sphere(Point3::new(-1., 0., 0.), 0.5);
        let b = scene.sphere(Point3::new(1., 0., 0.), 0.5);
        let root = scene.smooth_union(0.75, &[a, b]);

        for point in [
            Point3::origin(),
            Point3::new(-1., 0.2, 0.),
            Point3::new(0.5, -0.5, 0.5),
        ] {
            let blended = scene.distance(root, &point).0;
            let hard = scene
                .distance(a, &point)
                .0
                .min(scene.distance(b, &point).0);
            assert!(blended <= hard + 1e-6);
        }

        // once the two fields differ by more than `k` the union is exact
        let far = Point3::new(-5., 0., 0.);
        assert_abs_diff_eq!(
            scene.distance(root, &far).0,
            scene.distance(a, &far).0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_smooth_union_singleton() {
        let mut scene = Scene::default();
        let a = scene.sphere(Point3::origin(), 1.);
        assert_eq!(scene.smooth_union(0.5, &[a]), a);
    }

    #[test]
    fn test_repeat() {
        let mut scene = Scene::default();
        let sphere = scene.sphere(Point3::new(0., 1., 0.), 1.);
        let root = scene.repeat(Vector3::new(3., 0., 3.), sphere);

        let probe = Point3::new(0.3, 1.2, -0.7);
        let d = scene.distance(root, &probe).0;

        // the field repeats on x and z
        for cell in [
            Vector3::new(3., 0., 3.),
            Vector3::new(-6., 0., 9.),
            Vector3::new(300., 0., 0.),
        ] {
            assert_abs_diff_eq!(scene.distance(root, &(probe + cell)).0, d, epsilon = 1e-3);
        }

        // but not on y
        let above = probe + Vector3::new(0., 3., 0.);
        assert!((scene.distance(root, &above).0 - d).abs() > 0.5);
    }
}
