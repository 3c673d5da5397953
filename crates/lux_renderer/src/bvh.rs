//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared primitives. Every node is itself a
//! [`Hittable`], so a tree can be nested inside a scene or another tree.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::{HitRecord, Hittable, Scene};
use lux_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// BVH node - either a branch with two children or an empty tree.
pub enum BvhNode {
    /// Internal node. For a single primitive both children are that primitive.
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Tree built from no primitives; never hit.
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            return BvhNode::Empty;
        }

        let node = Self::build(&mut objects);
        log::debug!("Built BVH over {} primitives", objects.len());
        node
    }

    /// Build a tree over a scene's primitives. The scene keeps its own list.
    pub fn from_scene(scene: &Scene) -> Self {
        Self::new(scene.objects().to_vec())
    }

    /// Recursive median split.
    ///
    /// Sorts `objects` in place by the lower bound of the longest axis of
    /// their combined box, then splits the slice in half.
    fn build(objects: &mut [Arc<dyn Hittable>]) -> Self {
        let bbox = objects.iter().fold(Aabb::EMPTY, |acc, obj| {
            Aabb::surrounding(&acc, &obj.bounding_box())
        });

        let axis = bbox.longest_axis();

        let (left, right): (Arc<dyn Hittable>, Arc<dyn Hittable>) = match objects.len() {
            1 => (objects[0].clone(), objects[0].clone()),
            2 => (objects[0].clone(), objects[1].clone()),
            _ => {
                objects.sort_by(|a, b| Self::box_compare(a.as_ref(), b.as_ref(), axis));

                let mid = objects.len() / 2;
                let (left_objects, right_objects) = objects.split_at_mut(mid);

                let left: Arc<dyn Hittable> = Arc::new(Self::build(left_objects));
                let right: Arc<dyn Hittable> = Arc::new(Self::build(right_objects));
                (left, right)
            }
        };

        BvhNode::Branch { left, right, bbox }
    }

    fn box_compare(a: &dyn Hittable, b: &dyn Hittable, axis: usize) -> Ordering {
        let a_min = a.bounding_box().axis_interval(axis).min;
        let b_min = b.bounding_box().axis_interval(axis).min;
        a_min.partial_cmp(&b_min).unwrap_or(Ordering::Equal)
    }
}

impl Hittable for BvhNode {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Branch { left, right, bbox } => {
                bbox.hit(ray, ray_t)?;

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
