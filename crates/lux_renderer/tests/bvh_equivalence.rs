//! The BVH must report exactly the hits a linear scan of the same
//! primitives reports.

use std::sync::Arc;

use lux_renderer::{
    random_unit_vector, random_vec3, BvhNode, Hittable, Interval, Lambertian, Material, Quad,
    Ray, Scene, Sphere, Triangle, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn material() -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
}

fn sparse_scene(rng: &mut StdRng) -> Scene {
    let mut scene = Scene::new();
    for i in 0..40 {
        let center = Vec3::new((i % 8) as f32 * 4.0 - 16.0, (i / 8) as f32 * 4.0 - 8.0, -20.0);
        scene.add(Arc::new(Sphere::new(
            center + random_vec3(rng, -0.5, 0.5),
            0.8,
            material(),
        )));
    }
    scene
}

fn dense_scene(rng: &mut StdRng) -> Scene {
    let mut scene = Scene::new();
    for _ in 0..60 {
        let center = random_vec3(rng, -3.0, 3.0) + Vec3::new(0.0, 0.0, -10.0);
        scene.add(Arc::new(Sphere::new(center, 1.5, material())));
    }
    for _ in 0..20 {
        let q = random_vec3(rng, -4.0, 4.0) + Vec3::new(0.0, 0.0, -10.0);
        let u = random_vec3(rng, -2.0, 2.0);
        let v = random_vec3(rng, -2.0, 2.0);
        scene.add(Arc::new(Triangle::new(q, u, v, material())));
        scene.add(Arc::new(Quad::new(q + u, v, u, material())));
    }
    scene
}

fn single_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add(Arc::new(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 2.0, material())));
    scene
}

fn assert_equivalent(scene: &Scene, rng: &mut StdRng) {
    let bvh = BvhNode::from_scene(scene);
    let ray_t = Interval::new(0.001, f32::INFINITY);
    let mut hits = 0;

    for _ in 0..2000 {
        let origin = random_vec3(rng, -2.0, 2.0);
        let direction = random_unit_vector(rng) + Vec3::new(0.0, 0.0, -1.5);
        let ray = Ray::new(origin, direction, 0.0);

        // Neither aggregate consumes randomness for surface primitives
        let linear = scene.hit(&ray, ray_t, rng);
        let tree = bvh.hit(&ray, ray_t, rng);

        match (linear, tree) {
            (None, None) => {}
            (Some(a), Some(b)) => {
                hits += 1;
                assert_eq!(a.t, b.t);
                assert_eq!(a.p, b.p);
                assert_eq!(a.normal, b.normal);
                assert_eq!(a.front_face, b.front_face);
            }
            (a, b) => panic!(
                "linear scan {:?} disagrees with tree {:?} for {:?}",
                a.map(|r| r.t),
                b.map(|r| r.t),
                ray
            ),
        }
    }

    assert!(hits > 0, "rays never hit the scene");
}

#[test]
fn test_bvh_matches_linear_scan_sparse() {
    let mut rng = StdRng::seed_from_u64(101);
    let scene = sparse_scene(&mut rng);
    assert_equivalent(&scene, &mut rng);
}

#[test]
fn test_bvh_matches_linear_scan_dense() {
    let mut rng = StdRng::seed_from_u64(102);
    let scene = dense_scene(&mut rng);
    assert_equivalent(&scene, &mut rng);
}

#[test]
fn test_bvh_matches_linear_scan_single() {
    let mut rng = StdRng::seed_from_u64(103);
    let scene = single_scene();
    assert_equivalent(&scene, &mut rng);
}

#[test]
fn test_bvh_bbox_matches_scene_bbox() {
    let mut rng = StdRng::seed_from_u64(104);
    let scene = dense_scene(&mut rng);
    let bvh = BvhNode::from_scene(&scene);

    assert_eq!(bvh.bounding_box(), scene.bounding_box());
    assert_eq!(scene.len(), 100);
}
