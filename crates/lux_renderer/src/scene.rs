//! Scene aggregate: a flat list of primitives intersected by linear scan.

use std::sync::Arc;

use crate::material::{Color, Dielectric, DiffuseLight, Lambertian, Metal};
use crate::mesh::mesh_triangles;
use crate::texture::{Hashed, NoiseTexture, Rainbow, SolidColor, Sunset, Texture};
use crate::{HitRecord, Hittable, Material, Quad, Sphere, Triangle, Volume};
use lux_core::Mesh;
use lux_math::{Aabb, Interval, Ray, Vec3};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Colour used when a material or texture selector is not recognised.
pub const FALLBACK_COLOR: Color = Color::new(2.55, 1.02, 2.55);

/// Scale of the Perlin texture selected by [`TextureKind::Perlin`].
const PERLIN_SCALE: f32 = 4.0;

/// Material families understood by the scene's convenience constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialKind {
    Specular,
    Diffuse,
    Dielectric,
    Emissive,
    /// Anything else; rendered with [`FALLBACK_COLOR`].
    Unknown(String),
}

impl From<&str> for MaterialKind {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "specular" => MaterialKind::Specular,
            "diffuse" => MaterialKind::Diffuse,
            "dielectric" => MaterialKind::Dielectric,
            "emissive" => MaterialKind::Emissive,
            _ => MaterialKind::Unknown(name.to_string()),
        }
    }
}

/// Texture selected by [`MaterialParams::texture`] for diffuse materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Solid,
    Sunset,
    Rainbow,
    Hashed,
    Perlin,
}

impl TextureKind {
    pub fn from_selector(selector: u32) -> Option<Self> {
        match selector {
            0 => Some(TextureKind::Solid),
            1 => Some(TextureKind::Sunset),
            2 => Some(TextureKind::Rainbow),
            3 => Some(TextureKind::Hashed),
            4 => Some(TextureKind::Perlin),
            _ => None,
        }
    }
}

/// Compact material parameters.
///
/// Colour channels are given in percent-like units and divided by 100 when
/// the material is built, so `(50, 50, 50)` is a mid grey and values above
/// 100 brighten (useful for lights).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MaterialParams {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    /// Roughness for specular materials
    pub fuzz: f32,
    /// Index of refraction for dielectrics
    pub refraction: f32,
    /// Texture selector for diffuse materials
    pub texture: u32,
}

impl MaterialParams {
    pub fn rgb(red: f32, green: f32, blue: f32) -> Self {
        Self {
            red,
            green,
            blue,
            ..Default::default()
        }
    }

    /// Parameters for a dielectric of the given index.
    pub fn refractive(refraction: f32) -> Self {
        Self {
            refraction,
            ..Default::default()
        }
    }

    pub fn with_fuzz(mut self, fuzz: f32) -> Self {
        self.fuzz = fuzz;
        self
    }

    pub fn with_texture(mut self, texture: u32) -> Self {
        self.texture = texture;
        self
    }

    /// The colour channels scaled down by 100.
    pub fn color(&self) -> Color {
        Color::new(self.red, self.green, self.blue) / 100.0
    }
}

/// A list of primitives with a running bounding box.
///
/// Intersection scans every member; wrap the objects in a
/// [`crate::BvhNode`] for large scenes.
pub struct Scene {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
    /// Vertical extent of the most recent convenience shape
    min_height: f32,
    max_height: f32,
    /// Source for the tables of procedural textures built by this scene
    rng: StdRng,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Empty scene whose procedural textures draw their tables from `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
            min_height: 0.0,
            max_height: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Scene with a large grey ground sphere below the origin.
    pub fn with_floor() -> Self {
        let mut scene = Self::new();
        scene.add_sphere(
            Vec3::new(0.0, -100.5, -1.0),
            100.0,
            MaterialKind::Diffuse,
            MaterialParams::rgb(50.0, 50.0, 50.0),
        );
        scene
    }

    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
        self.set_heights(0.0, 0.0);
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    pub fn max_height(&self) -> f32 {
        self.max_height
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, kind: MaterialKind, params: MaterialParams) {
        self.set_heights(center.y - radius, center.y + radius);
        let material = self.material(&kind, &params);
        self.add(Arc::new(Sphere::new(center, radius, material)));
    }

    pub fn add_moving_sphere(
        &mut self,
        center1: Vec3,
        center2: Vec3,
        radius: f32,
        kind: MaterialKind,
        params: MaterialParams,
    ) {
        self.set_heights(
            center1.y.min(center2.y) - radius,
            center1.y.max(center2.y) + radius,
        );
        let material = self.material(&kind, &params);
        self.add(Arc::new(Sphere::moving(center1, center2, radius, material)));
    }

    pub fn add_quad(&mut self, q: Vec3, u: Vec3, v: Vec3, kind: MaterialKind, params: MaterialParams) {
        let ys = [q.y, q.y + u.y, q.y + v.y, q.y + u.y + v.y];
        self.set_height_span(&ys);
        let material = self.material(&kind, &params);
        self.add(Arc::new(Quad::new(q, u, v, material)));
    }

    pub fn add_triangle(&mut self, q: Vec3, u: Vec3, v: Vec3, kind: MaterialKind, params: MaterialParams) {
        let ys = [q.y, q.y + u.y, q.y + v.y];
        self.set_height_span(&ys);
        let material = self.material(&kind, &params);
        self.add(Arc::new(Triangle::new(q, u, v, material)));
    }

    /// Fill `boundary` with a constant-density medium of the params' colour.
    pub fn add_volume(&mut self, boundary: Arc<dyn Hittable>, density: f32, params: MaterialParams) {
        let bbox = boundary.bounding_box();
        self.set_heights(bbox.y.min, bbox.y.max);
        self.add(Arc::new(Volume::new(boundary, density, params.color())));
    }

    /// Add every face of `mesh` as triangles sharing one material.
    ///
    /// Returns the number of triangles added.
    pub fn add_mesh(&mut self, mesh: &Mesh, kind: MaterialKind, params: MaterialParams) -> usize {
        self.set_heights(mesh.bounds.y.min, mesh.bounds.y.max);
        let material = self.material(&kind, &params);

        let triangles = mesh_triangles(mesh, material);
        let count = triangles.len();
        for triangle in triangles {
            self.add(triangle);
        }

        log::debug!("Added mesh '{}' as {} triangles", mesh.name, count);
        count
    }

    fn set_heights(&mut self, min_height: f32, max_height: f32) {
        self.min_height = min_height;
        self.max_height = max_height;
    }

    fn set_height_span(&mut self, ys: &[f32]) {
        let min = ys.iter().copied().fold(f32::INFINITY, f32::min);
        let max = ys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        self.set_heights(min, max);
    }

    /// Build a material from a kind and compact parameters.
    fn material(&mut self, kind: &MaterialKind, params: &MaterialParams) -> Arc<dyn Material> {
        let color = params.color();

        match kind {
            MaterialKind::Specular => Arc::new(Metal::new(color, params.fuzz)),
            MaterialKind::Diffuse => Arc::new(Lambertian::new(self.texture(params.texture, color))),
            MaterialKind::Dielectric => Arc::new(Dielectric::new(params.refraction)),
            MaterialKind::Emissive => Arc::new(DiffuseLight::from_color(color)),
            MaterialKind::Unknown(name) => {
                log::warn!("Unknown material '{}', using fallback colour", name);
                Arc::new(Lambertian::from_color(FALLBACK_COLOR))
            }
        }
    }

    fn texture(&mut self, selector: u32, color: Color) -> Arc<dyn Texture> {
        let rng: &mut dyn RngCore = &mut self.rng;

        match TextureKind::from_selector(selector) {
            Some(TextureKind::Solid) => Arc::new(SolidColor::new(color)),
            Some(TextureKind::Sunset) => Arc::new(Sunset::new(self.min_height, self.max_height)),
            Some(TextureKind::Rainbow) => Arc::new(Rainbow::new(self.min_height, self.max_height)),
            Some(TextureKind::Hashed) => Arc::new(Hashed::new(color, rng)),
            Some(TextureKind::Perlin) => Arc::new(NoiseTexture::new(PERLIN_SCALE, color, rng)),
            None => {
                log::warn!("Unknown texture selector {}, using fallback colour", selector);
                Arc::new(SolidColor::new(FALLBACK_COLOR))
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore) -> Option<HitRecord<'_>> {
        let mut closest: Option<HitRecord<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, closest_so_far), rng) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down_z() -> Ray {
        Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_material_kind_from_str() {
        assert_eq!(MaterialKind::from("diffuse"), MaterialKind::Diffuse);
        assert_eq!(MaterialKind::from("Specular"), MaterialKind::Specular);
        assert_eq!(MaterialKind::from("dielectric"), MaterialKind::Dielectric);
        assert_eq!(MaterialKind::from("emissive"), MaterialKind::Emissive);
        assert_eq!(MaterialKind::from("velvet"), MaterialKind::Unknown("velvet".into()));
    }

    #[test]
    fn test_params_color_scaled() {
        let params = MaterialParams::rgb(50.0, 100.0, 255.0);
        assert_eq!(params.color(), Color::new(0.5, 1.0, 2.55));
    }

    #[test]
    fn test_closest_hit_wins() {
        let mut scene = Scene::new();
        let grey = MaterialParams::rgb(50.0, 50.0, 50.0);
        scene.add_sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, MaterialKind::Diffuse, grey);
        scene.add_sphere(Vec3::new(0.0, 0.0, -4.0), 1.0, MaterialKind::Diffuse, grey);
        scene.add_sphere(Vec3::new(0.0, 0.0, -7.0), 1.0, MaterialKind::Diffuse, grey);

        let mut rng = StdRng::seed_from_u64(0);
        let rec = scene
            .hit(&down_z(), Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!((rec.t - 3.0).abs() < 1e-5);
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_bbox_tracks_additions() {
        let mut scene = Scene::new();
        assert!(scene.is_empty());

        let params = MaterialParams::rgb(80.0, 20.0, 20.0);
        scene.add_sphere(Vec3::new(-2.0, 0.0, 0.0), 1.0, MaterialKind::Diffuse, params);
        scene.add_quad(Vec3::new(0.0, 0.0, 0.0), Vec3::X * 5.0, Vec3::Y * 2.0, MaterialKind::Diffuse, params);

        let bbox = scene.bounding_box();
        assert_eq!(bbox.x, Interval::new(-3.0, 5.0));
        assert_eq!(bbox.y, Interval::new(-1.0, 2.0));
        assert_eq!((scene.min_height(), scene.max_height()), (0.0, 2.0));

        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.bounding_box(), Aabb::EMPTY);
    }

    #[test]
    fn test_with_floor() {
        let scene = Scene::with_floor();
        assert_eq!(scene.len(), 1);

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0));
        let rec = scene
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!(rec.p.y < -0.49);
    }

    #[test]
    fn test_unknown_material_falls_back() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut scene = Scene::new();
        scene.add_triangle(
            Vec3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            MaterialKind::from("velvet"),
            MaterialParams::rgb(10.0, 10.0, 10.0),
        );

        let mut rng = StdRng::seed_from_u64(0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(-0.5, -0.5, -2.0));
        let rec = scene
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        let scatter = rec.material.scatter(&ray, &rec, &mut rng).unwrap();
        assert_eq!(scatter.attenuation, FALLBACK_COLOR);
    }

    #[test]
    fn test_unknown_texture_selector_falls_back() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut scene = Scene::new();
        scene.add_sphere(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            MaterialKind::Diffuse,
            MaterialParams::rgb(10.0, 10.0, 10.0).with_texture(99),
        );

        let mut rng = StdRng::seed_from_u64(0);
        let rec = scene
            .hit(&down_z(), Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        let scatter = rec.material.scatter(&down_z(), &rec, &mut rng).unwrap();
        assert_eq!(scatter.attenuation, FALLBACK_COLOR);
    }

    #[test]
    fn test_emissive_and_specular_materials() {
        let mut scene = Scene::new();
        scene.add_sphere(
            Vec3::new(0.0, 0.0, -3.0),
            1.0,
            MaterialKind::Emissive,
            MaterialParams::rgb(400.0, 400.0, 400.0),
        );

        let mut rng = StdRng::seed_from_u64(0);
        let rec = scene
            .hit(&down_z(), Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert_eq!(rec.material.emitted(rec.u, rec.v, rec.p), Color::splat(4.0));
        assert!(rec.material.scatter(&down_z(), &rec, &mut rng).is_none());
    }

    #[test]
    fn test_clear_resets_heights() {
        let mut scene = Scene::new();
        scene.add_sphere(
            Vec3::new(0.0, 10.0, -3.0),
            2.0,
            MaterialKind::Diffuse,
            MaterialParams::rgb(50.0, 50.0, 50.0),
        );
        assert_eq!((scene.min_height(), scene.max_height()), (8.0, 12.0));

        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.bounding_box(), Aabb::EMPTY);
        assert_eq!((scene.min_height(), scene.max_height()), (0.0, 0.0));
    }

    #[test]
    fn test_volume_added_with_boundary_box() {
        let mut scene = Scene::new();
        let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
            Vec3::new(0.0, 1.0, -3.0),
            1.0,
            Arc::new(Dielectric::new(1.5)),
        ));
        scene.add_volume(boundary, 0.2, MaterialParams::rgb(100.0, 100.0, 100.0));

        assert_eq!(scene.len(), 1);
        assert_eq!((scene.min_height(), scene.max_height()), (0.0, 2.0));
    }
}
