//! Simple path tracer example.
//!
//! Renders a field of random spheres plus a smoke ball and saves to PPM.

use std::sync::Arc;

use lux_renderer::{
    render, save_ppm, BvhNode, Camera, Color, Dielectric, Hittable, Lambertian, LogSink,
    Material, Metal, RenderConfig, RenderError, Sphere, Vec3, Volume,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), RenderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start = std::time::Instant::now();
    let world = build_scene();
    log::info!("Scene built in {:?}", start.elapsed());

    let mut camera = Camera::new(800, 450, Color::new(0.7, 0.8, 1.0)).with_lens(0.6, 10.0);
    camera.configure(
        20.0,
        Vec3::new(13.0, 2.0, 3.0), // look_from
        Vec3::new(0.0, 0.0, 0.0),  // look_at
        Vec3::new(0.0, 1.0, 0.0),  // vup
    );

    let config = RenderConfig {
        samples_per_pixel: 50,
        max_depth: 10,
        ..Default::default()
    };

    let image = render(&camera, &world, &config, &LogSink)?;
    save_ppm(&image, "output.ppm")
}

fn build_scene() -> BvhNode {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut objects: Vec<Arc<dyn Hittable>> = Vec::new();

    let ground: Arc<dyn Material> = Arc::new(Lambertian::from_color(Color::new(0.5, 0.5, 0.5)));
    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)));

    // Three main spheres
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    objects.push(Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass.clone())));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::from_color(Color::new(0.4, 0.2, 0.1))),
    )));
    objects.push(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    // Small random spheres
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material: Arc<dyn Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Arc::new(Lambertian::from_color(albedo))
            } else if choose_mat < 0.95 {
                let albedo = Color::splat(0.5) + 0.5 * Color::new(rng.gen(), rng.gen(), rng.gen());
                Arc::new(Metal::new(albedo, 0.5 * rng.gen::<f32>()))
            } else {
                glass.clone()
            };

            // A few spheres drift upward during the shutter
            if choose_mat < 0.2 {
                let center2 = center + Vec3::new(0.0, 0.5 * rng.gen::<f32>(), 0.0);
                objects.push(Arc::new(Sphere::moving(center, center2, 0.2, material)));
            } else {
                objects.push(Arc::new(Sphere::new(center, 0.2, material)));
            }
        }
    }

    // Smoke inside a glass shell
    let shell: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(0.0, 1.0, 3.0), 0.8, glass));
    objects.push(Arc::new(Volume::new(shell, 1.5, Color::new(0.2, 0.4, 0.9))));

    log::info!("Created {} objects", objects.len());
    BvhNode::new(objects)
}
