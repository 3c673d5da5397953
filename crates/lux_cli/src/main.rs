//! Lux CLI - render one of the built-in demo scenes to an image file.
//!
//! Usage: `lux_cli <scene> [output] [config.json]`

use std::env;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use lux_core::Mesh;
use lux_renderer::{
    render, save_png, save_ppm, BvhNode, Camera, Checker, Color, Dielectric, Hittable, Lambertian,
    LogSink, MaterialKind, MaterialParams, RenderConfig, Scene, Sphere, Vec3, DEFAULT_DENSITY,
};

const IMAGE_WIDTH: u32 = 400;
const IMAGE_HEIGHT: u32 = 225;
const SKY: Color = Color::new(0.7, 0.8, 1.0);
const SCENE_NAMES: &str = "spheres, triangles, materials, lights, volumes, motion, textures, perlin, mesh:<path.obj>";

/// The demo scenes this binary knows how to build.
#[derive(Debug, Clone, PartialEq)]
enum DemoScene {
    Spheres,
    Triangles,
    Materials,
    Lights,
    Volumes,
    Motion,
    Textures,
    Perlin,
    Mesh(String),
}

impl FromStr for DemoScene {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        if let Some(path) = name.strip_prefix("mesh:") {
            if path.is_empty() {
                return Err(anyhow!("mesh scene needs a path, e.g. mesh:models/teapot.obj"));
            }
            return Ok(DemoScene::Mesh(path.to_string()));
        }

        match name {
            "spheres" => Ok(DemoScene::Spheres),
            "triangles" => Ok(DemoScene::Triangles),
            "materials" => Ok(DemoScene::Materials),
            "lights" => Ok(DemoScene::Lights),
            "volumes" => Ok(DemoScene::Volumes),
            "motion" => Ok(DemoScene::Motion),
            "textures" => Ok(DemoScene::Textures),
            "perlin" => Ok(DemoScene::Perlin),
            _ => Err(anyhow!("unknown scene '{}' (expected one of: {})", name, SCENE_NAMES)),
        }
    }
}

impl DemoScene {
    /// Build the scene contents and a camera framing them.
    fn build(&self) -> Result<(Scene, Camera)> {
        let mut camera = Camera::new(IMAGE_WIDTH, IMAGE_HEIGHT, SKY);

        let scene = match self {
            DemoScene::Spheres => {
                camera.configure(90.0, Vec3::new(0.0, 2.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
                spheres()
            }
            DemoScene::Triangles => {
                camera.configure(80.0, Vec3::new(0.0, 0.0, 9.0), Vec3::ZERO, Vec3::Y);
                triangles()
            }
            DemoScene::Materials => {
                camera.configure(20.0, Vec3::new(-2.0, 2.0, 1.0), Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
                materials()
            }
            DemoScene::Lights => {
                camera = Camera::new(IMAGE_WIDTH, IMAGE_HEIGHT, Color::ZERO);
                camera.configure(20.0, Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y);
                lights()
            }
            DemoScene::Volumes => {
                camera.configure(30.0, Vec3::new(0.0, 2.0, 9.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
                volumes()
            }
            DemoScene::Motion => {
                camera.configure(20.0, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
                motion()
            }
            DemoScene::Textures => {
                camera.configure(25.0, Vec3::new(0.0, 3.0, 12.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
                textures()
            }
            DemoScene::Perlin => {
                camera.configure(20.0, Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y);
                perlin()
            }
            DemoScene::Mesh(path) => {
                camera.configure(40.0, Vec3::new(0.0, 2.0, 8.0), Vec3::ZERO, Vec3::Y);
                mesh(path)?
            }
        };

        Ok((scene, camera))
    }
}

fn ground(scene: &mut Scene) {
    scene.add_sphere(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        MaterialKind::Diffuse,
        MaterialParams::rgb(50.0, 50.0, 50.0),
    );
}

fn spheres() -> Scene {
    let mut scene = Scene::new();
    ground(&mut scene);

    let brown = MaterialParams::rgb(40.0, 20.0, 10.0);
    scene.add_sphere(Vec3::new(6.0, 3.0, 0.0), 3.0, MaterialKind::Diffuse, brown);
    scene.add_sphere(Vec3::new(0.0, 2.0, 0.0), 2.0, MaterialKind::Diffuse, brown);
    scene.add_sphere(Vec3::new(-5.0, 1.0, 0.0), 1.0, MaterialKind::Diffuse, brown);
    scene
}

fn triangles() -> Scene {
    let mut scene = Scene::new();
    let diffuse = MaterialKind::Diffuse;

    // Back wall as a quad with two triangles and a tilted quad in front
    scene.add_quad(
        Vec3::new(-4.0, -3.0, -2.0),
        Vec3::new(8.0, 0.0, 0.0),
        Vec3::new(0.0, 6.0, 0.0),
        diffuse.clone(),
        MaterialParams::rgb(20.0, 100.0, 20.0),
    );
    scene.add_triangle(
        Vec3::new(-3.0, -2.0, 0.0),
        Vec3::new(2.5, 0.0, 0.0),
        Vec3::new(0.0, 3.5, 0.0),
        diffuse.clone(),
        MaterialParams::rgb(100.0, 20.0, 20.0),
    );
    scene.add_triangle(
        Vec3::new(0.5, -2.0, 0.0),
        Vec3::new(2.5, 0.0, 0.0),
        Vec3::new(1.25, 3.5, 1.0),
        diffuse.clone(),
        MaterialParams::rgb(20.0, 20.0, 100.0),
    );
    scene.add_quad(
        Vec3::new(-1.0, 1.5, 1.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 1.0, 1.0),
        diffuse,
        MaterialParams::rgb(100.0, 100.0, 20.0),
    );
    scene
}

fn materials() -> Scene {
    let mut scene = Scene::with_floor();

    scene.add_sphere(
        Vec3::new(0.0, 0.0, -1.2),
        0.5,
        MaterialKind::Diffuse,
        MaterialParams::rgb(10.0, 20.0, 50.0),
    );
    // Hollow glass: outer shell plus an inverted inner surface
    scene.add_sphere(
        Vec3::new(-1.0, 0.0, -1.0),
        0.5,
        MaterialKind::Dielectric,
        MaterialParams::refractive(1.5),
    );
    scene.add_sphere(
        Vec3::new(-1.0, 0.0, -1.0),
        0.4,
        MaterialKind::Dielectric,
        MaterialParams::refractive(1.0 / 1.5),
    );
    scene.add_sphere(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        MaterialKind::Specular,
        MaterialParams::rgb(80.0, 60.0, 20.0).with_fuzz(0.3),
    );
    scene
}

fn lights() -> Scene {
    let mut scene = Scene::new();
    ground(&mut scene);

    scene.add_sphere(
        Vec3::new(0.0, 2.0, 0.0),
        2.0,
        MaterialKind::Diffuse,
        MaterialParams::rgb(40.0, 20.0, 10.0).with_texture(4),
    );
    scene.add_quad(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        MaterialKind::Emissive,
        MaterialParams::rgb(400.0, 400.0, 400.0),
    );
    scene.add_sphere(
        Vec3::new(0.0, 7.0, 0.0),
        2.0,
        MaterialKind::Emissive,
        MaterialParams::rgb(400.0, 400.0, 400.0),
    );
    scene
}

fn volumes() -> Scene {
    let mut scene = Scene::new();
    ground(&mut scene);

    // Smoke and fog balls with a glass-shelled blue haze between them
    let smoke: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(-2.2, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::from_color(Color::ZERO)),
    ));
    scene.add_volume(smoke, 1.0, MaterialParams::rgb(0.0, 0.0, 0.0));

    let fog: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(2.2, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::from_color(Color::ONE)),
    ));
    scene.add_volume(fog, 1.0, MaterialParams::rgb(100.0, 100.0, 100.0));

    let shell: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    scene.add(shell.clone());
    scene.add_volume(shell, DEFAULT_DENSITY * 20.0, MaterialParams::rgb(20.0, 40.0, 90.0));
    scene
}

fn motion() -> Scene {
    let mut scene = Scene::new();
    ground(&mut scene);

    for (i, x) in [-4.0_f32, -2.0, 0.0, 2.0, 4.0].into_iter().enumerate() {
        let center = Vec3::new(x, 0.5, 0.0);
        let rise = Vec3::new(0.0, 0.25 * i as f32, 0.0);
        scene.add_moving_sphere(
            center,
            center + rise,
            0.5,
            MaterialKind::Diffuse,
            MaterialParams::rgb(20.0 * i as f32, 40.0, 80.0 - 15.0 * i as f32),
        );
    }
    scene
}

fn textures() -> Scene {
    let mut scene = Scene::new();

    let checker = Checker::from_colors(0.5, Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    scene.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(Arc::new(checker))),
    )));

    // Selectors: 1 sunset, 2 rainbow, 3 hashed
    let tint = MaterialParams::rgb(94.0, 157.0, 52.0);
    scene.add_sphere(Vec3::new(-2.5, 1.0, 0.0), 1.0, MaterialKind::Diffuse, tint.with_texture(1));
    scene.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, MaterialKind::Diffuse, tint.with_texture(2));
    scene.add_sphere(Vec3::new(2.5, 1.0, 0.0), 1.0, MaterialKind::Diffuse, tint.with_texture(3));
    scene
}

fn perlin() -> Scene {
    let mut scene = Scene::new();
    let marble = MaterialParams::rgb(100.0, 100.0, 100.0).with_texture(4);

    scene.add_sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, MaterialKind::Diffuse, marble);
    scene.add_sphere(Vec3::new(0.0, 2.0, 0.0), 2.0, MaterialKind::Diffuse, marble);
    scene
}

fn mesh(path: &str) -> Result<Scene> {
    let meshes = Mesh::load_obj(path).with_context(|| format!("Failed to load mesh {}", path))?;

    let mut scene = Scene::with_floor();
    let mut triangles = 0;
    for mesh in &meshes {
        triangles += scene.add_mesh(mesh, MaterialKind::Diffuse, MaterialParams::rgb(70.0, 70.0, 70.0));
    }

    log::info!("Loaded {} mesh(es), {} triangles from {}", meshes.len(), triangles, path);
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <scene> [output] [config.json]", args[0]);
        eprintln!("Scenes: {}", SCENE_NAMES);
        std::process::exit(1);
    }

    let demo: DemoScene = args[1].parse()?;
    let output = args.get(2).map(String::as_str).unwrap_or("output.png");
    let config = match args.get(3) {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("Failed to read render config {}", path))?,
        None => RenderConfig::default(),
    };

    let start = Instant::now();
    let (scene, camera) = demo.build()?;
    let world = BvhNode::from_scene(&scene);
    log::info!("Built {:?} scene with {} objects in {:?}", demo, scene.len(), start.elapsed());

    let image = render(&camera, &world, &config, &LogSink)?;

    let is_ppm = Path::new(output)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));
    if is_ppm {
        save_ppm(&image, output)?;
    } else {
        save_png(&image, output)?;
    }

    log::info!("Wrote {} in {:?}", output, start.elapsed());
    Ok(())
}
