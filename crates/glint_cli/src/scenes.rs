//! Built-in scene presets.
//!
//! Each preset returns the scene root together with the camera it was
//! composed for. Random placement draws from the generator passed in, so a
//! preset is reproducible for a given seed.

use std::sync::Arc;

use clap::ValueEnum;
use glint_core::{CameraSettings, ImageData};
use glint_math::Vec3;
use glint_renderer::sampling::{gen_f32, gen_range_f32, random_vec3};
use glint_renderer::{
    cuboid, BvhNode, Color, ConstantMedium, Dielectric, DiffuseLight, HittableList, Lambertian,
    Material, Metal, Perlin, Primitive, Quad, Rotate, Sphere, Texture, Translate,
};
use rand::RngCore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneName {
    /// Field of small spheres, some moving, on a checkered ground
    BouncingSpheres,
    CheckeredSpheres,
    /// Image-textured globe
    Earth,
    PerlinSpheres,
    Quads,
    /// Noise spheres lit by an emissive quad and sphere
    SimpleLight,
    CornellBox,
    /// Cornell box with the two blocks replaced by smoke
    CornellSmoke,
    /// Everything at once
    Final,
}

pub struct Scene {
    pub world: Arc<Primitive>,
    pub camera: CameraSettings,
}

pub fn build(name: SceneName, rng: &mut dyn RngCore) -> Scene {
    match name {
        SceneName::BouncingSpheres => bouncing_spheres(rng),
        SceneName::CheckeredSpheres => checkered_spheres(),
        SceneName::Earth => earth(),
        SceneName::PerlinSpheres => perlin_spheres(rng),
        SceneName::Quads => quads(),
        SceneName::SimpleLight => simple_light(rng),
        SceneName::CornellBox => cornell_box(),
        SceneName::CornellSmoke => cornell_smoke(),
        SceneName::Final => final_scene(rng),
    }
}

fn shared(material: impl Into<Material>) -> Arc<Material> {
    Arc::new(material.into())
}

fn node(object: impl Into<Primitive>) -> Arc<Primitive> {
    Arc::new(object.into())
}

/// Wrap a list in a BVH, or keep the list when it is empty.
fn accelerate(list: HittableList, rng: &mut dyn RngCore) -> Arc<Primitive> {
    match BvhNode::from_list(&list, rng) {
        Some(bvh) => node(bvh),
        None => node(list),
    }
}

fn random_color(rng: &mut dyn RngCore, min: f32, max: f32) -> Color {
    random_vec3(rng, min, max)
}

/// Camera looking at the origin from (13, 2, 3), as most small scenes use.
fn overview_camera() -> CameraSettings {
    CameraSettings {
        aspect_ratio: 16.0 / 9.0,
        image_width: 400,
        samples_per_pixel: 100,
        max_depth: 50,
        vfov: 20.0,
        look_from: Vec3::new(13.0, 2.0, 3.0),
        look_at: Vec3::ZERO,
        vup: Vec3::Y,
        defocus_angle: 0.0,
        focus_dist: 10.0,
        background: Color::new(0.70, 0.80, 1.00),
    }
}

fn bouncing_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let checker = Texture::checker(0.32, Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        shared(Lambertian::from_texture(checker)),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Vec3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse, bouncing
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                let center2 = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(Sphere::moving(center, center2, 0.2, shared(Lambertian::new(albedo))));
            } else if choose_mat < 0.95 {
                // metal
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                world.add(Sphere::new(center, 0.2, shared(Metal::new(albedo, fuzz))));
            } else {
                // glass
                world.add(Sphere::new(center, 0.2, shared(Dielectric::new(1.5))));
            }
        }
    }

    world.add(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        shared(Dielectric::new(1.5)),
    ));
    world.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        shared(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    ));
    world.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        shared(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    Scene {
        world: accelerate(world, rng),
        camera: CameraSettings {
            defocus_angle: 0.6,
            ..overview_camera()
        },
    }
}

fn checkered_spheres() -> Scene {
    let mut world = HittableList::new();
    for y in [-10.0, 10.0] {
        let checker = Texture::checker(0.32, Color::new(0.2, 0.3, 0.1), Color::splat(0.9));
        world.add(Sphere::new(
            Vec3::new(0.0, y, 0.0),
            10.0,
            shared(Lambertian::from_texture(checker)),
        ));
    }

    Scene {
        world: node(world),
        camera: overview_camera(),
    }
}

fn earth() -> Scene {
    let texture = Texture::image(ImageData::locate("earthmap.jpg"));
    let globe = Sphere::new(Vec3::ZERO, 2.0, shared(Lambertian::from_texture(texture)));

    Scene {
        world: node(globe),
        camera: CameraSettings {
            look_from: Vec3::new(0.0, 0.0, 12.0),
            ..overview_camera()
        },
    }
}

fn perlin_ground_and_ball(world: &mut HittableList, rng: &mut dyn RngCore) {
    let noise = shared(Lambertian::from_texture(Texture::noise(Perlin::new(rng), 4.0)));
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        noise.clone(),
    ));
    world.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, noise));
}

fn perlin_spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();
    perlin_ground_and_ball(&mut world, rng);

    Scene {
        world: node(world),
        camera: overview_camera(),
    }
}

fn quads() -> Scene {
    let left_red = shared(Lambertian::new(Color::new(1.0, 0.2, 0.2)));
    let back_green = shared(Lambertian::new(Color::new(0.2, 1.0, 0.2)));
    let right_blue = shared(Lambertian::new(Color::new(0.2, 0.2, 1.0)));
    let upper_orange = shared(Lambertian::new(Color::new(1.0, 0.5, 0.0)));
    let lower_teal = shared(Lambertian::new(Color::new(0.2, 0.8, 0.8)));

    let mut world = HittableList::new();
    world.add(Quad::new(
        Vec3::new(-3.0, -2.0, 5.0),
        Vec3::new(0.0, 0.0, -4.0),
        Vec3::new(0.0, 4.0, 0.0),
        left_red,
    ));
    world.add(Quad::new(
        Vec3::new(-2.0, -2.0, 0.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 4.0, 0.0),
        back_green,
    ));
    world.add(Quad::new(
        Vec3::new(3.0, -2.0, 1.0),
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::new(0.0, 4.0, 0.0),
        right_blue,
    ));
    world.add(Quad::new(
        Vec3::new(-2.0, 3.0, 1.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        upper_orange,
    ));
    world.add(Quad::new(
        Vec3::new(-2.0, -3.0, 5.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -4.0),
        lower_teal,
    ));

    Scene {
        world: node(world),
        camera: CameraSettings {
            aspect_ratio: 1.0,
            vfov: 80.0,
            look_from: Vec3::new(0.0, 0.0, 9.0),
            ..overview_camera()
        },
    }
}

fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();
    perlin_ground_and_ball(&mut world, rng);

    let light = shared(DiffuseLight::new(Color::splat(4.0)));
    world.add(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light.clone()));
    world.add(Quad::new(
        Vec3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    ));

    Scene {
        world: node(world),
        camera: CameraSettings {
            look_from: Vec3::new(26.0, 3.0, 6.0),
            look_at: Vec3::new(0.0, 2.0, 0.0),
            background: Color::ZERO,
            ..overview_camera()
        },
    }
}

fn cornell_camera() -> CameraSettings {
    CameraSettings {
        aspect_ratio: 1.0,
        image_width: 600,
        samples_per_pixel: 200,
        max_depth: 50,
        vfov: 40.0,
        look_from: Vec3::new(278.0, 278.0, -800.0),
        look_at: Vec3::new(278.0, 278.0, 0.0),
        vup: Vec3::Y,
        defocus_angle: 0.0,
        focus_dist: 10.0,
        background: Color::ZERO,
    }
}

/// The five walls of the Cornell box with the given ceiling light.
fn cornell_walls(world: &mut HittableList, light: Quad, white: &Arc<Material>) {
    let red = shared(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let green = shared(Lambertian::new(Color::new(0.12, 0.45, 0.15)));

    world.add(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    ));
    world.add(Quad::new(
        Vec3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    ));
    world.add(light);
    world.add(Quad::new(
        Vec3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        white.clone(),
    ));
    world.add(Quad::new(
        Vec3::splat(555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white.clone(),
    ));
    world.add(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        white.clone(),
    ));
}

/// The tall and the short block, rotated and placed inside the box.
fn cornell_blocks(white: &Arc<Material>) -> [Arc<Primitive>; 2] {
    let tall = node(cuboid(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone()));
    let tall = node(Rotate::y(tall, 15.0));
    let tall = node(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short = node(cuboid(Vec3::ZERO, Vec3::splat(165.0), white.clone()));
    let short = node(Rotate::y(short, -18.0));
    let short = node(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    [tall, short]
}

fn cornell_box() -> Scene {
    let white = shared(Lambertian::new(Color::splat(0.73)));
    let light = Quad::new(
        Vec3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        shared(DiffuseLight::new(Color::splat(15.0))),
    );

    let mut world = HittableList::new();
    cornell_walls(&mut world, light, &white);
    for block in cornell_blocks(&white) {
        world.add_shared(block);
    }

    Scene {
        world: node(world),
        camera: cornell_camera(),
    }
}

fn cornell_smoke() -> Scene {
    let white = shared(Lambertian::new(Color::splat(0.73)));
    let light = Quad::new(
        Vec3::new(113.0, 554.0, 127.0),
        Vec3::new(330.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 305.0),
        shared(DiffuseLight::new(Color::splat(7.0))),
    );

    let mut world = HittableList::new();
    cornell_walls(&mut world, light, &white);

    let [tall, short] = cornell_blocks(&white);
    world.add(ConstantMedium::new(tall, 0.01, Color::ZERO));
    world.add(ConstantMedium::new(short, 0.01, Color::ONE));

    Scene {
        world: node(world),
        camera: cornell_camera(),
    }
}

fn final_scene(rng: &mut dyn RngCore) -> Scene {
    let ground = shared(Lambertian::new(Color::new(0.48, 0.83, 0.53)));

    let mut boxes = HittableList::new();
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);
            boxes.add(cuboid(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            ));
        }
    }

    let mut world = HittableList::new();
    world.add_shared(accelerate(boxes, rng));

    let light = shared(DiffuseLight::new(Color::splat(7.0)));
    world.add(Quad::new(
        Vec3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        light,
    ));

    let center1 = Vec3::new(400.0, 400.0, 200.0);
    let center2 = center1 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Sphere::moving(
        center1,
        center2,
        50.0,
        shared(Lambertian::new(Color::new(0.7, 0.3, 0.1))),
    ));

    world.add(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        shared(Dielectric::new(1.5)),
    ));
    world.add(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        shared(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    ));

    // Glass ball filled with blue haze
    let boundary = node(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        shared(Dielectric::new(1.5)),
    ));
    world.add_shared(boundary.clone());
    world.add(ConstantMedium::new(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    ));

    // Thin mist over everything
    let boundary = node(Sphere::new(Vec3::ZERO, 5000.0, shared(Dielectric::new(1.5))));
    world.add(ConstantMedium::new(boundary, 0.0001, Color::ONE));

    let earth = Texture::image(ImageData::locate("earthmap.jpg"));
    world.add(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        shared(Lambertian::from_texture(earth)),
    ));

    let marble = Texture::noise(Perlin::new(rng), 0.2);
    world.add(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        shared(Lambertian::from_texture(marble)),
    ));

    let white = shared(Lambertian::new(Color::splat(0.73)));
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(Sphere::new(random_vec3(rng, 0.0, 165.0), 10.0, white.clone()));
    }
    let cluster = node(Rotate::y(accelerate(cluster, rng), 15.0));
    world.add(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0)));

    Scene {
        world: node(world),
        camera: CameraSettings {
            aspect_ratio: 1.0,
            image_width: 800,
            samples_per_pixel: 250,
            max_depth: 40,
            vfov: 40.0,
            look_from: Vec3::new(478.0, 278.0, -600.0),
            look_at: Vec3::new(278.0, 278.0, 0.0),
            vup: Vec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: Color::ZERO,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_renderer::{Hittable, Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_scene_builds_with_finite_bounds() {
        for name in SceneName::value_variants() {
            let mut rng = StdRng::seed_from_u64(0);
            let scene = build(*name, &mut rng);
            let bbox = scene.world.bounding_box();
            assert!(bbox.x.size() > 0.0, "{:?}", name);
            assert!(bbox.x.min.is_finite() && bbox.x.max.is_finite(), "{:?}", name);
            assert!(scene.camera.validate().is_ok(), "{:?}", name);
        }
    }

    #[test]
    fn test_cornell_box_is_closed_to_the_back() {
        let mut rng = StdRng::seed_from_u64(0);
        let scene = build(SceneName::CornellBox, &mut rng);

        let ray = Ray::new_simple(scene.camera.look_from, Vec3::new(0.0, 0.0, 1.0));
        let rec = scene
            .world
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!(rec.t > 800.0);
    }

    #[test]
    fn test_scene_placement_follows_seed() {
        let a = build(SceneName::BouncingSpheres, &mut StdRng::seed_from_u64(4));
        let b = build(SceneName::BouncingSpheres, &mut StdRng::seed_from_u64(4));
        assert_eq!(a.world.bounding_box(), b.world.bounding_box());
        assert_eq!(a.camera, b.camera);
    }
}
