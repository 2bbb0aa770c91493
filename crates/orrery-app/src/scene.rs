//! Demo scene assembly.
//!
//! Loads the OBJ meshes with their per-material color palettes, uploads them
//! to the renderer, and places every actor: the car on the planet track, the
//! planet itself, the bloom-lit sun, the rocket and satellite orbiters, and
//! the alien and tree props standing on the surface. The three aliens and
//! three trees reuse one OBJ each, reparsed with a different palette so the
//! colors are baked into the vertices.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use orrery_assets::{AssetError, load_mesh, load_text, parse_obj};
use orrery_lighting::{SUN_ANGULAR_RATE, SUN_ORBIT_RADIUS};
use orrery_render::Renderer;
use orrery_scene::{
    Actor, ActorRegistry, OrbitParams, PLANET_RADIUS, VehicleState, surface_transform,
};

/// Orbit of the rocket circling the planet.
const ROCKET_ORBIT: OrbitParams = OrbitParams {
    radius: 18.0,
    angular_rate: 0.3,
    phase: 1.5,
    inclination: 0.5,
    spin_rate: 0.9,
    scale: 0.8,
};

/// Orbit of the satellite, counter-rotating below the rocket.
const SATELLITE_ORBIT: OrbitParams = OrbitParams {
    radius: 15.0,
    angular_rate: -0.22,
    phase: 4.2,
    inclination: -0.35,
    spin_rate: 1.6,
    scale: 0.6,
};

/// Rendered size of the sun sphere.
const SUN_SCALE: f32 = 2.5;

/// Body colors of the three alien figures.
const MARVIN_BODY_COLORS: [[f32; 3]; 3] = [[1.0, 0.1, 0.1], [0.1, 1.0, 0.1], [1.0, 1.0, 0.2]];

const MARVIN_EYE_COLOR: [f32; 3] = [0.0, 0.1, 0.1];

/// (heading, lateral offset) of each alien on the planet surface.
const MARVIN_PLACEMENTS: [(f32, f32); 3] = [(1.1, -2.2), (2.7, 1.8), (4.3, -1.5)];

const MARVIN_SCALE: f32 = 0.8;

/// Leaf colors of the three trees.
const TREE_LEAF_COLORS: [[f32; 3]; 3] = [[0.5, 0.5, 1.0], [1.0, 0.2, 0.2], [1.0, 0.6, 0.3]];

const TREE_TRUNK_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

/// (heading, lateral offset) of each tree on the planet surface.
const TREE_PLACEMENTS: [(f32, f32); 3] = [(0.5, 2.4), (3.3, -2.6), (5.2, 1.2)];

const TREE_SCALE: f32 = 1.5;

fn palette(pairs: &[(&str, [f32; 3])]) -> HashMap<String, [f32; 3]> {
    pairs
        .iter()
        .map(|(name, color)| (name.to_string(), *color))
        .collect()
}

fn car_palette() -> HashMap<String, [f32; 3]> {
    palette(&[
        ("wheels", [0.2, 0.2, 0.2]),
        ("car_body_1", [1.0, 1.0, 1.0]),
        ("car_body", [0.86, 0.1, 0.1]),
        ("engine_grille", [0.6, 0.6, 0.6]),
        ("rear_lights", [1.0, 0.8, 0.0]),
        ("glass", [0.3, 0.75, 1.0]),
        ("headlight", [1.0, 0.8, 0.0]),
    ])
}

fn planet_palette() -> HashMap<String, [f32; 3]> {
    palette(&[("planet", [0.2, 1.0, 0.2])])
}

fn sun_palette() -> HashMap<String, [f32; 3]> {
    palette(&[("blase", [0.9, 0.9, 0.1])])
}

fn rocket_palette() -> HashMap<String, [f32; 3]> {
    palette(&[
        ("Material", [1.0, 0.2, 0.0]),
        ("Material2", [1.0, 1.0, 1.0]),
        ("Material3", [1.0, 1.0, 1.0]),
        ("Material4", [1.0, 1.0, 0.0]),
        ("Material5", [1.0, 1.0, 0.0]),
        ("Material6", [0.2, 0.2, 0.2]),
    ])
}

fn satellite_palette() -> HashMap<String, [f32; 3]> {
    palette(&[("white", [1.0, 1.0, 1.0]), ("black", [0.0, 0.0, 0.0])])
}

fn marvin_palette(body: [f32; 3]) -> HashMap<String, [f32; 3]> {
    palette(&[("Alien", body), ("eyes", MARVIN_EYE_COLOR)])
}

fn tree_palette(leaves: [f32; 3]) -> HashMap<String, [f32; 3]> {
    palette(&[("leaves", leaves), ("trunk", TREE_TRUNK_COLOR)])
}

/// The mesh directory: `assets/meshes` relative to the working directory,
/// falling back to the workspace copy when run via cargo from a crate dir.
pub fn default_asset_dir() -> PathBuf {
    let local = PathBuf::from("assets").join("meshes");
    if local.is_dir() {
        return local;
    }
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("assets")
        .join("meshes")
}

/// Load every mesh, upload it, and populate the actor buckets.
pub fn build_scene(
    renderer: &mut Renderer,
    asset_dir: &Path,
    car_speed: f32,
) -> Result<ActorRegistry, AssetError> {
    let mut registry = ActorRegistry::new();

    let car = load_mesh(&asset_dir.join("racing_car.obj"), &car_palette())?;
    let car_mesh = renderer.upload_mesh("racing-car", &car);
    registry
        .vehicle
        .push(Actor::vehicle(car_mesh, VehicleState::new(car_speed)));

    let planet = load_mesh(&asset_dir.join("planet.obj"), &planet_palette())?;
    let planet_mesh = renderer.upload_mesh("planet", &planet);
    registry.procedural.push(Actor::static_prop(
        planet_mesh,
        Mat4::from_scale(Vec3::splat(PLANET_RADIUS)),
    ));

    // The sun mesh shares the sun light's orbit so the glow tracks the
    // light source exactly.
    let sun = load_mesh(&asset_dir.join("sphere.obj"), &sun_palette())?;
    let sun_mesh = renderer.upload_mesh("sun", &sun);
    registry.bloom.push(Actor::orbiting(
        sun_mesh,
        OrbitParams {
            radius: SUN_ORBIT_RADIUS,
            angular_rate: SUN_ANGULAR_RATE,
            phase: 0.0,
            inclination: 0.0,
            spin_rate: 0.0,
            scale: SUN_SCALE,
        },
    ));

    let rocket = load_mesh(&asset_dir.join("rocket.obj"), &rocket_palette())?;
    let rocket_mesh = renderer.upload_mesh("rocket", &rocket);
    registry.plain.push(Actor::orbiting(rocket_mesh, ROCKET_ORBIT));

    let satellite = load_mesh(&asset_dir.join("sat.obj"), &satellite_palette())?;
    let satellite_mesh = renderer.upload_mesh("satellite", &satellite);
    registry
        .plain
        .push(Actor::orbiting(satellite_mesh, SATELLITE_ORBIT));

    let marvin_text = load_text(&asset_dir.join("marvin.obj"))?;
    for (i, ((heading, lateral), body)) in MARVIN_PLACEMENTS
        .iter()
        .zip(MARVIN_BODY_COLORS)
        .enumerate()
    {
        let data = parse_obj(&marvin_text, &marvin_palette(body))?;
        let mesh = renderer.upload_mesh(&format!("marvin-{i}"), &data);
        registry.plain.push(Actor::static_prop(
            mesh,
            surface_transform(1.0, *heading, *lateral) * Mat4::from_scale(Vec3::splat(MARVIN_SCALE)),
        ));
    }

    let tree_text = load_text(&asset_dir.join("tree.obj"))?;
    for (i, ((heading, lateral), leaves)) in
        TREE_PLACEMENTS.iter().zip(TREE_LEAF_COLORS).enumerate()
    {
        let data = parse_obj(&tree_text, &tree_palette(leaves))?;
        let mesh = renderer.upload_mesh(&format!("tree-{i}"), &data);
        registry.plain.push(Actor::static_prop(
            mesh,
            surface_transform(1.0, *heading, *lateral) * Mat4::from_scale(Vec3::splat(TREE_SCALE)),
        ));
    }

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_asset(name: &str) -> String {
        std::fs::read_to_string(default_asset_dir().join(name)).unwrap()
    }

    #[test]
    fn test_shipped_meshes_parse_with_their_palettes() {
        let cases: Vec<(&str, HashMap<String, [f32; 3]>)> = vec![
            ("racing_car.obj", car_palette()),
            ("planet.obj", planet_palette()),
            ("sphere.obj", sun_palette()),
            ("rocket.obj", rocket_palette()),
            ("sat.obj", satellite_palette()),
            ("marvin.obj", marvin_palette(MARVIN_BODY_COLORS[0])),
            ("tree.obj", tree_palette(TREE_LEAF_COLORS[0])),
        ];
        for (file, palette) in cases {
            let data = parse_obj(&read_asset(file), &palette).unwrap();
            assert!(data.vertex_count() > 0, "{file} has no vertices");
            assert!(data.triangle_count() > 0, "{file} has no triangles");
        }
    }

    #[test]
    fn test_palettes_cover_every_material_in_the_obj() {
        let cases: Vec<(&str, HashMap<String, [f32; 3]>)> = vec![
            ("racing_car.obj", car_palette()),
            ("rocket.obj", rocket_palette()),
            ("sat.obj", satellite_palette()),
            ("marvin.obj", marvin_palette(MARVIN_BODY_COLORS[1])),
            ("tree.obj", tree_palette(TREE_LEAF_COLORS[2])),
        ];
        for (file, palette) in cases {
            for line in read_asset(file).lines() {
                if let Some(name) = line.strip_prefix("usemtl ") {
                    assert!(
                        palette.contains_key(name.trim()),
                        "{file} uses unmapped material {name}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_alien_variants_get_distinct_vertex_colors() {
        let text = read_asset("marvin.obj");
        let red = parse_obj(&text, &marvin_palette(MARVIN_BODY_COLORS[0])).unwrap();
        let green = parse_obj(&text, &marvin_palette(MARVIN_BODY_COLORS[1])).unwrap();
        assert_eq!(red.vertex_count(), green.vertex_count());
        assert_ne!(red.colors, green.colors);
    }

    #[test]
    fn test_prop_placements_are_distinct() {
        for placements in [&MARVIN_PLACEMENTS, &TREE_PLACEMENTS] {
            for (i, a) in placements.iter().enumerate() {
                for b in placements.iter().skip(i + 1) {
                    assert!((a.0 - b.0).abs() > 0.1);
                }
            }
        }
    }
}
