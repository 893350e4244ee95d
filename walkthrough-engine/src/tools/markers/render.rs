use bevy::prelude::*;
use constants::render_settings::{MARKER_COLOUR, MARKER_SELECTED_COLOUR};

use super::marker::Marker;
use super::selection::SelectionState;

/// Clickable stand-in for one discovered marker.
#[derive(Component, Debug, Clone)]
pub struct MarkerVisual {
    pub id: String,
    /// World-space radius used for ray picking.
    pub hit_radius: f32,
}

// Pick area relative to the drawn sphere
const HIT_RADIUS_SCALE: f32 = 1.5;

/// Shared unit-sphere mesh plus the idle and highlighted materials.
#[derive(Resource, Clone)]
pub struct MarkerMaterials {
    pub mesh: Handle<Mesh>,
    pub normal: Handle<StandardMaterial>,
    pub selected: Handle<StandardMaterial>,
}

impl FromWorld for MarkerMaterials {
    fn from_world(world: &mut World) -> Self {
        let mesh = world
            .resource_mut::<Assets<Mesh>>()
            .add(Sphere::new(1.0).mesh().uv(24, 12));

        let mut materials = world.resource_mut::<Assets<StandardMaterial>>();
        let [r, g, b] = MARKER_COLOUR;
        let normal = materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            emissive: LinearRgba::rgb(r, g, b) * 0.4,
            unlit: true,
            ..default()
        });
        let [r, g, b] = MARKER_SELECTED_COLOUR;
        let selected = materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            emissive: LinearRgba::rgb(r, g, b),
            unlit: true,
            ..default()
        });

        Self {
            mesh,
            normal,
            selected,
        }
    }
}

/// Spawns one visual per marker at its center, `size` world units in radius.
pub fn spawn_marker_visuals(
    commands: &mut Commands,
    materials: &MarkerMaterials,
    markers: &[Marker],
    size: f32,
) -> Vec<Entity> {
    markers
        .iter()
        .map(|marker| {
            commands
                .spawn((
                    Name::new(format!("Marker: {}", marker.name)),
                    MarkerVisual {
                        id: marker.id.clone(),
                        hit_radius: size * HIT_RADIUS_SCALE,
                    },
                    Mesh3d(materials.mesh.clone()),
                    MeshMaterial3d(materials.normal.clone()),
                    Transform::from_translation(marker.center).with_scale(Vec3::splat(size)),
                ))
                .id()
        })
        .collect()
}

pub fn despawn_marker_visuals(commands: &mut Commands, visuals: &Query<Entity, With<MarkerVisual>>) {
    for entity in visuals {
        commands.entity(entity).despawn();
    }
}

/// Swaps materials so only the selected marker is highlighted.
pub fn highlight_selected_marker(
    selection: Res<SelectionState>,
    materials: Option<Res<MarkerMaterials>>,
    mut visuals: Query<(&MarkerVisual, &mut MeshMaterial3d<StandardMaterial>)>,
) {
    let Some(materials) = materials else {
        return;
    };

    for (visual, mut material) in &mut visuals {
        let wanted = if selection.selected() == Some(visual.id.as_str()) {
            &materials.selected
        } else {
            &materials.normal
        };
        if material.0 != *wanted {
            material.0 = wanted.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::ecs::world::CommandQueue;

    fn test_materials() -> MarkerMaterials {
        MarkerMaterials {
            mesh: Handle::weak_from_u128(1),
            normal: Handle::weak_from_u128(2),
            selected: Handle::weak_from_u128(3),
        }
    }

    fn marker(id: &str, center: Vec3) -> Marker {
        Marker {
            id: id.to_string(),
            name: id.to_uppercase(),
            center,
            radius: 1.0,
            description: None,
            image: None,
        }
    }

    fn spawn(world: &mut World, markers: &[Marker]) -> Vec<Entity> {
        let mut queue = CommandQueue::default();
        let entities = {
            let mut commands = Commands::new(&mut queue, world);
            spawn_marker_visuals(&mut commands, &test_materials(), markers, 0.5)
        };
        queue.apply(world);
        entities
    }

    #[test]
    fn test_visuals_sit_on_marker_centers() {
        let mut world = World::new();
        let markers = [marker("a", Vec3::new(1.0, 2.0, 3.0)), marker("b", Vec3::ZERO)];

        let entities = spawn(&mut world, &markers);

        assert_eq!(entities.len(), 2);
        let transform = world.get::<Transform>(entities[0]).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(transform.scale, Vec3::splat(0.5));
        let visual = world.get::<MarkerVisual>(entities[0]).unwrap();
        assert_eq!(visual.id, "a");
        assert!((visual.hit_radius - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_only_selected_marker_is_highlighted() {
        let mut world = World::new();
        world.insert_resource(test_materials());
        let mut selection = SelectionState::default();
        selection.select("b");
        world.insert_resource(selection);
        let entities = spawn(&mut world, &[marker("a", Vec3::ZERO), marker("b", Vec3::X)]);

        world.run_system_once(highlight_selected_marker).unwrap();

        let materials = test_materials();
        let material_of = |world: &World, e: Entity| {
            world.get::<MeshMaterial3d<StandardMaterial>>(e).unwrap().0.clone()
        };
        assert_eq!(material_of(&world, entities[0]), materials.normal);
        assert_eq!(material_of(&world, entities[1]), materials.selected);

        world.resource_mut::<SelectionState>().clear();
        world.run_system_once(highlight_selected_marker).unwrap();
        assert_eq!(material_of(&world, entities[1]), materials.normal);
    }
}
