//! Per-load composition root.
//!
//! When the glTF scene has been instantiated the session captures it,
//! grounds it, derives the scene scale, discovers markers and fits the
//! camera, all in one synchronous pass:
//!
//! ```text
//! SceneInstanceReady
//!   └─> SceneSnapshot::capture()
//!       └─> prepare_scene()        normalize → SceneScale → discover_markers
//!           └─> commit()           root offset, camera + fog, marker visuals,
//!                                  resources, LoadingProgress
//! ```

use bevy::ecs::system::SystemParam;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;
use constants::render_settings::FOG_COLOUR;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::flight::FlightController;
use crate::engine::camera::viewport_camera::ViewportCamera;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::normalizer::{GroundSnapped, NormalizedScene, normalize};
use crate::engine::scene::scene_scale::SceneScale;
use crate::engine::scene::snapshot::{SceneNode, SceneNodeQuery, SceneSnapshot};
use crate::tools::markers::discovery::discover_markers;
use crate::tools::markers::marker::{DiscoveredMarkers, Marker, MarkersDiscovered};
use crate::tools::markers::render::{
    MarkerMaterials, MarkerVisual, despawn_marker_visuals, spawn_marker_visuals,
};
use crate::tools::markers::selection::SelectionState;

/// Grounding result of the current load, `None` until a load completes.
#[derive(Resource, Debug, Clone, Default)]
pub struct ViewerSession {
    pub normalized: Option<NormalizedScene>,
}

/// Everything derived from one captured scene, before it touches the ECS.
#[derive(Debug, Clone)]
pub struct PreparedScene {
    /// Root transform with the ground offset applied.
    pub root_transform: Transform,
    pub normalized: NormalizedScene,
    pub scale: SceneScale,
    pub markers: Vec<Marker>,
}

pub fn prepare_scene(mut scene: SceneSnapshot, config: &ViewerConfig) -> PreparedScene {
    let normalized = normalize(&mut scene, config.fallback_radius);
    let scale = SceneScale::from_sphere(normalized.sphere);
    let markers = discover_markers(&scene, &config.discovery_limits(), &config.marker_override);

    PreparedScene {
        root_transform: scene.node(scene.root()).transform,
        normalized,
        scale,
        markers,
    }
}

fn distance_fog(scale: &SceneScale) -> DistanceFog {
    let [r, g, b] = FOG_COLOUR;
    DistanceFog {
        color: Color::srgb(r, g, b),
        falloff: FogFalloff::Linear {
            start: scale.fog_start,
            end: scale.fog_end,
        },
        ..default()
    }
}

/// ECS access needed to run and commit one scene load.
#[derive(SystemParam)]
pub struct SceneLoadContext<'w, 's> {
    commands: Commands<'w, 's>,
    nodes: SceneNodeQuery<'w, 's>,
    meshes: Res<'w, Assets<Mesh>>,
    snapped: Query<'w, 's, (), With<GroundSnapped>>,
    config: Option<Res<'w, ViewerConfig>>,
    materials: Option<Res<'w, MarkerMaterials>>,
    visuals: Query<'w, 's, Entity, With<MarkerVisual>>,
    cameras: Query<'w, 's, Entity, With<Camera3d>>,
    progress: ResMut<'w, LoadingProgress>,
    discovered: EventWriter<'w, MarkersDiscovered>,
}

impl SceneLoadContext<'_, '_> {
    /// Runs the load pipeline for the scene instantiated under `root`.
    /// A root that is already grounded is left alone.
    pub fn load(&mut self, root: Entity) {
        if self.snapped.contains(root) {
            debug!("Scene root {root:?} already grounded, skipping");
            return;
        }

        let scene = match SceneSnapshot::capture(root, &self.nodes, &self.meshes) {
            Ok(scene) => scene,
            Err(err) => {
                warn!("Scene capture failed: {err}");
                SceneSnapshot::new(SceneNode::unnamed())
            }
        };
        info!("✓ Scene ready: {} nodes", scene.node_count());

        let prepared = prepare_scene(scene, &self.config());
        self.commit(Some(root), prepared);
    }

    /// Completes a load that produced no scene at all.
    pub fn load_empty(&mut self, root: Option<Entity>) {
        let prepared = prepare_scene(SceneSnapshot::new(SceneNode::unnamed()), &self.config());
        self.commit(root, prepared);
    }

    fn config(&self) -> ViewerConfig {
        self.config.as_deref().cloned().unwrap_or_default()
    }

    fn commit(&mut self, root: Option<Entity>, prepared: PreparedScene) {
        let PreparedScene {
            root_transform,
            normalized,
            scale,
            markers,
        } = prepared;

        if let Some(root) = root {
            self.commands.entity(root).insert((
                root_transform,
                GroundSnapped {
                    offset: normalized.ground_offset,
                },
            ));
        }
        if normalized.has_geometry {
            info!("Ground offset applied: {:.3}", normalized.ground_offset);
        } else {
            warn!("Scene has no measurable geometry, using fallback radius");
        }

        match self.cameras.single() {
            Ok(camera) => {
                let position = scale.initial_camera_position();
                self.commands.entity(camera).insert((
                    Transform::from_translation(position).looking_at(scale.orbit_target(), Vec3::Y),
                    distance_fog(&scale),
                ));
            }
            Err(_) => warn!("No camera to fit to the scene"),
        }

        despawn_marker_visuals(&mut self.commands, &self.visuals);
        match self.materials.as_deref() {
            Some(materials) => {
                spawn_marker_visuals(&mut self.commands, materials, &markers, scale.marker_size);
            }
            None => warn!("Marker materials missing, markers will not be drawn"),
        }

        if markers.is_empty() {
            warn!("No markers discovered in scene");
        } else {
            info!("✓ {} markers discovered", markers.len());
        }
        self.discovered.write(MarkersDiscovered {
            count: markers.len(),
        });

        self.commands.insert_resource(ViewportCamera::with_scale(&scale));
        self.commands.insert_resource(scale);
        self.commands.insert_resource(DiscoveredMarkers { markers });
        self.commands.insert_resource(SelectionState::default());
        self.commands.insert_resource(FlightController::default());
        self.commands.insert_resource(ViewerSession {
            normalized: Some(normalized),
        });

        self.progress.scene_normalized = true;
        self.progress.markers_discovered = true;
    }
}

pub fn on_scene_ready(trigger: Trigger<SceneInstanceReady>, mut context: SceneLoadContext) {
    context.load(trigger.target());
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::SystemState;

    fn room(name: &str, min: Vec3, max: Vec3) -> SceneNode {
        SceneNode::mesh(name, vec![min, max])
    }

    #[test]
    fn test_prepare_scene_grounds_and_discovers() {
        let mut scene = SceneSnapshot::new(SceneNode::unnamed());
        let root = scene.root();
        scene.add_child(root, room("Lobby", Vec3::new(-4.0, -2.0, -4.0), Vec3::new(4.0, 2.0, 4.0)));
        scene.add_child(root, room("Bar", Vec3::new(5.0, -2.0, 0.0), Vec3::new(7.0, 0.0, 2.0)));

        let prepared = prepare_scene(scene, &ViewerConfig::default());

        assert!(prepared.normalized.has_geometry);
        assert!((prepared.root_transform.translation.y - 2.0).abs() < 1e-5);
        assert_eq!(prepared.markers.len(), 2);
        assert_eq!(prepared.markers[0].name, "Power Aisle");
        assert_eq!(prepared.markers[1].name, "Bar");
        // Marker centres are measured after grounding.
        assert!((prepared.markers[0].center.y - 2.0).abs() < 1e-5);
        assert_eq!(prepared.scale, SceneScale::from_sphere(prepared.normalized.sphere));
    }

    #[test]
    fn test_prepare_empty_scene_falls_back() {
        let config = ViewerConfig {
            fallback_radius: 25.0,
            ..default()
        };

        let prepared = prepare_scene(SceneSnapshot::new(SceneNode::unnamed()), &config);

        assert!(!prepared.normalized.has_geometry);
        assert_eq!(prepared.normalized.sphere.radius, 25.0);
        assert_eq!(prepared.root_transform, Transform::IDENTITY);
        assert!(prepared.markers.is_empty());
    }

    fn session_world() -> (World, Entity) {
        let mut world = World::new();
        let mut meshes = Assets::<Mesh>::default();
        let cube = meshes.add(Mesh::from(Cuboid::new(2.0, 2.0, 2.0)));
        world.insert_resource(meshes);
        world.insert_resource(MarkerMaterials {
            mesh: Handle::weak_from_u128(11),
            normal: Handle::weak_from_u128(12),
            selected: Handle::weak_from_u128(13),
        });
        world.init_resource::<LoadingProgress>();
        world.init_resource::<Events<MarkersDiscovered>>();
        world.spawn((Camera3d::default(), Transform::default()));

        let lobby_mesh = world.spawn((Name::new("Cube"), Mesh3d(cube))).id();
        let lobby = world
            .spawn((
                Name::new("Lobby"),
                Transform::from_xyz(0.0, -5.0, 0.0),
                Visibility::Visible,
            ))
            .add_children(&[lobby_mesh])
            .id();
        let root = world
            .spawn((Transform::IDENTITY, Visibility::Inherited))
            .add_children(&[lobby])
            .id();
        (world, root)
    }

    fn run_load(world: &mut World, root: Entity) {
        let mut state: SystemState<SceneLoadContext> = SystemState::new(world);
        {
            let mut context = state.get_mut(world);
            context.load(root);
        }
        state.apply(world);
    }

    #[test]
    fn test_load_commits_scene_state() {
        let (mut world, root) = session_world();

        run_load(&mut world, root);

        let root_transform = world.get::<Transform>(root).unwrap();
        assert!((root_transform.translation.y - 6.0).abs() < 1e-5);
        assert!((world.get::<GroundSnapped>(root).unwrap().offset - 6.0).abs() < 1e-5);

        let markers = world.resource::<DiscoveredMarkers>();
        assert_eq!(markers.markers.len(), 1);
        assert_eq!(markers.markers[0].name, "Power Aisle");

        assert!(world.resource::<LoadingProgress>().scene_normalized);
        assert!(world.resource::<LoadingProgress>().markers_discovered);
        assert!(world.contains_resource::<SceneScale>());
        assert!(world.contains_resource::<ViewportCamera>());
        let normalized = world.resource::<ViewerSession>().normalized.unwrap();
        assert!((normalized.ground_offset - 6.0).abs() < 1e-5);

        let mut cameras = world.query_filtered::<&DistanceFog, With<Camera3d>>();
        assert_eq!(cameras.iter(&world).count(), 1);
        let mut visuals = world.query::<&MarkerVisual>();
        assert_eq!(visuals.iter(&world).count(), 1);
    }

    #[test]
    fn test_second_ready_does_not_offset_again() {
        let (mut world, root) = session_world();

        run_load(&mut world, root);
        run_load(&mut world, root);

        let root_transform = world.get::<Transform>(root).unwrap();
        assert!((root_transform.translation.y - 6.0).abs() < 1e-5);
        let mut visuals = world.query::<&MarkerVisual>();
        assert_eq!(visuals.iter(&world).count(), 1);
    }

    #[test]
    fn test_reload_replaces_marker_visuals() {
        let (mut world, root) = session_world();
        run_load(&mut world, root);

        let mut state: SystemState<SceneLoadContext> = SystemState::new(&mut world);
        {
            let mut context = state.get_mut(&mut world);
            context.load_empty(None);
        }
        state.apply(&mut world);

        let mut visuals = world.query::<&MarkerVisual>();
        assert_eq!(visuals.iter(&world).count(), 0);
        assert!(!world.resource::<ViewerSession>().normalized.unwrap().has_geometry);
    }

    #[test]
    fn test_load_empty_completes_progress() {
        let (mut world, _) = session_world();

        let mut state: SystemState<SceneLoadContext> = SystemState::new(&mut world);
        {
            let mut context = state.get_mut(&mut world);
            context.load_empty(None);
        }
        state.apply(&mut world);

        assert!(world.resource::<LoadingProgress>().markers_discovered);
        assert!(world.resource::<DiscoveredMarkers>().is_empty());
        let events = world.resource::<Events<MarkersDiscovered>>();
        let sent: Vec<_> = events.iter_current_update_events().copied().collect();
        assert_eq!(sent, vec![MarkersDiscovered { count: 0 }]);
    }
}
