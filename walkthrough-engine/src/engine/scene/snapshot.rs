use bevy::math::Affine3A;
use bevy::prelude::*;
use thiserror::Error;

/// Index of a node inside a [`SceneSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Description of one node handed to [`SceneSnapshot::new`] / [`SceneSnapshot::add_child`].
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub source: Option<Entity>,
    pub name: Option<String>,
    pub visible: bool,
    pub transform: Transform,
    /// Vertex positions in node-local space. Empty for groups.
    pub positions: Vec<Vec3>,
    pub is_mesh: bool,
}

impl SceneNode {
    pub fn unnamed() -> Self {
        Self {
            source: None,
            name: None,
            visible: true,
            transform: Transform::IDENTITY,
            positions: Vec::new(),
            is_mesh: false,
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::unnamed()
        }
    }

    pub fn mesh(name: impl Into<String>, positions: Vec<Vec3>) -> Self {
        Self {
            name: Some(name.into()),
            positions,
            is_mesh: true,
            ..Self::unnamed()
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_source(mut self, entity: Entity) -> Self {
        self.source = Some(entity);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

#[derive(Debug, Clone)]
struct SnapshotEntry {
    node: SceneNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    world: Affine3A,
    visible_in_hierarchy: bool,
}

/// Isolated copy of a scene subtree: names, visibility, transforms and mesh
/// vertices, detached from the ECS.
///
/// Bounds and marker heuristics run against the snapshot so they never depend
/// on whether the engine has propagated `GlobalTransform`s yet. The root's
/// world transform is its own local transform, as if re-parented under an
/// empty container at the origin.
///
/// Nodes are stored parent-before-child, so world transforms resolve in one
/// forward pass.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl SceneSnapshot {
    pub fn new(root: SceneNode) -> Self {
        let world = root.transform.compute_affine();
        let visible_in_hierarchy = root.visible;
        Self {
            entries: vec![SnapshotEntry {
                node: root,
                parent: None,
                children: Vec::new(),
                world,
                visible_in_hierarchy,
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included. Never zero.
    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    /// Appends `node` as the last child of `parent` and resolves its world transform.
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        let id = NodeId(self.entries.len());
        let parent_entry = &self.entries[parent.0];
        let world = parent_entry.world * node.transform.compute_affine();
        let visible_in_hierarchy = parent_entry.visible_in_hierarchy && node.visible;

        self.entries.push(SnapshotEntry {
            node,
            parent: Some(parent),
            children: Vec::new(),
            world,
            visible_in_hierarchy,
        });
        self.entries[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.entries[id.0].node
    }

    /// Children in declared order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.entries[id.0].children
    }

    /// Trimmed, non-empty node name.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.entries[id.0]
            .node
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    pub fn is_mesh(&self, id: NodeId) -> bool {
        self.entries[id.0].node.is_mesh
    }

    /// Visible itself and under no hidden ancestor.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.entries[id.0].visible_in_hierarchy
    }

    pub fn world_transform(&self, id: NodeId) -> Affine3A {
        self.entries[id.0].world
    }

    /// Identity of the node's source; stable for as long as the source entity lives.
    pub fn node_key(&self, id: NodeId) -> String {
        match self.entries[id.0].node.source {
            Some(entity) => format!("entity-{}", entity.to_bits()),
            None => format!("node-{}", id.0),
        }
    }

    /// `id` and all of its descendants in pre-order, children in declared order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self.entries[current.0].children.iter().rev().copied());
        }
        order
    }

    /// World-space vertex positions of the node's own mesh.
    pub fn world_points(&self, id: NodeId) -> impl Iterator<Item = Vec3> + '_ {
        let entry = &self.entries[id.0];
        let world = entry.world;
        entry
            .node
            .positions
            .iter()
            .map(move |p| world.transform_point3(*p))
    }

    /// World-space vertex positions of every mesh under `id`.
    pub fn subtree_world_points(&self, id: NodeId) -> impl Iterator<Item = Vec3> + '_ {
        self.descendants(id)
            .into_iter()
            .flat_map(move |n| self.world_points(n))
    }

    /// Merges a mesh primitive's geometry into `owner`, which becomes a mesh node.
    fn absorb_primitive(&mut self, owner: NodeId, primitive: SceneNode) {
        let local = primitive.transform.compute_affine();
        let node = &mut self.entries[owner.0].node;
        node.positions
            .extend(primitive.positions.iter().map(|p| local.transform_point3(*p)));
        node.is_mesh = true;
    }

    /// Moves the root and re-resolves every world transform.
    pub fn translate_root(&mut self, offset: Vec3) {
        self.entries[0].node.transform.translation += offset;
        self.resolve_world_transforms();
    }

    pub fn resolve_world_transforms(&mut self) {
        for i in 0..self.entries.len() {
            let local = self.entries[i].node.transform.compute_affine();
            let (parent_world, parent_visible) = match self.entries[i].parent {
                Some(parent) => (
                    self.entries[parent.0].world,
                    self.entries[parent.0].visible_in_hierarchy,
                ),
                None => (Affine3A::IDENTITY, true),
            };
            let entry = &mut self.entries[i];
            entry.world = parent_world * local;
            entry.visible_in_hierarchy = parent_visible && entry.node.visible;
        }
    }

    /// First node below the root that is not an anonymous single-child wrapper.
    ///
    /// glTF scenes are spawned under an unnamed container entity; the model's
    /// top-level nodes are that container's children.
    pub fn content_root(&self) -> NodeId {
        let mut current = self.root();
        loop {
            match self.children(current) {
                [only] if self.name(*only).is_none() && !self.is_mesh(*only) => current = *only,
                _ => return current,
            }
        }
    }
}

/// Components read when capturing a scene subtree.
pub type SceneNodeQuery<'w, 's> = Query<
    'w,
    's,
    (
        Option<&'static Name>,
        Option<&'static Visibility>,
        Option<&'static Transform>,
        Option<&'static Children>,
        Option<&'static Mesh3d>,
    ),
>;

#[derive(Debug, Error)]
pub enum SceneCaptureError {
    #[error("scene root {0:?} is not a queryable node")]
    MissingRoot(Entity),
}

impl SceneSnapshot {
    /// Copies the subtree under `root` out of the ECS.
    ///
    /// bevy_gltf spawns each glTF node as an entity and hangs its mesh
    /// primitives off it as childless `Mesh3d` entities named after the mesh.
    /// Those primitives are folded into the owning node, so a node's name is
    /// the one authored in the file. Names bevy_gltf invents for unnamed
    /// nodes (`GltfNode<index>`) are dropped.
    ///
    /// Mesh vertices are read from `meshes`; a mesh whose asset is not loaded
    /// contributes no geometry.
    pub fn capture(
        root: Entity,
        nodes: &SceneNodeQuery,
        meshes: &Assets<Mesh>,
    ) -> Result<Self, SceneCaptureError> {
        let root_node = read_node(root, nodes, meshes).ok_or(SceneCaptureError::MissingRoot(root))?;
        let mut snapshot = SceneSnapshot::new(root_node);

        let root_id = snapshot.root();
        let mut pending: Vec<(NodeId, Entity)> = child_entities(root, nodes)
            .into_iter()
            .rev()
            .map(|child| (root_id, child))
            .collect();

        while let Some((parent, entity)) = pending.pop() {
            let Some(node) = read_node(entity, nodes, meshes) else {
                continue;
            };
            let children = child_entities(entity, nodes);
            if node.is_mesh && children.is_empty() {
                snapshot.absorb_primitive(parent, node);
                continue;
            }
            let id = snapshot.add_child(parent, node);
            pending.extend(children.into_iter().rev().map(|child| (id, child)));
        }

        Ok(snapshot)
    }
}

fn read_node(entity: Entity, nodes: &SceneNodeQuery, meshes: &Assets<Mesh>) -> Option<SceneNode> {
    let (name, visibility, transform, _, mesh) = nodes.get(entity).ok()?;

    let positions = mesh
        .and_then(|m| meshes.get(&m.0))
        .and_then(|m| m.attribute(Mesh::ATTRIBUTE_POSITION))
        .and_then(|values| values.as_float3())
        .map(|values| values.iter().map(|p| Vec3::from_array(*p)).collect())
        .unwrap_or_default();

    Some(SceneNode {
        source: Some(entity),
        name: name
            .map(Name::as_str)
            .filter(|n| !is_generated_node_name(n))
            .map(str::to_string),
        visible: !matches!(visibility, Some(Visibility::Hidden)),
        transform: transform.copied().unwrap_or_default(),
        positions,
        is_mesh: mesh.is_some(),
    })
}

/// bevy_gltf names nodes without a name `GltfNode<index>`.
fn is_generated_node_name(name: &str) -> bool {
    name.strip_prefix("GltfNode")
        .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
}

fn child_entities(entity: Entity, nodes: &SceneNodeQuery) -> Vec<Entity> {
    let Ok((_, _, _, Some(children), _)) = nodes.get(entity) else {
        return Vec::new();
    };
    let children: &[Entity] = children;
    children.to_vec()
}
