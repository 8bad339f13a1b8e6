//! # Node Graph
//!
//! A layered graph of small pulsing spheres, every node wired to every node
//! in the next layer. With the default `[5, 8, 6, 4]` layers that is
//! `5·8 + 8·6 + 6·4 = 112` connections, drawn as one line-list entity.
//!
//! ```text
//!   layer 0   layer 1   layer 2   layer 3
//!      ●─────────●─────────●─────────●
//!      ●╲───────╱●╲───────╱●╲───────╱●
//!      ●  ╲   ╱  ●  ╲   ╱  ●  ╲   ╱  ●
//!      …     ╳    …    ╳    …    ╳    …
//! ```
//!
//! Nodes sit at `x = (layer - L/2) * 2`, `y = (i - n/2) * 0.5`, `z = -6`.
//! They never move; only their scale pulses and their colour switches to the
//! highlight while the pointer is close.

use rand::Rng;

use crate::math::{Transform, Vec2, Vec3, planar_distance, rgb_hex};
use crate::render::{EntityDesc, EntityHandle, Geometry, Material, MaterialProperty, SceneRenderer, ShapeKind};
use crate::theme::{DEEP_TEAL, MIST, TEAL};

pub const NODE_RADIUS: f32 = 0.05;
pub const GRAPH_DEPTH: f32 = -6.0;
pub const LAYER_SPACING: f32 = 2.0;
pub const NODE_SPACING: f32 = 0.5;
pub const HIGHLIGHT_RADIUS: f32 = 3.0;

/// Pulse in `[0, 1]` for node `index` (within its layer) at time `t`.
pub fn node_pulse(t: f32, rate: f32, index: usize) -> f32 {
    (t * rate + index as f32).sin() * 0.5 + 0.5
}

/// Position of node `index` in layer `layer`, given the layer sizes.
pub fn node_position(layers: &[usize], layer: usize, index: usize) -> Vec3 {
    let x = (layer as f32 - layers.len() as f32 / 2.0) * LAYER_SPACING;
    let y = (index as f32 - layers[layer] as f32 / 2.0) * NODE_SPACING;
    Vec3::new(x, y, GRAPH_DEPTH)
}

/// Number of edges between consecutive layers.
pub fn connection_count(layers: &[usize]) -> usize {
    layers.windows(2).map(|w| w[0] * w[1]).sum()
}

pub struct GraphNode {
    handle: EntityHandle,
    layer: usize,
    index: usize,
    position: Vec3,
    pulse_rate: f32,
    scale: f32,
    highlighted: bool,
}

impl GraphNode {
    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn pulse_rate(&self) -> f32 {
        self.pulse_rate
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }
}

pub struct NodeGraph {
    nodes: Vec<GraphNode>,
    /// Pairs of indices into `nodes`.
    edges: Vec<(usize, usize)>,
    lines: EntityHandle,
    rest_opacity: f32,
    /// Nodes whose highlight flipped during the last update.
    changed: Vec<usize>,
}

impl NodeGraph {
    pub fn spawn(layers: &[usize], intensity: f32, rng: &mut impl Rng, renderer: &mut impl SceneRenderer) -> Self {
        let rest_opacity = 0.3 + intensity * 0.4;
        let mut nodes = Vec::with_capacity(layers.iter().sum());
        let mut layer_start = Vec::with_capacity(layers.len());

        for (layer, &count) in layers.iter().enumerate() {
            layer_start.push(nodes.len());
            for index in 0..count {
                let position = node_position(layers, layer, index);
                let handle = renderer.create(
                    EntityDesc::new(
                        format!("node:{layer}:{index}"),
                        Geometry::Solid(ShapeKind::Sphere { radius: NODE_RADIUS }),
                        Material::color(rgb_hex(MIST)).with_opacity(rest_opacity),
                    )
                    .with_transform(Transform::from_translation(position)),
                );
                nodes.push(GraphNode {
                    handle,
                    layer,
                    index,
                    position,
                    pulse_rate: rng.gen_range(0.02..0.05),
                    scale: 1.0,
                    highlighted: false,
                });
            }
        }

        let mut edges = Vec::with_capacity(connection_count(layers));
        for layer in 0..layers.len().saturating_sub(1) {
            for a in 0..layers[layer] {
                for b in 0..layers[layer + 1] {
                    edges.push((layer_start[layer] + a, layer_start[layer + 1] + b));
                }
            }
        }

        let segments = edges
            .iter()
            .map(|&(a, b)| [nodes[a].position, nodes[b].position])
            .collect();
        let lines = renderer.create(EntityDesc::new(
            "connections",
            Geometry::Lines { segments },
            Material::color(rgb_hex(DEEP_TEAL)).with_opacity(0.1 + intensity * 0.2),
        ));

        Self {
            nodes,
            edges,
            lines,
            rest_opacity,
            changed: Vec::new(),
        }
    }

    pub fn update(&mut self, t: f32, pointer: Vec2) {
        self.changed.clear();
        for (i, node) in self.nodes.iter_mut().enumerate() {
            node.scale = 0.5 + node_pulse(t, node.pulse_rate, node.index) * 0.5;
            let near = planar_distance(node.position, pointer) < HIGHLIGHT_RADIUS;
            if near != node.highlighted {
                node.highlighted = near;
                self.changed.push(i);
            }
        }
    }

    pub fn sync(&self, renderer: &mut impl SceneRenderer) {
        for node in &self.nodes {
            renderer.set_transform(
                node.handle,
                Transform::from_translation(node.position).with_scale(node.scale),
            );
        }
        for &i in &self.changed {
            let node = &self.nodes[i];
            let (color, opacity) = if node.highlighted {
                (rgb_hex(TEAL), (self.rest_opacity + 0.3).min(1.0))
            } else {
                (rgb_hex(MIST), self.rest_opacity)
            };
            renderer.set_material(node.handle, MaterialProperty::Color(color));
            renderer.set_material(node.handle, MaterialProperty::Opacity(opacity));
        }
    }

    pub fn despawn(&self, renderer: &mut impl SceneRenderer) {
        for node in &self.nodes {
            renderer.remove(node.handle);
        }
        renderer.remove(self.lines);
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn lines(&self) -> EntityHandle {
        self.lines
    }

    pub fn connection_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const LAYERS: [usize; 4] = [5, 8, 6, 4];

    fn graph() -> (NodeGraph, HeadlessRenderer) {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(5);
        let graph = NodeGraph::spawn(&LAYERS, 1.0, &mut rng, &mut r);
        (graph, r)
    }

    #[test]
    fn default_layers_have_112_connections() {
        assert_eq!(connection_count(&LAYERS), 112);
        let (graph, r) = graph();
        assert_eq!(graph.nodes().len(), 23);
        assert_eq!(graph.connection_count(), 112);
        let lines = r.get(graph.lines()).unwrap();
        assert_eq!(lines.mesh.primitive_count(), 112);
    }

    #[test]
    fn edges_only_join_adjacent_layers() {
        let (graph, _) = graph();
        for &(a, b) in graph.edges() {
            assert_eq!(graph.nodes()[a].layer() + 1, graph.nodes()[b].layer());
        }
    }

    #[test]
    fn layout_positions() {
        assert_eq!(node_position(&LAYERS, 0, 0), Vec3::new(-4.0, -1.25, -6.0));
        assert_eq!(node_position(&LAYERS, 3, 3), Vec3::new(2.0, 0.5, -6.0));
    }

    #[test]
    fn pulse_drives_scale() {
        let (mut graph, _) = graph();
        graph.update(4.0, Vec2::new(100.0, 0.0));
        for node in graph.nodes() {
            let expected = 0.5 + node_pulse(4.0, node.pulse_rate(), node.index()) * 0.5;
            assert!((node.scale() - expected).abs() < 1e-6);
            assert!((0.5..=1.0).contains(&node.scale()));
        }
    }

    #[test]
    fn highlight_switches_color_and_back() {
        let (mut graph, mut r) = graph();
        let target = graph.nodes()[0].position().truncate();
        let handle = graph.nodes()[0].handle();

        graph.update(0.0, target);
        graph.sync(&mut r);
        assert!(graph.nodes()[0].is_highlighted());
        let m = r.get(handle).unwrap().material;
        assert_eq!(m.color, rgb_hex(TEAL));
        assert_eq!(m.opacity, 1.0);

        graph.update(0.1, Vec2::new(100.0, 100.0));
        graph.sync(&mut r);
        let m = r.get(handle).unwrap().material;
        assert_eq!(m.color, rgb_hex(MIST));
        assert!((m.opacity - 0.7).abs() < 1e-6);
    }
}
