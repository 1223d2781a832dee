/// Directed relation graph over a chunk corpus.
///
/// One node per chunk, one edge per `related_chunks` entry whose target id
/// exists in the corpus. Supports a corpus-wide connectivity summary and a
/// bounded neighborhood exploration around a target chunk with all shortest
/// paths enumerated.
use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::connected_components;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::debug;

use crate::corpus::{Chunk, ChunkDetails, Corpus};

// ── Graph model ──────────────────────────────────────────────────────

/// Node annotation: every chunk field except `content` and `related_chunks`.
/// Serializes as the detail record for neighborhood members, with the
/// producer's omit-when-empty behavior.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkNode<'a> {
    pub id: &'a str,
    pub file_path: &'a str,
    pub start_line: u32,
    pub end_line: u32,
    pub language: &'a str,

    #[serde(skip_serializing_if = "str::is_empty")]
    pub framework: &'a str,

    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub symbols: &'a [String],

    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub imports: &'a [String],

    pub token_count: u64,
}

impl<'a> From<&'a Chunk> for ChunkNode<'a> {
    fn from(chunk: &'a Chunk) -> Self {
        Self {
            id: &chunk.id,
            file_path: &chunk.file_path,
            start_line: chunk.start_line,
            end_line: chunk.end_line,
            language: &chunk.language,
            framework: &chunk.framework,
            symbols: &chunk.symbols,
            imports: &chunk.imports,
            token_count: chunk.token_count,
        }
    }
}

pub struct RelationGraph<'a> {
    graph: DiGraph<ChunkNode<'a>, ()>,
    indices: HashMap<&'a str, NodeIndex>,
    corpus: &'a Corpus,
}

// ── Report structs ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ConnectedChunk<'a> {
    pub id: &'a str,
    pub file_path: &'a str,
    pub language: &'a str,

    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub symbols: &'a [String],

    pub relations: usize,
}

#[derive(Debug, Serialize)]
pub struct RelationSummary<'a> {
    pub total_chunks: usize,
    pub chunks_with_relations: usize,
    pub avg_relations: f64,
    pub max_relations: usize,
    /// Weakly connected components (edge direction ignored).
    pub connected_components: usize,
    pub most_connected: Vec<ConnectedChunk<'a>>,
}

#[derive(Debug, Serialize)]
pub struct PathStep<'a> {
    pub id: &'a str,
    pub file_path: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PathRecord<'a> {
    pub from_file: &'a str,
    pub to_file: &'a str,
    pub hops: usize,

    /// Intermediate nodes, present only for paths longer than one hop.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<PathStep<'a>>,
}

/// One neighborhood member: its full detail record (flattened) plus its
/// distance from the target and every shortest path to it.
#[derive(Debug, Serialize)]
pub struct Connection<'a> {
    #[serde(flatten)]
    pub chunk: ChunkNode<'a>,
    pub distance: usize,
    pub paths: Vec<PathRecord<'a>>,
}

#[derive(Debug, Serialize)]
pub struct NeighborhoodReport<'a> {
    pub target_chunk: ChunkDetails<'a>,
    pub depth: usize,
    pub neighborhood_size: usize,
    pub connections: Vec<Connection<'a>>,
}

// ── Implementation ───────────────────────────────────────────────────

impl<'a> RelationGraph<'a> {
    /// Build the relation graph for a corpus.
    ///
    /// Relations pointing at ids not present in the corpus are dropped; the
    /// graph never contains phantom nodes.
    #[must_use]
    pub fn build(corpus: &'a Corpus) -> Self {
        let mut graph = DiGraph::with_capacity(corpus.len(), corpus.len());
        let mut indices = HashMap::with_capacity(corpus.len());

        for chunk in &corpus.chunks {
            let idx = graph.add_node(ChunkNode::from(chunk));
            indices.insert(chunk.id.as_str(), idx);
        }

        for chunk in &corpus.chunks {
            let src = indices[chunk.id.as_str()];
            for target in &chunk.related_chunks {
                match indices.get(target.as_str()) {
                    Some(&dst) => {
                        graph.add_edge(src, dst, ());
                    }
                    None => {
                        debug!("Dropping relation {} -> {target}: target not in corpus", chunk.id);
                    }
                }
            }
        }

        Self {
            graph,
            indices,
            corpus,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Corpus-wide relationship summary with the `top_connected` chunks that
    /// have the most outgoing relations.
    #[must_use]
    pub fn summary(&self, top_connected: usize) -> RelationSummary<'a> {
        let mut total_relations = 0;
        let mut chunks_with_relations = 0;
        let mut max_relations = 0;
        let mut by_degree: Vec<(NodeIndex, usize)> = Vec::with_capacity(self.graph.node_count());

        for node in self.graph.node_indices() {
            let degree = self
                .graph
                .edges_directed(node, petgraph::Direction::Outgoing)
                .count();
            total_relations += degree;
            if degree > 0 {
                chunks_with_relations += 1;
            }
            max_relations = max_relations.max(degree);
            by_degree.push((node, degree));
        }

        by_degree.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| self.graph[a.0].id.cmp(self.graph[b.0].id)));
        let most_connected = by_degree
            .into_iter()
            .take(top_connected)
            .map(|(node, relations)| ConnectedChunk {
                id: self.graph[node].id,
                file_path: self.graph[node].file_path,
                language: self.graph[node].language,
                symbols: self.graph[node].symbols,
                relations,
            })
            .collect();

        RelationSummary {
            total_chunks: self.graph.node_count(),
            chunks_with_relations,
            avg_relations: total_relations as f64 / self.graph.node_count() as f64,
            max_relations,
            connected_components: connected_components(&self.graph),
            most_connected,
        }
    }

    /// Explore the bounded neighborhood around `target`.
    ///
    /// Returns `None` when the id is not in the corpus. Expansion follows
    /// edges in both directions up to `depth` hops; within the induced
    /// subgraph, all shortest paths from the target to every other member
    /// are enumerated (direction ignored, consistent with the expansion).
    #[must_use]
    pub fn explore(&self, target: &str, depth: usize) -> Option<NeighborhoodReport<'a>> {
        let &start = self.indices.get(target)?;
        let target_chunk = ChunkDetails::from(self.corpus.get(target)?);

        let neighborhood = self.neighborhood(start, depth);
        let (dist, preds) = self.shortest_paths_in(start, &neighborhood);

        let from_file = self.graph[start].file_path;
        let mut connections: Vec<Connection<'a>> = Vec::new();
        for &node in &neighborhood {
            if node == start {
                continue;
            }

            let mut paths = self.collect_paths(node, start, &preds);
            paths.sort_by(|a, b| {
                let ids_a = a.iter().map(|&n| self.graph[n].id);
                let ids_b = b.iter().map(|&n| self.graph[n].id);
                ids_a.cmp(ids_b)
            });

            let records = paths
                .into_iter()
                .map(|path| PathRecord {
                    from_file,
                    to_file: self.graph[*path.last().unwrap_or(&start)].file_path,
                    hops: path.len() - 1,
                    via: path[1..path.len() - 1]
                        .iter()
                        .map(|&n| PathStep {
                            id: self.graph[n].id,
                            file_path: self.graph[n].file_path,
                        })
                        .collect(),
                })
                .collect();

            connections.push(Connection {
                chunk: self.graph[node].clone(),
                distance: dist[&node],
                paths: records,
            });
        }

        connections.sort_by(|a, b| a.distance.cmp(&b.distance).then_with(|| a.chunk.id.cmp(b.chunk.id)));

        Some(NeighborhoodReport {
            target_chunk,
            depth,
            neighborhood_size: neighborhood.len(),
            connections,
        })
    }

    /// Breadth-first expansion in both edge directions, bounded by `depth`.
    fn neighborhood(&self, start: NodeIndex, depth: usize) -> HashSet<NodeIndex> {
        let mut seen = HashSet::from([start]);
        let mut frontier = vec![start];

        for _ in 0..depth {
            let mut next = Vec::new();
            for &node in &frontier {
                for neighbor in self.graph.neighbors_undirected(node) {
                    if seen.insert(neighbor) {
                        next.push(neighbor);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            frontier = next;
        }

        seen
    }

    /// BFS over the induced subgraph, recording distances and all
    /// shortest-path predecessors per node.
    fn shortest_paths_in(
        &self,
        start: NodeIndex,
        set: &HashSet<NodeIndex>,
    ) -> (
        HashMap<NodeIndex, usize>,
        HashMap<NodeIndex, Vec<NodeIndex>>,
    ) {
        let mut dist = HashMap::from([(start, 0)]);
        let mut preds: HashMap<NodeIndex, Vec<NodeIndex>> = HashMap::new();
        let mut queue = VecDeque::from([start]);

        while let Some(node) = queue.pop_front() {
            let next_dist = dist[&node] + 1;
            for neighbor in self.graph.neighbors_undirected(node) {
                if !set.contains(&neighbor) {
                    continue;
                }
                match dist.get(&neighbor) {
                    None => {
                        dist.insert(neighbor, next_dist);
                        preds.entry(neighbor).or_default().push(node);
                        queue.push_back(neighbor);
                    }
                    Some(&d) if d == next_dist => {
                        // Parallel edges yield the same neighbor twice
                        let p = preds.entry(neighbor).or_default();
                        if !p.contains(&node) {
                            p.push(node);
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        (dist, preds)
    }

    /// Enumerate every shortest path from `start` to `node` by walking the
    /// predecessor lists backwards.
    fn collect_paths(
        &self,
        node: NodeIndex,
        start: NodeIndex,
        preds: &HashMap<NodeIndex, Vec<NodeIndex>>,
    ) -> Vec<Vec<NodeIndex>> {
        if node == start {
            return vec![vec![start]];
        }

        let mut paths = Vec::new();
        for &pred in &preds[&node] {
            for mut path in self.collect_paths(pred, start, preds) {
                path.push(node);
                paths.push(path);
            }
        }
        paths
    }
}

// ── Tests ────────────────────────────────────────────────────────────
