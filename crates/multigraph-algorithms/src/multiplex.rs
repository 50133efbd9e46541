//! Multiplex community detection
//!
//! A multiplex is a stack of undirected layers over one shared node set. Each layer carries a
//! weight (negative weights are allowed and penalise co-membership) and the partition is
//! chosen to maximise the weighted sum of the layers' modularity:
//!
//! ```text
//! Q = Σ_l w_l / 2m_l · Σ_ij [A_ij − γ_l · k_i · k_j / 2m_l] · δ(c_i, c_j)
//! ```
//!
//! Optimisation is Louvain-style: local moving of single nodes until no move improves `Q`,
//! then aggregation of each community into a super node, repeated until nothing merges.

use super::common::{sort_communities, GraphView, NodeId};
use super::error::{AlgoError, AlgoResult};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Smallest gain that counts as an improvement
const GAIN_EPSILON: f64 = 1e-10;

/// Upper bound on local-moving sweeps per level
const MAX_SWEEPS: usize = 256;

/// One layer as a weighted, symmetric adjacency over dense indices.
#[derive(Debug, Clone)]
struct Layer {
    /// Neighbours with the summed weight of all lines to them; a self-loop counts twice
    adjacency: Vec<Vec<(usize, f64)>>,
    degree: Vec<f64>,
    two_m: f64,
}

impl Layer {
    fn from_view(view: &GraphView) -> Self {
        let n = view.node_count;
        let mut rows: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];

        for u in 0..n {
            for (pos, &v) in view.successors(u).iter().enumerate() {
                let w = view.weight_at(u, pos);
                *rows[u].entry(v).or_insert(0.0) += w;
                // A directed view only stores one side of each line
                if view.directed {
                    *rows[v].entry(u).or_insert(0.0) += w;
                }
            }
        }

        Self::from_rows(rows)
    }

    fn from_rows(rows: Vec<HashMap<usize, f64>>) -> Self {
        let adjacency: Vec<Vec<(usize, f64)>> = rows
            .into_iter()
            .map(|row| {
                let mut row: Vec<(usize, f64)> = row.into_iter().collect();
                row.sort_unstable_by_key(|&(v, _)| v);
                row
            })
            .collect();
        let degree: Vec<f64> = adjacency
            .iter()
            .map(|row| row.iter().map(|&(_, w)| w).sum())
            .collect();
        let two_m: f64 = degree.iter().sum();

        Layer { adjacency, degree, two_m }
    }

    /// Collapse every community into a single node. Total weight is preserved.
    fn aggregate(&self, community: &[usize], count: usize) -> Self {
        let mut rows: Vec<HashMap<usize, f64>> = vec![HashMap::new(); count];
        for (u, row) in self.adjacency.iter().enumerate() {
            for &(v, w) in row {
                *rows[community[u]].entry(community[v]).or_insert(0.0) += w;
            }
        }
        Self::from_rows(rows)
    }
}

/// Undirected layers that share an identical node id set.
#[derive(Debug, Clone)]
pub struct MultiplexLayers {
    node_ids: Vec<NodeId>,
    layers: Vec<Layer>,
}

impl MultiplexLayers {
    /// Fails with [`AlgoError::LayerMismatch`] unless every view holds the same node ids.
    pub fn new(views: &[GraphView]) -> AlgoResult<Self> {
        let node_ids = views
            .first()
            .map(|v| v.index_to_node.clone())
            .unwrap_or_default();

        if views.iter().any(|v| v.index_to_node != node_ids) {
            return Err(AlgoError::LayerMismatch);
        }

        Ok(MultiplexLayers {
            node_ids,
            layers: views.iter().map(Layer::from_view).collect(),
        })
    }

    /// Number of layers
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Shared node ids, ascending
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    fn check_weights(&self, weights: &[f64]) -> AlgoResult<()> {
        if weights.len() != self.depth() {
            return Err(AlgoError::WeightMismatch {
                layers: self.depth(),
                weights: weights.len(),
            });
        }
        Ok(())
    }

    /// One resolution per layer. Empty means 1.0 everywhere, a single value is shared.
    fn expand_resolutions(&self, resolutions: &[f64]) -> AlgoResult<Vec<f64>> {
        match resolutions.len() {
            0 => Ok(vec![1.0; self.depth()]),
            1 => Ok(vec![resolutions[0]; self.depth()]),
            n if n == self.depth() => Ok(resolutions.to_vec()),
            n => Err(AlgoError::ResolutionMismatch {
                layers: self.depth(),
                resolutions: n,
            }),
        }
    }

    /// Dense community index per node. Nodes missing from `communities` stand alone.
    fn membership(&self, communities: &[Vec<NodeId>]) -> Vec<usize> {
        let mut by_id: HashMap<NodeId, usize> = HashMap::new();
        for (c, members) in communities.iter().enumerate() {
            for &id in members {
                by_id.insert(id, c);
            }
        }

        let mut next = communities.len();
        self.node_ids
            .iter()
            .map(|id| {
                by_id.get(id).copied().unwrap_or_else(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect()
    }
}

/// Weighted modularity of each layer for the given partition.
///
/// `resolutions` may be empty (γ = 1), hold one shared value, or one value per layer.
/// Layers without lines score 0.
pub fn q_multiplex(
    layers: &MultiplexLayers,
    communities: &[Vec<NodeId>],
    weights: &[f64],
    resolutions: &[f64],
) -> AlgoResult<Vec<f64>> {
    layers.check_weights(weights)?;
    let gammas = layers.expand_resolutions(resolutions)?;
    let membership = layers.membership(communities);
    let count = membership.iter().max().map_or(0, |&c| c + 1);

    let q = layers
        .layers
        .iter()
        .zip(weights.iter().zip(&gammas))
        .map(|(layer, (&weight, &gamma))| {
            if layer.two_m == 0.0 {
                return 0.0;
            }

            let mut internal = vec![0.0; count];
            let mut total = vec![0.0; count];
            for (u, row) in layer.adjacency.iter().enumerate() {
                let c = membership[u];
                total[c] += layer.degree[u];
                internal[c] += row
                    .iter()
                    .filter(|&&(v, _)| membership[v] == c)
                    .map(|&(_, w)| w)
                    .sum::<f64>();
            }

            let sum: f64 = internal
                .iter()
                .zip(&total)
                .map(|(&inside, &tot)| inside - gamma * tot * tot / layer.two_m)
                .sum();
            weight * sum / layer.two_m
        })
        .collect();

    Ok(q)
}

/// Partition the multiplex by greedy modularity optimisation.
///
/// With `all` set every community is a candidate when a node moves, not only those of its
/// neighbours. Set it when some weights are negative.
pub fn modularize_multiplex<R: Rng + ?Sized>(
    layers: &MultiplexLayers,
    weights: &[f64],
    resolutions: &[f64],
    all: bool,
    rng: &mut R,
) -> AlgoResult<Vec<Vec<NodeId>>> {
    layers.check_weights(weights)?;
    let gammas = layers.expand_resolutions(resolutions)?;

    let n = layers.node_ids.len();
    let mut membership: Vec<usize> = (0..n).collect();
    let mut current = layers.layers.clone();
    let mut size = n;
    let mut level = 0;

    while size > 0 {
        let (community, count) = local_moving(&current, size, weights, &gammas, all, rng);
        level += 1;
        if count == size {
            break;
        }

        for m in membership.iter_mut() {
            *m = community[*m];
        }
        current = current
            .iter()
            .map(|layer| layer.aggregate(&community, count))
            .collect();
        size = count;
    }

    let mut grouped: Vec<Vec<NodeId>> = vec![Vec::new(); size];
    for (idx, &c) in membership.iter().enumerate() {
        grouped[c].push(layers.node_ids[idx]);
    }
    grouped.retain(|c| !c.is_empty());
    sort_communities(&mut grouped);

    tracing::trace!(levels = level, communities = grouped.len(), "modularized multiplex");
    Ok(grouped)
}

/// One Louvain level: returns the community of every node, relabelled densely, and the
/// number of communities.
fn local_moving<R: Rng + ?Sized>(
    layers: &[Layer],
    n: usize,
    weights: &[f64],
    gammas: &[f64],
    all: bool,
    rng: &mut R,
) -> (Vec<usize>, usize) {
    let depth = layers.len();
    let mut community: Vec<usize> = (0..n).collect();
    let mut members = vec![1usize; n];
    let mut totals: Vec<Vec<f64>> = layers.iter().map(|l| l.degree.clone()).collect();
    let mut empty: Vec<usize> = Vec::new();
    let mut order: Vec<usize> = (0..n).collect();

    // Gain of placing `u` in a community with `links` weight from u and totals `tot(l)`
    let gain = |u: usize, links: &[f64], tot: &dyn Fn(usize) -> f64| -> f64 {
        (0..depth)
            .filter(|&l| layers[l].two_m > 0.0)
            .map(|l| {
                let layer = &layers[l];
                weights[l] / layer.two_m
                    * (links[l] - gammas[l] * tot(l) * layer.degree[u] / layer.two_m)
            })
            .sum()
    };

    for _ in 0..MAX_SWEEPS {
        let mut moved = false;
        order.shuffle(rng);

        for &u in &order {
            let from = community[u];

            let mut links: HashMap<usize, Vec<f64>> = HashMap::new();
            for (l, layer) in layers.iter().enumerate() {
                for &(v, w) in &layer.adjacency[u] {
                    if v != u {
                        links.entry(community[v]).or_insert_with(|| vec![0.0; depth])[l] += w;
                    }
                }
            }

            // Take u out of its community
            members[from] -= 1;
            for (l, layer) in layers.iter().enumerate() {
                totals[l][from] -= layer.degree[u];
                if members[from] == 0 {
                    totals[l][from] = 0.0;
                }
            }

            let no_links = vec![0.0; depth];
            let score = |c: usize| {
                let k = links.get(&c).unwrap_or(&no_links);
                gain(u, k, &|l| totals[l][c])
            };

            let mut best = from;
            let mut best_gain = score(from);

            let mut candidates: Vec<usize> = if all {
                (0..n).filter(|&c| members[c] > 0).collect()
            } else {
                let mut c: Vec<usize> = links.keys().copied().collect();
                c.sort_unstable();
                c
            };
            // Standing alone is always an option
            if members[from] > 0 {
                if let Some(&alone) = empty.last() {
                    candidates.push(alone);
                }
            }

            for c in candidates {
                if c == from {
                    continue;
                }
                let g = score(c);
                if g > best_gain + GAIN_EPSILON {
                    best = c;
                    best_gain = g;
                }
            }

            if members[best] == 0 && best != from {
                empty.retain(|&c| c != best);
            }
            members[best] += 1;
            for (l, layer) in layers.iter().enumerate() {
                totals[l][best] += layer.degree[u];
            }
            community[u] = best;

            if best != from {
                moved = true;
                if members[from] == 0 {
                    empty.push(from);
                }
            }
        }

        if !moved {
            break;
        }
    }

    // Relabel densely in order of first appearance
    let mut relabel: HashMap<usize, usize> = HashMap::new();
    for c in community.iter_mut() {
        let next = relabel.len();
        *c = *relabel.entry(*c).or_insert(next);
    }
    let count = relabel.len();
    (community, count)
}

/// Best partition found for one resolution, with its summed multiplex modularity
pub type Scored = (f64, Vec<Vec<NodeId>>);

/// Build a scoring function for [`crate::profile`].
///
/// For each resolution the multiplex is modularized `effort` times (at least once) and the
/// partition with the highest summed weighted `Q` is kept.
pub fn modular_multiplex_score<'a, R: Rng + 'a>(
    layers: &'a MultiplexLayers,
    weights: &'a [f64],
    all: bool,
    effort: usize,
    mut rng: R,
) -> impl FnMut(f64) -> AlgoResult<Scored> + 'a {
    move |resolution: f64| {
        let mut best: Option<Scored> = None;
        for _ in 0..effort.max(1) {
            let communities = modularize_multiplex(layers, weights, &[resolution], all, &mut rng)?;
            let score: f64 = q_multiplex(layers, &communities, weights, &[resolution])?
                .iter()
                .sum();
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, communities));
            }
        }
        Ok(best.unwrap_or_default())
    }
}
