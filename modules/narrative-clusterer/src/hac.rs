//! Agglomerative clustering with cosine distance and average linkage,
//! cut at a fixed distance threshold rather than a target cluster count
//! (spec §4.2 phase 2).

use rayon::prelude::*;

#[derive(Debug, Clone)]
struct Cluster {
    items: Vec<usize>,
}

fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;
    for (ai, bi) in a.iter().zip(b) {
        dot += ai * bi;
        norm_a += ai * ai;
        norm_b += bi * bi;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

/// Row-parallel pairwise cosine-distance matrix, same split as an
/// embeddings-based HAC pass: each row's upper-triangle entries are
/// computed independently, then mirrored.
fn compute_distance_matrix(vectors: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = vectors.len();
    let mut distances = vec![vec![0.0; n]; n];
    let results: Vec<(usize, usize, f64)> = (0..n)
        .into_par_iter()
        .flat_map(|i| {
            (i + 1..n)
                .map(|j| (i, j, 1.0 - cosine_similarity(&vectors[i], &vectors[j])))
                .collect::<Vec<_>>()
        })
        .collect();
    for (i, j, dist) in results {
        distances[i][j] = dist;
        distances[j][i] = dist;
    }
    distances
}

fn average_linkage(a: &Cluster, b: &Cluster, distances: &[Vec<f64>]) -> f64 {
    let mut total = 0.0;
    let mut count = 0usize;
    for &i in &a.items {
        for &j in &b.items {
            total += distances[i][j];
            count += 1;
        }
    }
    total / count.max(1) as f64
}

/// Merge nearest clusters until the minimum pairwise distance exceeds
/// `cut_distance`. Returns each surviving cluster as the indices of its
/// member documents (singletons included — callers filter by size).
pub fn cluster(vectors: &[Vec<f64>], cut_distance: f64) -> Vec<Vec<usize>> {
    let n = vectors.len();
    if n == 0 {
        return Vec::new();
    }
    let distances = compute_distance_matrix(vectors);
    let mut clusters: Vec<Cluster> = (0..n).map(|i| Cluster { items: vec![i] }).collect();

    loop {
        let n_clusters = clusters.len();
        if n_clusters < 2 {
            break;
        }
        let (merge_i, merge_j, min_dist) = (0..n_clusters)
            .into_par_iter()
            .flat_map_iter(|i| ((i + 1)..n_clusters).map(move |j| (i, j)))
            .map(|(i, j)| (i, j, average_linkage(&clusters[i], &clusters[j], &distances)))
            .reduce(
                || (0, 1, f64::INFINITY),
                |a, b| if a.2 <= b.2 { a } else { b },
            );

        if min_dist > cut_distance {
            break;
        }

        let mut merged_items = clusters[merge_i].items.clone();
        merged_items.extend(&clusters[merge_j].items);
        let merged = Cluster {
            items: merged_items,
        };
        // Remove the higher index first so the lower index remains valid.
        clusters.remove(merge_j);
        clusters.remove(merge_i);
        clusters.push(merged);
    }

    clusters.into_iter().map(|c| c.items).collect()
}
