use std::collections::HashMap;

use tracing::instrument;

use crate::config::ClusterConfig;
use crate::error::FloorscanError;
use crate::model::TextFragment;

/// Group fragments by single-linkage agglomerative clustering of their bbox centers.
///
/// Two fragments end up together when a chain of centers connects them with
/// every link at most `distance_threshold` long. Groups come out in order of
/// their first member; members keep input order. No row assumption is made.
#[instrument(level = "debug", skip_all, fields(fragments = fragments.len()))]
pub fn cluster_freeform(
    fragments: &[TextFragment],
    config: &ClusterConfig,
) -> Result<Vec<Vec<TextFragment>>, FloorscanError> {
    config.validate()?;
    for fragment in fragments {
        fragment.validate()?;
    }

    let centers: Vec<(f64, f64)> = fragments.iter().map(|f| f.bbox.center_f64()).collect();
    let mut sets = DisjointSets::new(centers.len());

    for i in 0..centers.len() {
        for j in (i + 1)..centers.len() {
            let (dx, dy) = (centers[i].0 - centers[j].0, centers[i].1 - centers[j].1);
            if dx.hypot(dy) <= config.distance_threshold {
                sets.union(i, j);
            }
        }
    }

    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<TextFragment>> = Vec::new();
    for (i, fragment) in fragments.iter().enumerate() {
        let root = sets.find(i);
        let idx = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[idx].push(fragment.clone());
    }

    tracing::debug!(groups = groups.len(), "freeform clustering done");
    Ok(groups)
}

struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        DisjointSets {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}
