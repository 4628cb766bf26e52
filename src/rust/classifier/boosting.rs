use log::debug;
use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::error::ClassifierError;
use super::utils::softmax;

/// Hyperparameters of the boosted ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostingConfig {
    /// Number of boosting rounds; each round fits one tree per class
    pub n_estimators: usize,
    pub max_depth: usize,
    /// Shrinkage applied to every tree's contribution
    pub learning_rate: f64,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Seed for the per-tree feature order, which decides ties between
    /// equally good splits
    pub seed: u64,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: 5,
            learning_rate: 0.1,
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

/// A least-squares regression tree over dense feature rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    pub fn predict(&self, row: ArrayView1<f32>) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if row[feature] <= threshold { left } else { right },
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
            }
        }
        walk(&self.nodes, 0)
    }
}

/// Grows one tree against the residuals of a single class.
struct TreeGrower<'a> {
    x: &'a Array2<f32>,
    // Non-zero entries per feature, sorted by value.
    columns: &'a [Vec<(usize, f32)>],
    residuals: &'a [f64],
    probs: &'a [f64],
    feature_order: &'a [usize],
    config: &'a BoostingConfig,
    n_classes: usize,
    in_node: Vec<bool>,
    nodes: Vec<Node>,
}

impl TreeGrower<'_> {
    fn grow(mut self, samples: Vec<usize>) -> RegressionTree {
        self.grow_node(samples, 0);
        RegressionTree { nodes: self.nodes }
    }

    fn grow_node(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { value: 0.0 });

        let split = if depth < self.config.max_depth && samples.len() >= self.config.min_samples_split {
            self.best_split(&samples)
        } else {
            None
        };

        match split {
            Some((feature, threshold)) => {
                let (left, right): (Vec<usize>, Vec<usize>) = samples
                    .iter()
                    .partition(|&&s| self.x[[s, feature]] <= threshold);
                let left = self.grow_node(left, depth + 1);
                let right = self.grow_node(right, depth + 1);
                self.nodes[idx] = Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                };
            }
            None => {
                self.nodes[idx] = Node::Leaf {
                    value: self.leaf_value(&samples),
                };
            }
        }
        idx
    }

    /// One Newton step on the multinomial deviance for the samples in a leaf.
    fn leaf_value(&self, samples: &[usize]) -> f64 {
        let numerator: f64 = samples.iter().map(|&s| self.residuals[s]).sum();
        let denominator: f64 = samples
            .iter()
            .map(|&s| self.probs[s] * (1.0 - self.probs[s]))
            .sum();
        if denominator.abs() < 1e-150 {
            return 0.0;
        }
        let k = self.n_classes as f64;
        (k - 1.0) / k * numerator / denominator
    }

    /// Finds the split that most reduces squared error, scanning features in
    /// `feature_order`. Earlier features win ties.
    fn best_split(&mut self, samples: &[usize]) -> Option<(usize, f32)> {
        let n = samples.len();
        let min_leaf = self.config.min_samples_leaf.max(1);
        let total: f64 = samples.iter().map(|&s| self.residuals[s]).sum();
        let base = total * total / n as f64;

        for &s in samples {
            self.in_node[s] = true;
        }

        let mut best: Option<(usize, f32)> = None;
        let mut best_gain = 1e-12;

        for &feature in self.feature_order {
            let entries: Vec<(usize, f32)> = self.columns[feature]
                .iter()
                .filter(|(s, _)| self.in_node[*s])
                .copied()
                .collect();
            if entries.is_empty() {
                continue;
            }

            let nonzero_sum: f64 = entries.iter().map(|(s, _)| self.residuals[*s]).sum();
            let mut left_n = n - entries.len();
            let mut left_sum = total - nonzero_sum;
            let mut prev = 0.0f32;
            let mut i = 0;

            while i < entries.len() {
                let value = entries[i].1;
                let right_n = n - left_n;
                if left_n >= min_leaf && right_n >= min_leaf {
                    let right_sum = total - left_sum;
                    let gain = left_sum * left_sum / left_n as f64
                        + right_sum * right_sum / right_n as f64
                        - base;
                    if gain > best_gain {
                        let mid = (prev + value) / 2.0;
                        let threshold = if mid >= value { prev } else { mid };
                        best_gain = gain;
                        best = Some((feature, threshold));
                    }
                }
                while i < entries.len() && entries[i].1 == value {
                    left_n += 1;
                    left_sum += self.residuals[entries[i].0];
                    i += 1;
                }
                prev = value;
            }
        }

        for &s in samples {
            self.in_node[s] = false;
        }
        best
    }
}

/// Multi-class gradient boosting with softmax loss: one regression tree per
/// class per round, starting from the log class priors.
#[derive(Debug, Clone)]
pub struct GradientBoosting {
    priors: Array1<f64>,
    init: Array1<f64>,
    trees: Vec<Vec<RegressionTree>>,
    learning_rate: f64,
}

impl GradientBoosting {
    /// Fits the ensemble on rows of `x` labelled with class indices in
    /// `0..n_classes`. Every class needs at least one sample.
    pub fn fit(
        config: &BoostingConfig,
        x: &Array2<f32>,
        labels: &[usize],
        n_classes: usize,
    ) -> Result<Self, ClassifierError> {
        let (n_samples, n_features) = x.dim();
        if n_samples == 0 || n_samples != labels.len() {
            return Err(ClassifierError::BuildError(format!(
                "Expected one label per sample, got {} samples and {} labels",
                n_samples,
                labels.len()
            )));
        }
        if n_classes < 2 {
            return Err(ClassifierError::BuildError("At least two classes are required".into()));
        }
        if config.n_estimators == 0 || config.max_depth == 0 {
            return Err(ClassifierError::ValidationError(
                "n_estimators and max_depth must be positive".into(),
            ));
        }
        if !(config.learning_rate > 0.0 && config.learning_rate.is_finite()) {
            return Err(ClassifierError::ValidationError(format!(
                "learning_rate must be positive, got {}",
                config.learning_rate
            )));
        }

        let mut counts = vec![0usize; n_classes];
        for &label in labels {
            if label >= n_classes {
                return Err(ClassifierError::BuildError(format!("Label {} out of range", label)));
            }
            counts[label] += 1;
        }
        if let Some(missing) = counts.iter().position(|&c| c == 0) {
            return Err(ClassifierError::BuildError(format!(
                "Class {} has no training samples",
                missing
            )));
        }

        let priors = Array1::from_iter(counts.iter().map(|&c| c as f64 / n_samples as f64));
        let init = priors.mapv(f64::ln);

        let mut columns: Vec<Vec<(usize, f32)>> = vec![Vec::new(); n_features];
        for ((s, f), &v) in x.indexed_iter() {
            if v != 0.0 {
                columns[f].push((s, v));
            }
        }
        for column in &mut columns {
            column.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        }

        let mut onehot = Array2::<f64>::zeros((n_samples, n_classes));
        for (s, &label) in labels.iter().enumerate() {
            onehot[[s, label]] = 1.0;
        }

        let mut raw = Array2::<f64>::zeros((n_samples, n_classes));
        for mut row in raw.rows_mut() {
            row.assign(&init);
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut feature_order: Vec<usize> = (0..n_features).collect();
        let all_samples: Vec<usize> = (0..n_samples).collect();
        let mut trees = Vec::with_capacity(config.n_estimators);

        for round in 0..config.n_estimators {
            let mut probs = Array2::<f64>::zeros((n_samples, n_classes));
            for (s, row) in raw.rows().into_iter().enumerate() {
                probs.row_mut(s).assign(&softmax(row));
            }

            if round % 50 == 0 {
                let loss = -(0..n_samples)
                    .map(|s| probs[[s, labels[s]]].max(1e-15).ln())
                    .sum::<f64>()
                    / n_samples as f64;
                debug!("Boosting round {}: training log-loss {:.4}", round, loss);
            }

            let mut round_trees = Vec::with_capacity(n_classes);
            for class in 0..n_classes {
                let class_probs: Vec<f64> = probs.column(class).to_vec();
                let residuals: Vec<f64> = onehot
                    .column(class)
                    .iter()
                    .zip(&class_probs)
                    .map(|(y, p)| y - p)
                    .collect();

                feature_order.shuffle(&mut rng);
                let tree = TreeGrower {
                    x,
                    columns: &columns,
                    residuals: &residuals,
                    probs: &class_probs,
                    feature_order: &feature_order,
                    config,
                    n_classes,
                    in_node: vec![false; n_samples],
                    nodes: Vec::new(),
                }
                .grow(all_samples.clone());

                for (s, row) in x.rows().into_iter().enumerate() {
                    raw[[s, class]] += config.learning_rate * tree.predict(row);
                }
                round_trees.push(tree);
            }
            trees.push(round_trees);
        }

        Ok(Self {
            priors,
            init,
            trees,
            learning_rate: config.learning_rate,
        })
    }

    pub fn n_estimators(&self) -> usize {
        self.trees.len()
    }

    /// Class frequencies in the training labels.
    pub fn priors(&self) -> &Array1<f64> {
        &self.priors
    }

    /// Unnormalized class scores for one feature row.
    pub fn decision_function(&self, row: ArrayView1<f32>) -> Array1<f64> {
        let mut raw = self.init.clone();
        for round in &self.trees {
            for (class, tree) in round.iter().enumerate() {
                raw[class] += self.learning_rate * tree.predict(row);
            }
        }
        raw
    }

    /// Class probabilities for one feature row.
    pub fn predict_proba(&self, row: ArrayView1<f32>) -> Array1<f64> {
        softmax(self.decision_function(row).view())
    }

    /// Every fitted tree, round by round.
    pub fn trees(&self) -> impl Iterator<Item = &RegressionTree> {
        self.trees.iter().flatten()
    }

    #[cfg(test)]
    pub(crate) fn set_init(&mut self, init: Array1<f64>) {
        self.init = init;
    }
}
