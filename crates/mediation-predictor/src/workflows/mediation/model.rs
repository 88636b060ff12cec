use serde::{Deserialize, Serialize};

use super::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

/// Binary probabilistic classifier scoring the positive class.
pub trait Classifier: Send + Sync {
    fn score(&self, features: &FeatureVector) -> f64;
}

/// Which of the two trained models a value or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    ProceedToMediation,
    SettledGivenMediation,
}

impl ModelKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProceedToMediation => "proceed-to-mediation",
            Self::SettledGivenMediation => "settled-given-mediation",
        }
    }
}

/// Structural problems found while compiling a tree ensemble.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("ensemble contains no trees")]
    EmptyEnsemble,
    #[error("base_score must lie strictly between 0 and 1, got {0}")]
    InvalidBaseScore(f64),
    #[error("model expects features {found:?}, predictor supplies {expected:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("tree {tree} splits on unknown feature '{feature}'")]
    UnknownFeature { tree: usize, feature: String },
    #[error("tree {tree} node {node} points at missing child {child}")]
    DanglingChild { tree: usize, node: u32, child: u32 },
    #[error("tree {tree} node {node} holds a non-finite value")]
    NonFiniteValue { tree: usize, node: u32 },
}

/// Boosted-tree dump as exported from the training notebook.
#[derive(Debug, Clone, Deserialize)]
pub struct EnsembleDocument {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    pub trees: Vec<TreeNodeDocument>,
}

fn default_base_score() -> f64 {
    0.5
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNodeDocument {
    Leaf {
        nodeid: u32,
        leaf: f64,
    },
    Split {
        nodeid: u32,
        split: String,
        split_condition: f64,
        yes: u32,
        no: u32,
        children: Vec<TreeNodeDocument>,
    },
}

impl TreeNodeDocument {
    fn nodeid(&self) -> u32 {
        match self {
            Self::Leaf { nodeid, .. } | Self::Split { nodeid, .. } => *nodeid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf(f64),
    Split {
        feature: usize,
        threshold: f64,
        yes: usize,
        no: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf_value(&self, row: &[f64; FEATURE_COUNT]) -> f64 {
        let mut cursor = 0;
        loop {
            match self.nodes[cursor] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                } => {
                    cursor = if row[feature] < threshold { yes } else { no };
                }
            }
        }
    }
}

/// Gradient-boosted trees with a logistic link.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedTreeClassifier {
    base_margin: f64,
    trees: Vec<Tree>,
}

impl BoostedTreeClassifier {
    pub fn from_document(document: EnsembleDocument) -> Result<Self, ModelError> {
        if let Some(names) = &document.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ModelError::FeatureMismatch {
                    expected: FEATURE_NAMES.iter().map(|name| name.to_string()).collect(),
                    found: names.clone(),
                });
            }
        }

        if !(document.base_score > 0.0 && document.base_score < 1.0) {
            return Err(ModelError::InvalidBaseScore(document.base_score));
        }

        if document.trees.is_empty() {
            return Err(ModelError::EmptyEnsemble);
        }

        let trees = document
            .trees
            .iter()
            .enumerate()
            .map(|(index, root)| {
                let mut nodes = Vec::new();
                compile_node(index, root, &mut nodes)?;
                Ok(Tree { nodes })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        let base = document.base_score;
        Ok(Self {
            base_margin: (base / (1.0 - base)).ln(),
            trees,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn margin(&self, features: &FeatureVector) -> f64 {
        let row = features.as_array();
        self.base_margin
            + self
                .trees
                .iter()
                .map(|tree| tree.leaf_value(&row))
                .sum::<f64>()
    }
}

impl Classifier for BoostedTreeClassifier {
    fn score(&self, features: &FeatureVector) -> f64 {
        sigmoid(self.margin(features))
    }
}

fn sigmoid(margin: f64) -> f64 {
    1.0 / (1.0 + (-margin).exp())
}

fn resolve_feature(tree: usize, split: &str) -> Result<usize, ModelError> {
    if let Some(position) = FEATURE_NAMES.iter().position(|name| *name == split) {
        return Ok(position);
    }

    split
        .strip_prefix('f')
        .and_then(|index| index.parse::<usize>().ok())
        .filter(|index| *index < FEATURE_COUNT)
        .ok_or_else(|| ModelError::UnknownFeature {
            tree,
            feature: split.to_string(),
        })
}

// Children are looked up among the split's own `children`, so every branch
// strictly descends and evaluation always terminates.
fn compile_node(
    tree: usize,
    node: &TreeNodeDocument,
    out: &mut Vec<Node>,
) -> Result<usize, ModelError> {
    match node {
        TreeNodeDocument::Leaf { nodeid, leaf } => {
            if !leaf.is_finite() {
                return Err(ModelError::NonFiniteValue {
                    tree,
                    node: *nodeid,
                });
            }
            out.push(Node::Leaf(*leaf));
            Ok(out.len() - 1)
        }
        TreeNodeDocument::Split {
            nodeid,
            split,
            split_condition,
            yes,
            no,
            children,
        } => {
            if !split_condition.is_finite() {
                return Err(ModelError::NonFiniteValue {
                    tree,
                    node: *nodeid,
                });
            }
            let feature = resolve_feature(tree, split)?;
            let child = |id: u32| {
                children
                    .iter()
                    .find(|candidate| candidate.nodeid() == id)
                    .ok_or(ModelError::DanglingChild {
                        tree,
                        node: *nodeid,
                        child: id,
                    })
            };
            let yes_child = child(*yes)?;
            let no_child = child(*no)?;

            let slot = out.len();
            out.push(Node::Leaf(0.0));
            let yes_index = compile_node(tree, yes_child, out)?;
            let no_index = compile_node(tree, no_child, out)?;
            out[slot] = Node::Split {
                feature,
                threshold: *split_condition,
                yes: yes_index,
                no: no_index,
            };
            Ok(slot)
        }
    }
}

/// The two trained classifiers, fixed for the lifetime of the process.
pub struct ModelStore {
    proceed: Box<dyn Classifier>,
    settled: Box<dyn Classifier>,
}

impl ModelStore {
    pub fn new(proceed: Box<dyn Classifier>, settled: Box<dyn Classifier>) -> Self {
        Self { proceed, settled }
    }

    pub fn model(&self, kind: ModelKind) -> &dyn Classifier {
        match kind {
            ModelKind::ProceedToMediation => self.proceed.as_ref(),
            ModelKind::SettledGivenMediation => self.settled.as_ref(),
        }
    }
}
