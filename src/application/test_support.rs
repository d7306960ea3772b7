// In-memory collaborators and an on-disk fixture for the stage tests.

use anyhow::{anyhow, Result};
use std::{
    cell::RefCell,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};
use tempfile::TempDir;

use crate::domain::{
    artifacts::TrainerArtifact,
    config::EvaluationConfig,
    error::StageFault,
    traits::{BinaryClassifier, ModelLoader, RemoteStorage},
};
use crate::infra::tokenizer_store::TokenizerStore;

type PullCall = (String, String, PathBuf);
type PushCall = (String, PathBuf, String);

// ─── FakeStorage ──────────────────────────────────────────────────────────────
/// Records every call. Clones share the same log.
#[derive(Clone, Default)]
pub struct FakeStorage {
    /// Bytes a pull writes, `None` when the bucket has no such object
    remote: Option<Vec<u8>>,
    fail:   bool,
    pulls:  Rc<RefCell<Vec<PullCall>>>,
    pushes: Rc<RefCell<Vec<PushCall>>>,
}

impl FakeStorage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn holding(bytes: &[u8]) -> Self {
        Self { remote: Some(bytes.to_vec()), ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn pulls(&self) -> Vec<PullCall> {
        self.pulls.borrow().clone()
    }

    pub fn pushes(&self) -> Vec<PushCall> {
        self.pushes.borrow().clone()
    }
}

impl RemoteStorage for FakeStorage {
    fn pull(&self, bucket: &str, object_name: &str, dest_dir: &Path) -> Result<()> {
        self.pulls
            .borrow_mut()
            .push((bucket.to_string(), object_name.to_string(), dest_dir.to_path_buf()));
        if self.fail {
            return Err(anyhow!("connection reset by peer"));
        }
        if let Some(bytes) = &self.remote {
            fs::write(dest_dir.join(object_name), bytes)?;
        }
        Ok(())
    }

    fn push(&self, bucket: &str, src_dir: &Path, object_name: &str) -> Result<()> {
        self.pushes
            .borrow_mut()
            .push((bucket.to_string(), src_dir.to_path_buf(), object_name.to_string()));
        if self.fail {
            return Err(anyhow!("403 Forbidden"));
        }
        Ok(())
    }
}

// ─── FakeClassifier ───────────────────────────────────────────────────────────
/// Returns fixed probabilities and remembers the rows it was given.
pub struct FakeClassifier {
    probabilities: Vec<f32>,
    seen:          RefCell<Vec<Vec<u32>>>,
}

impl FakeClassifier {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self { probabilities, seen: RefCell::new(Vec::new()) }
    }

    pub fn seen_rows(&self) -> Vec<Vec<u32>> {
        self.seen.borrow().clone()
    }
}

impl BinaryClassifier for FakeClassifier {
    fn predict(&self, rows: &[Vec<u32>]) -> Result<Vec<f32>> {
        *self.seen.borrow_mut() = rows.to_vec();
        Ok(self.probabilities.clone())
    }
}

// ─── FakeLoader ───────────────────────────────────────────────────────────────
/// A model file's contents name the fake model it loads as.
#[derive(Default)]
pub struct FakeLoader {
    models: HashMap<String, Vec<f32>>,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, name: &str, probabilities: Vec<f32>) -> Self {
        self.models.insert(name.to_string(), probabilities);
        self
    }
}

impl ModelLoader for FakeLoader {
    type Model = FakeClassifier;

    fn load(&self, path: &Path) -> std::result::Result<FakeClassifier, StageFault> {
        let name = fs::read_to_string(path).map_err(|e| StageFault::io(path, e))?;
        self.models
            .get(name.trim())
            .map(|p| FakeClassifier::new(p.clone()))
            .ok_or_else(|| StageFault::ModelLoad {
                path:   path.to_path_buf(),
                source: anyhow!("unknown model '{name}'"),
            })
    }
}

// ─── Fixture ──────────────────────────────────────────────────────────────────
/// A scratch directory with a 4-row test split (labels [0, 1, 1, 0]),
/// a fitted tokenizer, and a trained model file named "trained".
pub struct Fixture {
    dir:         TempDir,
    pub max_len: usize,
}

impl Fixture {
    pub fn new() -> Self {
        let dir  = tempfile::tempdir().expect("tempdir");
        let root = dir.path();

        fs::write(
            root.join("x_test.csv"),
            ",tweet\n\
             0,have a lovely day\n\
             1,you are a disgrace\n\
             2,\"shut up, nobody asked\"\n\
             3,great game last night\n",
        ).expect("x_test");
        fs::write(root.join("y_test.csv"), ",label\n0,0\n1,1\n2,1\n3,0\n").expect("y_test");

        let corpus = vec![
            "have a lovely day".to_string(),
            "you are a disgrace".to_string(),
            "great game".to_string(),
        ];
        TokenizerStore::new(root.join("tokenizer.json"))
            .fit(&corpus, 50)
            .expect("tokenizer");

        let trained_dir = root.join("trained_model");
        fs::create_dir_all(&trained_dir).expect("trained dir");
        fs::write(trained_dir.join("model.mpk"), "trained").expect("trained model");

        Self { dir, max_len: 6 }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn best_model_dir(&self) -> PathBuf {
        self.dir().join("best_model")
    }

    pub fn trainer_artifact(&self) -> TrainerArtifact {
        TrainerArtifact {
            trained_model_path: self.dir().join("trained_model/model.mpk"),
            x_test_path:        self.dir().join("x_test.csv"),
            y_test_path:        self.dir().join("y_test.csv"),
        }
    }

    pub fn evaluation_config(&self) -> EvaluationConfig {
        EvaluationConfig {
            bucket_name:    "models".into(),
            model_name:     "model.mpk".into(),
            best_model_dir: self.best_model_dir(),
            tokenizer_path: self.dir().join("tokenizer.json"),
            max_len:        self.max_len,
            batch_size:     2,
            ..EvaluationConfig::default()
        }
    }
}
