//! Shared fixtures for pipeline integration tests.
#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use anyhow::Result;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use imagenet_core::{Classification, Classifier, Engine, ImageSet, Network, ProfilePlan};
use imagenet_utils::ProfileSettings;
use tempfile::TempDir;

/// Engine whose timings are scripted per image width.
///
/// Each test image is `width x 1` pixels, so the width identifies the image
/// inside `classify`.
#[derive(Default)]
pub struct ScriptedEngine {
    /// width -> (device ms, host ms) per call, cycled.
    pub script: BTreeMap<u32, Vec<(f32, f32)>>,
    /// Global call indices (0-based) that fail.
    pub failing_calls: BTreeSet<usize>,
    pub fail_load: bool,
    pub loads: RefCell<Vec<Network>>,
    pub calls: Rc<RefCell<usize>>,
    /// Timing reads that happened before the classifier was synchronized.
    pub unsynced_reads: Rc<Cell<usize>>,
}

impl ScriptedEngine {
    pub fn with_script(entries: Vec<(u32, Vec<(f32, f32)>)>) -> Self {
        Self {
            script: entries.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Engine for ScriptedEngine {
    type Model = ScriptedClassifier;

    fn name(&self) -> &'static str {
        "scripted"
    }

    fn load(&self, network: Network) -> Result<Self::Model> {
        self.loads.borrow_mut().push(network);
        anyhow::ensure!(!self.fail_load, "cannot load {network}");
        Ok(ScriptedClassifier {
            script: self.script.clone(),
            cursors: BTreeMap::new(),
            failing_calls: self.failing_calls.clone(),
            calls: Rc::clone(&self.calls),
            unsynced_reads: Rc::clone(&self.unsynced_reads),
            last: (0.0, 0.0),
            synced: Cell::new(false),
        })
    }
}

pub struct ScriptedClassifier {
    script: BTreeMap<u32, Vec<(f32, f32)>>,
    cursors: BTreeMap<u32, usize>,
    failing_calls: BTreeSet<usize>,
    calls: Rc<RefCell<usize>>,
    unsynced_reads: Rc<Cell<usize>>,
    last: (f32, f32),
    synced: Cell<bool>,
}

impl ScriptedClassifier {
    /// Timings are only valid once the device caught up with the last call.
    fn read(&self, value: f32) -> f32 {
        if self.synced.get() {
            value
        } else {
            self.unsynced_reads.set(self.unsynced_reads.get() + 1);
            f32::NAN
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&mut self, image: &DynamicImage) -> Result<Classification> {
        self.synced.set(false);
        let call = {
            let mut calls = self.calls.borrow_mut();
            *calls += 1;
            *calls - 1
        };
        anyhow::ensure!(!self.failing_calls.contains(&call), "injected failure");

        let width = image.dimensions().0;
        let times = self
            .script
            .get(&width)
            .ok_or_else(|| anyhow::anyhow!("no script for width {width}"))?;
        let cursor = self.cursors.entry(width).or_default();
        self.last = times[*cursor % times.len()];
        *cursor += 1;
        Ok(Classification {
            class_index: width as usize,
            confidence: 0.5,
        })
    }

    fn network_time_ms(&self) -> f32 {
        self.read(self.last.0)
    }

    fn cpu_total_time_ms(&self) -> f32 {
        self.read(self.last.1)
    }

    fn class_desc(&self, _class_index: usize) -> Option<&str> {
        Some("scripted")
    }

    fn synchronize(&self) -> Result<()> {
        self.synced.set(true);
        Ok(())
    }
}

/// Scratch workspace with an image directory and pre-created output folders.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        fs::create_dir_all(dir.path().join("images")).expect("create images dir");
        for sub in ["FP16/runtime", "FP16/results"] {
            fs::create_dir_all(dir.path().join(sub)).expect("create output dir");
        }
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn image_dir(&self) -> PathBuf {
        self.root().join("images")
    }

    /// Save a `width x 1` image under the image directory.
    pub fn add_image(&self, name: &str, width: u32) {
        let img = RgbImage::from_pixel(width, 1, Rgb([120, 60, 30]));
        img.save(self.image_dir().join(name)).expect("save image");
    }

    pub fn images(&self, names: &[&str]) -> ImageSet {
        ImageSet::new(
            self.image_dir(),
            names.iter().map(|n| n.to_string()).collect(),
        )
    }

    pub fn plan(&self, networks: Vec<Network>, profile: bool, repeat_count: usize) -> ProfilePlan {
        let settings = ProfileSettings {
            output_root: self.root().to_path_buf(),
            repeat_count,
            warmup_images: 0,
            settle_delay_ms: 0,
            aggregate_delay_ms: 0,
            ..ProfileSettings::default()
        };
        ProfilePlan::new(networks, profile, "4090", &settings)
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("read {}: {err}", path.display()))
        .lines()
        .map(str::to_string)
        .collect()
}
