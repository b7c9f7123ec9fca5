//! Mirror node lifecycle: initialize, update, evaluate.
//!
//! A host calls [`MirrorNode::initialize`] when the skeleton is bound or the
//! configuration changes, then [`MirrorNode::update`] and
//! [`MirrorNode::evaluate`] once per frame. Evaluation never fails; anything
//! that cannot be mirrored passes through unchanged.

use std::sync::Arc;

use log::{debug, warn};

use crate::config::MirrorConfig;
use crate::fingerprint::fingerprint;
use crate::pose::PoseContext;
use crate::runtime::{mirror_curves, mirror_pose};
use crate::skeleton::Skeleton;
use crate::tables::MirrorTables;

/// Inputs a host may drive every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeInputs {
    /// Overrides the configured enable flag when set.
    pub enable: Option<bool>,
}

impl NodeInputs {
    /// Inputs that override the enable flag.
    pub fn enabled(enable: bool) -> Self {
        Self {
            enable: Some(enable),
        }
    }
}

/// A pose mirroring node.
#[derive(Debug, Clone, Default)]
pub struct MirrorNode {
    config: MirrorConfig,
    tables: Option<Arc<MirrorTables>>,
}

impl MirrorNode {
    /// Creates an uninitialized node.
    pub fn new(config: MirrorConfig) -> Self {
        Self {
            config,
            tables: None,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Tables from the last initialization, if any.
    pub fn tables(&self) -> Option<&Arc<MirrorTables>> {
        self.tables.as_ref()
    }

    /// Returns true if the node mirrors when evaluated.
    pub fn is_enabled(&self) -> bool {
        self.config.enable
    }

    /// Replaces the configuration. Tables are dropped until the next
    /// [`initialize`](Self::initialize).
    pub fn set_config(&mut self, config: MirrorConfig) {
        self.config = config;
        self.tables = None;
    }

    /// Builds the mirror tables for a skeleton.
    ///
    /// When disabled, tables are cleared and nothing is built. Tables built
    /// from an identical skeleton and configuration are kept.
    pub fn initialize(&mut self, skeleton: &Skeleton) {
        if !self.config.enable {
            debug!("mirror node disabled; tables cleared");
            self.tables = None;
            return;
        }

        let hash = match fingerprint(skeleton, &self.config) {
            Ok(hash) => Some(hash),
            Err(err) => {
                warn!("could not fingerprint mirror inputs: {}", err);
                None
            }
        };

        if let (Some(tables), Some(hash)) = (&self.tables, &hash) {
            if tables.fingerprint() == Some(hash.as_str()) {
                debug!("mirror inputs unchanged; keeping tables");
                return;
            }
        }

        let mut tables = MirrorTables::build(skeleton, &self.config);
        if let Some(hash) = hash {
            tables = tables.with_fingerprint(hash);
        }
        self.tables = Some(Arc::new(tables));
    }

    /// Applies per-frame inputs.
    ///
    /// Enabling a node whose tables were never built leaves it a pass-through
    /// until the host re-initializes it.
    pub fn update(&mut self, inputs: &NodeInputs) {
        if let Some(enable) = inputs.enable {
            if enable && !self.config.enable && self.tables.is_none() {
                debug!("mirror node enabled; awaiting initialization");
            }
            self.config.enable = enable;
        }
    }

    /// Mirrors the pose and curves in place.
    pub fn evaluate(&self, skeleton: &Skeleton, context: &mut PoseContext) {
        if !self.config.enable {
            return;
        }
        let Some(tables) = &self.tables else {
            warn!("mirror node evaluated before initialization; passing pose through");
            return;
        };
        if tables.bone_count() != skeleton.len() {
            warn!(
                "mirror tables built for {} bones but skeleton has {}; passing pose through",
                tables.bone_count(),
                skeleton.len()
            );
            return;
        }

        mirror_pose(tables, skeleton, &mut context.pose);
        mirror_curves(tables, &mut context.curves);
    }
}
