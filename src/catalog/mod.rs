//! Hierarchical stage catalog (seasons, chapters, levels).
//!
//! The catalog ships as a flat little-endian stream:
//!
//! ```text
//! header      nodeCount:u32 stringCount:u32 stringPoolByteLen:u32 totalByteLen:u32
//! string pool stringCount x (len:u16, bytes)
//! records     nodeCount x 12 bytes
//! ```
//!
//! Records carry their tree depth instead of a parent reference, so the tree
//! is rebuilt with a single stack pass over the records in stream order. That
//! pass assumes pre-order input (a parent is immediately followed by its first
//! child); other orders silently produce a different tree.
//!
//! Nodes live in an arena indexed by [`NodeId`]; index 0 is the root sentinel.
//! Visibility under a [`FormatVersion`] is never stored on the tree, it is
//! recomputed by [`StageCatalog::grow_tree`] and the page queries.

mod build;
mod node;

pub use build::{encode_catalog, CatalogRecord};
pub use node::{NodeId, StageFeatures, StageIcon, StageNode, StageType, VersionThreshold};

use std::path::Path;

use tracing::{debug, instrument};

use crate::cursor::{BinaryCursor, ByteOrder};
use crate::error::{malformed_catalog, CoreError, CoreResult};
use crate::version::FormatVersion;

pub(crate) const HEADER_SIZE: usize = 16;
pub(crate) const RECORD_SIZE: usize = 12;

#[derive(Clone, Debug)]
pub struct StageCatalog {
    nodes: Vec<StageNode>,
    children: Vec<Vec<NodeId>>,
}

impl StageCatalog {
    pub const ROOT: NodeId = NodeId(0);

    /// Loads the catalog asset; a missing file yields
    /// [`CoreError::CatalogAssetMissing`].
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> CoreResult<Self> {
        let raw = match std::fs::read(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::CatalogAssetMissing(path.to_path_buf()))
            }
            Err(err) => return Err(err.into()),
        };
        Self::from_bytes(&raw)
    }

    pub fn from_bytes(raw: &[u8]) -> CoreResult<Self> {
        let mut cursor = BinaryCursor::new(raw, ByteOrder::LittleEndian);
        let node_count = cursor.get_u32()? as usize;
        let string_count = cursor.get_u32()? as usize;
        let string_pool_len = cursor.get_u32()? as usize;
        let total_len = cursor.get_u32()? as usize;

        let expected = node_count
            .checked_mul(RECORD_SIZE)
            .and_then(|records| records.checked_add(HEADER_SIZE + string_pool_len));
        if expected != Some(total_len) {
            return Err(malformed_catalog(format!(
                "declared length {total_len} does not match {node_count} nodes and a {string_pool_len} byte string pool"
            )));
        }
        if total_len != raw.len() {
            return Err(malformed_catalog(format!(
                "declared length {total_len} but asset has {} bytes",
                raw.len()
            )));
        }

        // Every pooled string costs at least its u16 length prefix.
        if string_count.checked_mul(2).map_or(true, |min| min > string_pool_len) {
            return Err(malformed_catalog(format!(
                "{string_count} strings cannot fit a {string_pool_len} byte string pool"
            )));
        }
        let mut strings = Vec::with_capacity(string_count);
        for _ in 0..string_count {
            strings.push(cursor.get_string()?);
        }
        if cursor.position() != HEADER_SIZE + string_pool_len {
            return Err(malformed_catalog("string pool length mismatch"));
        }

        let mut nodes = Vec::with_capacity(node_count + 1);
        let mut children = vec![Vec::new(); node_count + 1];
        nodes.push(StageNode::root());

        let mut stack = vec![Self::ROOT];
        for index in 1..=node_count {
            let name_index = cursor.get_u16()? as usize;
            let data_id = cursor.get_i16()?;
            let page_id = cursor.get_i16()?;
            let type_code = cursor.get_i8()?;
            let node_info = cursor.get_u8()?;
            let ver_and_items = cursor.get_u8()?;
            let flags = cursor.get_u8()?;
            let challenge_time = cursor.get_u16()?;

            let depth = node_info & 0xF;
            if depth == 0 {
                return Err(malformed_catalog(format!(
                    "record {} uses depth 0, which is reserved for the root",
                    index - 1
                )));
            }
            let name = strings.get(name_index).cloned().ok_or_else(|| {
                malformed_catalog(format!("record {} names missing string {name_index}", index - 1))
            })?;
            let stage_type = StageType::from_code(type_code).ok_or_else(|| {
                malformed_catalog(format!("record {} has stage type {type_code}", index - 1))
            })?;
            let version_threshold =
                VersionThreshold::from_code(ver_and_items & 0xF).ok_or_else(|| {
                    malformed_catalog(format!(
                        "record {} has version threshold {}",
                        index - 1,
                        ver_and_items & 0xF
                    ))
                })?;

            while (depth as usize) < stack.len() {
                stack.pop();
            }
            // The root is never popped because depth >= 1.
            let parent = stack[stack.len() - 1];
            let id = NodeId(index);
            children[parent.0].push(id);
            if depth as usize == stack.len() {
                stack.push(id);
            }

            nodes.push(StageNode {
                id,
                parent: Some(parent),
                name,
                data_id,
                page_id,
                stage_type,
                depth,
                icon_id: node_info >> 4,
                version_threshold,
                collect_item_num: ver_and_items >> 4,
                features: StageFeatures::from_bits(flags),
                challenge_time,
            });
        }

        debug!(node_count, string_count, "parsed stage catalog");
        Ok(Self { nodes, children })
    }

    pub fn root(&self) -> &StageNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&StageNode> {
        self.nodes.get(id.0)
    }

    /// Catalog records in stream order, without the root.
    pub fn records(&self) -> &[StageNode] {
        &self.nodes[1..]
    }

    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural children, independent of any version.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id.0).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<&StageNode> {
        self.node(id)?.parent.and_then(|parent| self.node(parent))
    }

    /// Chain from `id` up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &StageNode> {
        std::iter::successors(self.node(id), move |node| {
            node.parent.and_then(|parent| self.node(parent))
        })
    }

    pub fn find_course(&self, course_id: usize) -> Option<&StageNode> {
        self.records()
            .iter()
            .find(|node| node.course_id() == Some(course_id))
    }

    pub fn find_season(&self, version: FormatVersion, season_id: u32) -> Option<&StageNode> {
        self.records()
            .iter()
            .find(|node| node.season_id() == Some(season_id) && node.is_visible(version))
    }

    /// Largest course id referenced plus one.
    pub fn course_capacity(&self) -> usize {
        self.records()
            .iter()
            .filter_map(StageNode::course_id)
            .map(|id| id + 1)
            .max()
            .unwrap_or(0)
    }

    /// Computes which nodes are shown under `version`. A node is shown when it
    /// and every ancestor is visible.
    pub fn grow_tree(&self, version: FormatVersion) -> VisibleTree<'_> {
        let mut shown = vec![false; self.nodes.len()];
        shown[0] = true;
        // Parents always precede their children in the arena.
        for node in self.records() {
            let parent_shown = node.parent.map(|parent| shown[parent.0]).unwrap_or(false);
            shown[node.id.0] = parent_shown && node.is_visible(version);
        }
        VisibleTree {
            catalog: self,
            version,
            shown,
        }
    }

    /// Collects the visible nodes following the season node `season_id`, up
    /// to the next visible season node, keeping those accepted by `predicate`.
    pub fn season_pages<P>(
        &self,
        version: FormatVersion,
        season_id: u32,
        predicate: P,
    ) -> Vec<&StageNode>
    where
        P: Fn(&StageNode) -> bool,
    {
        let records = self.records();
        let Some(start) = records
            .iter()
            .position(|node| node.season_id() == Some(season_id) && node.is_visible(version))
        else {
            return Vec::new();
        };

        records[start + 1..]
            .iter()
            .filter(|node| node.is_visible(version))
            .take_while(|node| !node.is_season())
            .filter(|node| predicate(node))
            .collect()
    }

    pub fn season_actual_pages(&self, version: FormatVersion, season_id: u32) -> Vec<&StageNode> {
        self.season_pages(version, season_id, StageNode::is_selectable_page)
    }

    pub fn season_valid_bonus_pages(
        &self,
        version: FormatVersion,
        season_id: u32,
    ) -> Vec<&StageNode> {
        self.season_pages(version, season_id, StageNode::is_valid_bonus_page)
    }
}

/// Version-specific view over a catalog, produced by
/// [`StageCatalog::grow_tree`].
#[derive(Clone, Debug)]
pub struct VisibleTree<'a> {
    catalog: &'a StageCatalog,
    version: FormatVersion,
    shown: Vec<bool>,
}

impl<'a> VisibleTree<'a> {
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    pub fn catalog(&self) -> &'a StageCatalog {
        self.catalog
    }

    pub fn is_shown(&self, id: NodeId) -> bool {
        self.shown.get(id.0).copied().unwrap_or(false)
    }

    /// Number of shown nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.shown.iter().skip(1).filter(|shown| **shown).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &'a StageNode> + '_ {
        let catalog = self.catalog;
        catalog
            .children(id)
            .iter()
            .filter(move |child| self.is_shown(**child))
            .filter_map(move |child| catalog.node(*child))
    }

    /// Depth-first pre-order walk of the shown nodes below the root, paired
    /// with their level (1 for root children).
    pub fn walk(&self) -> Vec<(usize, &'a StageNode)> {
        let mut output = Vec::new();
        let mut pending: Vec<(usize, NodeId)> = self
            .children(StageCatalog::ROOT)
            .map(|node| (1, node.id))
            .collect();
        pending.reverse();
        while let Some((level, id)) = pending.pop() {
            let Some(node) = self.catalog.node(id) else {
                continue;
            };
            output.push((level, node));
            let mut below: Vec<(usize, NodeId)> =
                self.children(id).map(|child| (level + 1, child.id)).collect();
            below.reverse();
            pending.extend(below);
        }
        output
    }
}

#[cfg(test)]
#[path = "../tests/catalog_tests.rs"]
mod tests;
