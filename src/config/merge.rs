// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Deep merge of configuration trees.
//!
//! Two mappings merge key by key: keys present on both sides recurse when both
//! values are mappings, otherwise the override value wins. Keys present on one
//! side only are carried through. Sequences are never merged element-wise; an
//! override sequence replaces the base sequence wholesale.
//!
//! Because of sequence replacement, `merge` is only associative over trees
//! whose overlapping keys hold mappings or scalars.
//!
//! ```
//! use vega_orchestrator::config::{merge, ConfigNode};
//!
//! let base = ConfigNode::from_yaml_str("a: [1, 2]\nb: {x: 1}\n").unwrap();
//! let over = ConfigNode::from_yaml_str("a: [3]\nb: {y: 2}\n").unwrap();
//! let merged = merge(&base, &over);
//! assert_eq!(merged, ConfigNode::from_yaml_str("a: [3]\nb: {x: 1, y: 2}\n").unwrap());
//! ```

use super::node::{ConfigNode, Mapping};

/// Merge `overlay` on top of `base`, returning a new tree.
///
/// Neither input is modified. Key order follows `base`, with keys that only
/// exist in `overlay` appended in their overlay order.
pub fn merge(base: &ConfigNode, overlay: &ConfigNode) -> ConfigNode {
    match (base, overlay) {
        (ConfigNode::Mapping(base_map), ConfigNode::Mapping(overlay_map)) => {
            ConfigNode::Mapping(merge_mappings(base_map, overlay_map))
        }
        (_, overlay) => overlay.clone(),
    }
}

fn merge_mappings(base: &Mapping, overlay: &Mapping) -> Mapping {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let next = match merged.get(key) {
            Some(existing) => merge(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}
