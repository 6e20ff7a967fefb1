// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `ref` inheritance between pipeline steps.
//!
//! A mapping node may carry `ref: "<step>.<dotted.path>"`. Resolving it copies
//! the referenced subtree, drops the keys listed in
//! [`NON_INHERITED_KEYS`](crate::config::consts::NON_INHERITED_KEYS), and
//! merges the referencing node's own keys on top. Only one hop is followed: a
//! copied subtree that still carries a `ref` anywhere (at its top or in any
//! nested node) is rejected with [`ConfigError::ChainedRef`] instead of being
//! silently left unresolved.

use crate::config::consts::{NON_INHERITED_KEYS, REF_KEY};
use crate::config::merge::merge;
use crate::config::node::{ConfigNode, NodeKind};
use crate::errors::{ConfigError, ValidationError};
use crate::observability::messages::config::RefResolved;
use crate::observability::messages::StructuredLog;

/// Resolve the `ref` of `node` against `root`, returning the effective node.
///
/// Nodes that are not mappings, or mappings without a `ref` (or with a null
/// one), come back as independent copies. The returned node never contains
/// the `ref` key.
pub fn resolve_ref(node: &ConfigNode, root: &ConfigNode) -> Result<ConfigNode, ConfigError> {
    let path = match node.get(REF_KEY) {
        None | Some(ConfigNode::Null) => return Ok(node.clone()),
        Some(ConfigNode::String(path)) if path.is_empty() => return Ok(node.without_keys(&[REF_KEY])),
        Some(ConfigNode::String(path)) => path.as_str(),
        Some(other) => {
            return Err(ValidationError::WrongType {
                key: REF_KEY.to_string(),
                expected: NodeKind::String,
                found: other.kind(),
            }
            .into())
        }
    };

    let target = root
        .get_path(path)
        .ok_or_else(|| ConfigError::DanglingRef {
            path: path.to_string(),
        })?;

    if !target.is_mapping() {
        return Err(ValidationError::WrongType {
            key: path.to_string(),
            expected: NodeKind::Mapping,
            found: target.kind(),
        }
        .into());
    }

    let inherited = target.without_keys(&NON_INHERITED_KEYS);
    if let Some(inner) = find_ref(&inherited) {
        return Err(ConfigError::ChainedRef {
            path: path.to_string(),
            inner: inner.as_str().unwrap_or("<non-string>").to_string(),
        });
    }

    let own = node.without_keys(&[REF_KEY]);
    let effective = merge(&inherited, &own);

    RefResolved {
        path,
        inherited_keys: inherited.as_mapping().map_or(0, |m| m.len()),
        own_keys: own.as_mapping().map_or(0, |m| m.len()),
    }
    .log();

    Ok(effective)
}

/// A non-null `ref` in `node`: its own first, then its children's in order.
fn find_ref(node: &ConfigNode) -> Option<&ConfigNode> {
    match node {
        ConfigNode::Mapping(map) => match map.get(REF_KEY) {
            Some(inner) if !inner.is_null() => Some(inner),
            _ => map.values().find_map(find_ref),
        },
        ConfigNode::Sequence(items) => items.iter().find_map(find_ref),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> ConfigNode {
        ConfigNode::from_yaml_str(text).unwrap()
    }

    #[test]
    fn inherits_strips_and_overrides() {
        let root = yaml(
            r#"
s1:
  x: 1
  y: 2
  callbacks: [EarlyStopping]
s2:
  ref: s1
  y: 99
"#,
        );
        let resolved = resolve_ref(root.get("s2").unwrap(), &root).unwrap();
        assert_eq!(resolved, yaml("x: 1\ny: 99\n"));
    }

    #[test]
    fn every_non_inherited_key_is_dropped() {
        let root = yaml(
            r#"
base:
  trainer:
    epochs: 3
    callbacks: [a]
    lazy_built: true
    max_train_steps: 10
    with_train: false
    with_valid: false
step:
  trainer:
    ref: base.trainer
"#,
        );
        let resolved = resolve_ref(root.get_path("step.trainer").unwrap(), &root).unwrap();
        assert_eq!(resolved, yaml("epochs: 3\n"));
    }

    #[test]
    fn own_denylisted_keys_survive() {
        let root = yaml("a:\n  callbacks: [x]\nb:\n  ref: a\n  callbacks: [y]\n");
        let resolved = resolve_ref(root.get("b").unwrap(), &root).unwrap();
        assert_eq!(resolved, yaml("callbacks: [y]\n"));
    }

    #[test]
    fn nested_keys_merge_instead_of_replacing() {
        let root = yaml(
            "a:\n  optim:\n    type: SGD\n    lr: 0.1\nb:\n  ref: a\n  optim:\n    lr: 0.5\n",
        );
        let resolved = resolve_ref(root.get("b").unwrap(), &root).unwrap();
        assert_eq!(resolved, yaml("optim:\n  type: SGD\n  lr: 0.5\n"));
    }

    #[test]
    fn dangling_ref_names_the_path() {
        let root = yaml("b:\n  ref: nowhere.trainer\n");
        let err = resolve_ref(root.get("b").unwrap(), &root).unwrap_err();
        assert!(matches!(err, ConfigError::DanglingRef { ref path } if path == "nowhere.trainer"));
    }

    #[test]
    fn chained_ref_is_an_explicit_error() {
        let root = yaml("a:\n  x: 1\nb:\n  ref: a\nc:\n  ref: b\n");
        let err = resolve_ref(root.get("c").unwrap(), &root).unwrap_err();
        match err {
            ConfigError::ChainedRef { path, inner } => {
                assert_eq!(path, "b");
                assert_eq!(inner, "a");
            }
            other => panic!("expected ChainedRef, got {other:?}"),
        }
    }

    #[test]
    fn nested_ref_in_target_is_a_chained_ref() {
        struct TestCase {
            name: &'static str,
            yaml: &'static str,
            inner: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "mapping child",
                yaml: "base:\n  x: 1\na:\n  opt:\n    ref: base\nb:\n  ref: a\n",
                inner: "base",
            },
            TestCase {
                name: "deeper mapping",
                yaml: "base:\n  x: 1\na:\n  trainer:\n    optim:\n      ref: base\nb:\n  ref: a\n",
                inner: "base",
            },
            TestCase {
                name: "inside a sequence",
                yaml: "base:\n  x: 1\na:\n  metrics:\n    - ref: base\nb:\n  ref: a\n",
                inner: "base",
            },
        ];

        for tc in test_cases {
            let root = yaml(tc.yaml);
            let result = resolve_ref(root.get("b").unwrap(), &root);
            assert!(
                matches!(result, Err(ConfigError::ChainedRef { ref path, ref inner }) if path == "a" && inner == tc.inner),
                "{}: {:?}",
                tc.name,
                result
            );
        }
    }

    #[test]
    fn refs_in_non_inherited_keys_are_ignored() {
        let root = yaml("base:\n  x: 1\na:\n  y: 2\n  callbacks:\n    - ref: base\nb:\n  ref: a\n");
        let resolved = resolve_ref(root.get("b").unwrap(), &root).unwrap();
        assert_eq!(resolved, yaml("y: 2\n"));
    }

    #[test]
    fn nodes_without_ref_are_copied() {
        let root = yaml("a:\n  x: 1\n");
        assert_eq!(resolve_ref(root.get("a").unwrap(), &root).unwrap(), yaml("x: 1\n"));
        assert_eq!(resolve_ref(&ConfigNode::Int(4), &root).unwrap(), ConfigNode::Int(4));
    }

    #[test]
    fn non_mapping_target_is_rejected() {
        let root = yaml("a:\n  x: 1\nb:\n  ref: a.x\n");
        let err = resolve_ref(root.get("b").unwrap(), &root).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::WrongType { .. })
        ));
    }

    #[test]
    fn resolved_copies_are_independent_of_the_root() {
        let root = yaml("a:\n  opts: {x: 1}\nb:\n  ref: a\nc:\n  ref: a\n");
        let mut b = resolve_ref(root.get("b").unwrap(), &root).unwrap();
        let c = resolve_ref(root.get("c").unwrap(), &root).unwrap();
        b.as_mapping_mut()
            .unwrap()
            .insert("opts".to_string(), ConfigNode::Int(0));
        assert_eq!(c, yaml("opts: {x: 1}\n"));
        assert_eq!(root.get_path("a.opts.x"), Some(&ConfigNode::Int(1)));
    }
}
