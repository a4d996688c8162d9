//! Scheduling-cycle integration tests.
//!
//! Drives the policy the way a host scheduler would: pre-filter once per
//! pod, filter per node, score the survivors, reserve the winner.

use std::sync::Arc;

use nodepath_docstore::RedbDocumentStore;
use nodepath_policy::*;

const NS: &str = "kube-system";
const NAME: &str = "local-path-config";
const KEY: &str = "config.json";

fn cluster(config: &str, nodes: &[&str]) -> (PathPolicy, RedbDocumentStore) {
    let store = RedbDocumentStore::open_in_memory().unwrap();
    store.put_field(NS, NAME, KEY, config).unwrap();
    let handle = StaticHandle {
        documents: Arc::new(store.clone()),
        nodes: Arc::new(NodeSnapshot::from_names(nodes.iter().copied())),
    };
    let policy = PathPolicy::new(PolicyArgs::default(), &handle).unwrap();
    (policy, store)
}

/// One pass; returns the chosen node or the decision that stopped the pass.
fn schedule(policy: &PathPolicy, pod: &Pod, nodes: &[&str]) -> Result<String, Decision> {
    let decision = policy.pre_filter(pod);
    if !decision.is_success() {
        return Err(decision);
    }

    let feasible: Vec<&str> = nodes
        .iter()
        .copied()
        .filter(|n| policy.filter(pod, &NodeInfo::new(Node::new(*n))).is_success())
        .collect();

    let mut best: Option<NodeScore> = None;
    for name in feasible {
        let (score, decision) = policy.score(pod, name);
        if !decision.is_success() {
            return Err(decision);
        }
        if best.as_ref().is_none_or(|b| score > b.score) {
            best = Some(NodeScore {
                name: name.to_string(),
                score,
            });
        }
    }

    let best = best.ok_or_else(|| Decision::unschedulable("no feasible node"))?;
    let decision = policy.reserve(pod, &best.name);
    if !decision.is_success() {
        return Err(decision);
    }
    Ok(best.name)
}

#[test]
fn empty_configuration_rejects_pod() {
    let (policy, _) = cluster(r#"{"nodePathMap":[]}"#, &["node-a"]);
    let pod = Pod::new("default", "web-0");

    assert_eq!(
        schedule(&policy, &pod, &["node-a"]),
        Err(Decision::unschedulable("no nodes match the path configuration"))
    );
}

#[test]
fn default_path_admits_unlisted_nodes_without_paths() {
    let (policy, _) = cluster(
        r#"{"nodePathMap":[{"node":"DEFAULT_PATH_FOR_NON_LISTED_NODES","paths":[]}]}"#,
        &["any-node"],
    );
    let current = policy.config().current();

    assert!(current.is_node_allowed("any-node"));
    assert_eq!(current.paths_for("any-node"), None);
    assert_eq!(
        schedule(&policy, &Pod::new("default", "web-0"), &["any-node"]),
        Ok("any-node".to_string())
    );
}

#[test]
fn listed_node_scores_and_unlisted_node_is_filtered() {
    let nodes = ["node-a", "node-b"];
    let (policy, _) = cluster(
        r#"{"nodePathMap":[{"node":"node-a","paths":["/data1","/data2"]}]}"#,
        &nodes,
    );
    let pod = Pod::new("default", "web-0");

    assert_eq!(policy.score(&pod, "node-a"), (70, Decision::Success));
    assert_eq!(
        policy.filter(&pod, &NodeInfo::new(Node::new("node-b"))),
        Decision::unschedulable("node is not in the allowed nodes list")
    );
    assert_eq!(schedule(&policy, &pod, &nodes), Ok("node-a".to_string()));
}

#[test]
fn zero_candidates_is_always_unschedulable() {
    for config in [
        r#"{"nodePathMap":[]}"#,
        r#"{"nodePathMap":[{"node":"DEFAULT_PATH_FOR_NON_LISTED_NODES","paths":[]}]}"#,
        r#"{"nodePathMap":[{"node":"node-a","paths":["/data1"]}]}"#,
    ] {
        let (policy, _) = cluster(config, &[]);
        assert_eq!(
            policy.pre_filter(&Pod::new("default", "web-0")),
            Decision::unschedulable("no nodes available to schedule")
        );
    }
}

#[test]
fn more_paths_wins() {
    let nodes = ["node-a", "node-b", "node-c"];
    let (policy, _) = cluster(
        r#"{"nodePathMap":[
            {"node":"node-a","paths":["/d1"]},
            {"node":"node-b","paths":["/d1","/d2","/d3"]},
            {"node":"node-c","paths":[]}
        ]}"#,
        &nodes,
    );

    assert_eq!(
        schedule(&policy, &Pod::new("default", "web-0"), &nodes),
        Ok("node-b".to_string())
    );
}

#[test]
fn refresh_is_idempotent() {
    let (policy, _) = cluster(
        r#"{"nodePathMap":[{"node":"node-a","paths":["/data1"]}]}"#,
        &["node-a"],
    );

    policy.refresh_config().unwrap();
    let first = policy.config().current();
    policy.refresh_config().unwrap();
    let second = policy.config().current();

    assert_eq!(*first, *second);
}

#[test]
fn reconfiguration_moves_placement() {
    let nodes = ["node-a", "node-b"];
    let (policy, store) = cluster(
        r#"{"nodePathMap":[{"node":"node-a","paths":["/data1"]}]}"#,
        &nodes,
    );
    let pod = Pod::new("default", "web-0");
    assert_eq!(schedule(&policy, &pod, &nodes), Ok("node-a".to_string()));

    store
        .put_field(NS, NAME, KEY, r#"{"nodePathMap":[{"node":"node-b","paths":["/data1"]}]}"#)
        .unwrap();
    assert_eq!(schedule(&policy, &pod, &nodes), Ok("node-b".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_pods_during_reconfiguration() {
    let nodes = ["node-a", "node-b"];
    let (policy, store) = cluster(
        r#"{"nodePathMap":[{"node":"node-a","paths":["/data1"]}]}"#,
        &nodes,
    );
    let policy = Arc::new(policy);

    let writer = {
        let store = store.clone();
        tokio::task::spawn_blocking(move || {
            for i in 0..50 {
                let target = if i % 2 == 0 { "node-b" } else { "node-a" };
                let config = format!(r#"{{"nodePathMap":[{{"node":"{target}","paths":["/data1"]}}]}}"#);
                store.put_field(NS, NAME, KEY, &config).unwrap();
            }
        })
    };

    let mut pods = Vec::new();
    for i in 0..8 {
        let policy = policy.clone();
        pods.push(tokio::task::spawn_blocking(move || {
            let pod = Pod::new("default", format!("web-{i}"));
            for _ in 0..25 {
                // Other pods may swap the snapshot mid-pass, so a pass can
                // come up empty, but it must never error.
                match schedule(&policy, &pod, &nodes) {
                    Ok(chosen) => assert!(chosen == "node-a" || chosen == "node-b"),
                    Err(decision) => {
                        assert!(matches!(decision, Decision::Unschedulable(_)), "{decision}")
                    }
                }
            }
        }));
    }

    writer.await.unwrap();
    for pod in pods {
        pod.await.unwrap();
    }
}
