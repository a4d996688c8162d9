use std::path::Path;
use std::sync::Arc;

use nodepath_policy::{
    Decision, FilterPlugin, NodeLister, NodeScore, NodeSnapshot, PathPolicy, Pod,
    PreFilterPlugin, ReservePlugin, ScorePlugin, StaticHandle,
};
use tracing::{debug, info};

use super::{load_args, open_store};

/// Per-node result of a simulated pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeOutcome {
    pub name: String,
    pub filter: Decision,
    pub score: Option<i64>,
}

/// Result of one simulated scheduling pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    pub pre_filter: Decision,
    pub nodes: Vec<NodeOutcome>,
    pub selected: Option<String>,
}

pub fn run(db: &Path, nodes: &[String], pod: &str, args: Option<&Path>) -> anyhow::Result<()> {
    let args = load_args(args)?;
    let store = open_store(db)?;
    let snapshot = Arc::new(NodeSnapshot::from_names(nodes.iter().cloned()));
    let handle = StaticHandle {
        documents: Arc::new(store),
        nodes: snapshot.clone(),
    };

    let policy = PathPolicy::new(args, &handle)?;
    let pod = parse_pod(pod);
    let report = schedule_one(&policy, snapshot.as_ref(), &pod)?;

    print!("{}", format_report(&pod, &report));
    Ok(())
}

/// `namespace/name`, or just `name` in the `default` namespace.
pub fn parse_pod(raw: &str) -> Pod {
    match raw.split_once('/') {
        Some((ns, name)) => Pod::new(ns, name),
        None => Pod::new("default", raw),
    }
}

/// Run pre-filter, filter, score, and reserve for one pod.
pub fn schedule_one(
    policy: &PathPolicy,
    nodes: &dyn NodeLister,
    pod: &Pod,
) -> anyhow::Result<PassReport> {
    let pre_filter = policy.pre_filter(pod);
    if !pre_filter.is_success() {
        info!(%pod, decision = %pre_filter, "pre-filter rejected pod");
        return Ok(PassReport {
            pre_filter,
            nodes: Vec::new(),
            selected: None,
        });
    }

    let mut outcomes = Vec::new();
    let mut scores = Vec::new();
    for info in nodes.list()? {
        let name = info.name().unwrap_or("<unknown>").to_string();
        let filter = policy.filter(pod, &info);
        let score = if filter.is_success() {
            let (score, decision) = policy.score(pod, &name);
            if decision.is_success() {
                scores.push(NodeScore {
                    name: name.clone(),
                    score,
                });
                Some(score)
            } else {
                debug!(%pod, node = %name, %decision, "score failed");
                None
            }
        } else {
            None
        };
        outcomes.push(NodeOutcome {
            name,
            filter,
            score,
        });
    }

    if let Some(ext) = policy.score_extensions() {
        let decision = ext.normalize_score(pod, &mut scores);
        anyhow::ensure!(decision.is_success(), "normalize score: {decision}");
    }

    // First node wins ties, matching input order.
    let selected = scores
        .iter()
        .fold(None::<&NodeScore>, |best, s| match best {
            Some(b) if b.score >= s.score => Some(b),
            _ => Some(s),
        })
        .map(|s| s.name.clone());

    if let Some(node) = &selected {
        let decision = policy.reserve(pod, node);
        if !decision.is_success() {
            policy.unreserve(pod, node);
            anyhow::bail!("reserve {node}: {decision}");
        }
        info!(%pod, %node, "pod placed");
    }

    Ok(PassReport {
        pre_filter,
        nodes: outcomes,
        selected,
    })
}

pub fn format_report(pod: &Pod, report: &PassReport) -> String {
    let mut out = format!("pod {pod}\n  pre-filter: {}\n", report.pre_filter);
    for node in &report.nodes {
        match node.score {
            Some(score) => out.push_str(&format!("  {}: {} (score {score})\n", node.name, node.filter)),
            None => out.push_str(&format!("  {}: {}\n", node.name, node.filter)),
        }
    }
    match &report.selected {
        Some(node) => out.push_str(&format!("  selected: {node}\n")),
        None => out.push_str("  selected: none\n"),
    }
    out
}
