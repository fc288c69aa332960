use crate::flow::{FlowEdge, FlowNode, FlowSpec, Tone};
use std::f64::consts::PI;

fn node(id: &str, label: &str, tone: Tone, desc: &str, x: f64, y: f64, z: f64) -> FlowNode {
    FlowNode {
        id: id.to_string(),
        label: label.to_string(),
        tone,
        desc: desc.to_string(),
        x,
        y,
        z,
    }
}

fn edge(from: &str, to: &str) -> FlowEdge {
    FlowEdge {
        from: from.to_string(),
        to: to.to_string(),
        label: None,
    }
}

fn labeled(from: &str, to: &str, label: &str) -> FlowEdge {
    FlowEdge {
        label: Some(label.to_string()),
        ..edge(from, to)
    }
}

fn chain(ids: &[&str]) -> Vec<FlowEdge> {
    ids.windows(2).map(|w| edge(w[0], w[1])).collect()
}

fn spec(id: &str, title: &str, hint: &str, nodes: Vec<FlowNode>, edges: Vec<FlowEdge>) -> FlowSpec {
    FlowSpec {
        id: id.to_string(),
        title: title.to_string(),
        hint: hint.to_string(),
        nodes,
        edges,
    }
}

pub(super) fn solution() -> FlowSpec {
    spec(
        "solution",
        "Decentralized Trust Layer",
        "Click nodes to inspect.",
        vec![
            node(
                "publishers",
                "Publishers\n(Human or AI)",
                Tone::Teal2,
                "Publish articles (stored on IPFS) under an ERC-8004 identity. Humans and agents play by the same rules.",
                -260.0,
                -120.0,
                -120.0,
            ),
            node(
                "validators",
                "Validators\n(Staked)",
                Tone::Teal,
                "Verify extracted factual claims with evidence. Wrong validations risk slashing.",
                0.0,
                -10.0,
                120.0,
            ),
            node(
                "readers",
                "Readers",
                Tone::Good,
                "Rate quality and accuracy. Weight grows with time, stake, and reputation (Sybil resistant).",
                260.0,
                -120.0,
                -90.0,
            ),
            node(
                "reputation",
                "Reputation",
                Tone::Warn,
                "Emerges from collective assessment. Feeds curation and future weighting.",
                0.0,
                230.0,
                40.0,
            ),
        ],
        vec![
            labeled("publishers", "validators", "claims"),
            labeled("validators", "readers", "verdicts"),
            labeled("readers", "reputation", "ratings"),
            labeled("reputation", "publishers", "weight"),
        ],
    )
}

pub(super) fn architecture() -> FlowSpec {
    spec(
        "architecture",
        "Protocol Architecture (Layers)",
        "Click a layer to inspect responsibilities.",
        vec![
            node(
                "consumption",
                "Consumption\nLayer",
                Tone::Teal2,
                "Surfaces content to users via Web, Mobile, API, RSS, and social distribution.",
                0.0,
                -260.0,
                -120.0,
            ),
            node(
                "curation",
                "Curation\nLayer",
                Tone::Teal,
                "Personalization, trending, and reputation filters shape what gets attention.",
                0.0,
                -175.0,
                0.0,
            ),
            node(
                "validation",
                "Validation\nLayer",
                Tone::Good,
                "Claim extraction, validator selection, and challenges drive verifiable truth.",
                0.0,
                -90.0,
                90.0,
            ),
            node(
                "feedback",
                "Feedback\nLayer",
                Tone::Warn,
                "Reader ratings update reputation and trigger Sybil detection.",
                0.0,
                -5.0,
                0.0,
            ),
            node(
                "publishing",
                "Publishing\nLayer",
                Tone::Teal2,
                "Article submission, claim tagging, and storage (IPFS) live here.",
                0.0,
                80.0,
                -70.0,
            ),
            node(
                "identity",
                "Identity\nLayer (ERC-8004)",
                Tone::Teal,
                "Publisher registration, credentials, and wallet-based identity/reputation.",
                0.0,
                170.0,
                70.0,
            ),
            node(
                "base",
                "Base L2",
                Tone::Bad,
                "Fast finality and low fees on an EVM-compatible L2.",
                0.0,
                260.0,
                130.0,
            ),
        ],
        chain(&[
            "consumption",
            "curation",
            "validation",
            "feedback",
            "publishing",
            "identity",
            "base",
        ]),
    )
}

pub(super) fn claim_verification() -> FlowSpec {
    let mut edges = chain(&["publish", "extract", "tag"]);
    edges.push(labeled("tag", "select", "factual only"));
    edges.extend(chain(&["select", "verify", "consensus", "status"]));
    spec(
        "claimVerification",
        "Claim Verification Flow",
        "Click steps to inspect what happens at each stage.",
        vec![
            node(
                "publish",
                "Article\nPublished",
                Tone::Teal2,
                "Publisher submits an article, stored and signed.",
                -320.0,
                -40.0,
                -90.0,
            ),
            node(
                "extract",
                "AI Extracts\nClaims",
                Tone::Teal,
                "AI identifies verifiable factual claims.",
                -150.0,
                30.0,
                60.0,
            ),
            node(
                "tag",
                "Claims\nTagged",
                Tone::Warn,
                "Claims classified as factual, opinion, or prediction.",
                10.0,
                -40.0,
                130.0,
            ),
            node(
                "select",
                "Validators\nSelected",
                Tone::Good,
                "5 validators chosen randomly, weighted by stake.",
                160.0,
                40.0,
                30.0,
            ),
            node(
                "verify",
                "Evidence +\nVerdicts",
                Tone::Teal2,
                "Validators check sources and submit evidence-backed verdicts.",
                330.0,
                -10.0,
                -60.0,
            ),
            node(
                "consensus",
                "Consensus\n(3/5)",
                Tone::Teal,
                "Consensus determines claim status; disputes remain visible.",
                500.0,
                55.0,
                60.0,
            ),
            node(
                "status",
                "Status:\nVerified / Disputed / False",
                Tone::Bad,
                "Claim states propagate into reputation and curation.",
                680.0,
                -20.0,
                -20.0,
            ),
        ],
        edges,
    )
}

pub(super) fn revenue() -> FlowSpec {
    spec(
        "revenue",
        "Revenue Distribution",
        "Click nodes to inspect where EVA flows.",
        vec![
            node(
                "users",
                "Users",
                Tone::Teal2,
                "Users pay EVA for subscriptions, unlocks, API calls, and fees.",
                -360.0,
                -30.0,
                -110.0,
            ),
            node(
                "treasury",
                "Treasury\n(EVA)",
                Tone::Teal,
                "Receives protocol revenue and distributes by rules.",
                -120.0,
                -60.0,
                80.0,
            ),
            node(
                "publishers",
                "Publishers\n60%",
                Tone::Good,
                "Creator rewards for accurate, valued reporting.",
                120.0,
                -180.0,
                -30.0,
            ),
            node(
                "validators",
                "Validators\n25%",
                Tone::Warn,
                "Paid for verification work; wrong validations risk slashing.",
                240.0,
                -10.0,
                40.0,
            ),
            node(
                "pool",
                "Burn/Stake\n15%",
                Tone::Bad,
                "Half burned (deflation), half distributed to stakers.",
                120.0,
                160.0,
                120.0,
            ),
            node(
                "burn",
                "Burn\n7.5%",
                Tone::Bad,
                "Permanent burn reduces supply over time.",
                320.0,
                210.0,
                -40.0,
            ),
            node(
                "stakers",
                "Stakers\n7.5%",
                Tone::Teal2,
                "Stakers earn a share of protocol revenue.",
                -40.0,
                240.0,
                -60.0,
            ),
        ],
        vec![
            edge("users", "treasury"),
            edge("treasury", "publishers"),
            edge("treasury", "validators"),
            edge("treasury", "pool"),
            edge("pool", "burn"),
            edge("pool", "stakers"),
        ],
    )
}

const FLYWHEEL_RADIUS: f64 = 310.0;

pub(super) fn flywheel() -> FlowSpec {
    let steps: [(&str, &str, Tone, &str); 9] = [
        ("users", "More users", Tone::Teal2, "Growth brings more paying participants to the ecosystem."),
        ("demand", "More EVA demand", Tone::Teal, "Platform utility requires EVA, creating buy pressure."),
        ("burns", "More burns", Tone::Bad, "A slice of revenue is burned, reducing supply."),
        ("supply", "Supply shrinks", Tone::Warn, "Supply contraction supports price if demand holds."),
        ("price", "Price increases", Tone::Good, "Higher value increases incentive to stake and participate."),
        ("staking", "More staking", Tone::Teal2, "Staking improves rewards and commitment."),
        ("security", "Better security", Tone::Teal, "More value at stake raises the cost of attacks."),
        ("trust", "More trust", Tone::Good, "Higher verification quality improves user trust."),
        ("publishers", "More publishers", Tone::Warn, "Better rewards attract more publishers, improving supply of content."),
    ];

    let count = steps.len() as f64;
    let nodes = steps
        .iter()
        .enumerate()
        .map(|(i, (id, label, tone, desc))| {
            let a = (i as f64 / count) * PI * 2.0 - PI / 2.0;
            node(
                id,
                label,
                *tone,
                desc,
                a.cos() * FLYWHEEL_RADIUS,
                a.sin() * FLYWHEEL_RADIUS,
                (a * 2.0).sin() * 80.0,
            )
        })
        .collect();

    let mut ids: Vec<&str> = steps.iter().map(|s| s.0).collect();
    ids.push(steps[0].0);

    spec(
        "flywheel",
        "Value Accrual Flywheel",
        "Click a step to inspect the claim.",
        nodes,
        chain(&ids),
    )
}

pub(super) fn publisher_flow() -> FlowSpec {
    spec(
        "publisherFlow",
        "Publisher Participation Flow",
        "Click steps to inspect roles and incentives.",
        vec![
            node(
                "register",
                "Register\n(ERC-8004)",
                Tone::Teal2,
                "Create an agent identity with services and metadata.",
                -280.0,
                0.0,
                -80.0,
            ),
            node(
                "publish",
                "Publish",
                Tone::Teal,
                "Submit articles and claims for validation.",
                -80.0,
                -40.0,
                90.0,
            ),
            node(
                "rate",
                "Crowd Rates",
                Tone::Good,
                "Readers and validators provide feedback and verdicts.",
                120.0,
                40.0,
                30.0,
            ),
            node(
                "rep",
                "Reputation\nUpdates",
                Tone::Warn,
                "Outcomes update public reputation and future weight.",
                320.0,
                0.0,
                -40.0,
            ),
        ],
        chain(&["register", "publish", "rate", "rep"]),
    )
}
