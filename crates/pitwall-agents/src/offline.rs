//! Canned answers used when generation is unavailable.
//!
//! Rules are tried in order against the lowercased question and the first
//! match answers. [`GENERIC_ANSWER`] covers everything else.

use pitwall_core::EvidenceItem;

/// How many evidence texts the pit-stop rule quotes back.
const PIT_CONTEXT_ITEMS: usize = 2;

pub const GENERIC_ANSWER: &str = "I could not reach the external generation service from this \
     environment, so I am running in offline mode. For this particular question I don't have a \
     hand-crafted explanation. Please try another F1 concept (for example: ask about DRS or \
     Hamilton's pit stop) or check the race data manually.";

const DRS_ANSWER: &str = "DRS stands for Drag Reduction System. It is a movable flap in the rear \
     wing of a Formula 1 car. When DRS is activated, the flap opens, reducing aerodynamic drag \
     and increasing top speed on the straights.\n\n\
     In a race, drivers may only use DRS in designated DRS zones and only if they are within one \
     second of the car ahead at the detection point. When the driver hits the brakes, the flap \
     automatically closes to restore downforce for cornering.";

const PIT_ANSWER_WITH_CONTEXT: &str = "Based on the available context, Hamilton pitted around \
     lap 30 to change tyres once his pace started to drop and tyre temperatures were rising. The \
     team used the stop to protect tyre life and to cover the undercut from rival cars.";

const PIT_ANSWER: &str = "Hamilton typically pits around lap 30 when his tyre temperatures and \
     degradation become too high. The stop allows him to switch to a fresher compound and avoid \
     losing time to rivals attempting an undercut.";

const COMPOUND_ANSWER: &str = "F1 teams choose different tyre compounds to balance grip, \
     durability, and overall race strategy. Softer compounds provide more grip and faster lap \
     times but degrade more quickly. Harder compounds last longer but generally give slower lap \
     times.\n\n\
     By selecting different compounds, teams can:\n\
     - Maximise pace during key phases of the race\n\
     - Defend against or attempt an undercut on rivals\n\
     - Extend stints when tyre wear is high\n\
     - Adapt to track temperature, car balance and traffic\n\n\
     This flexibility allows each team to optimise its strategy based on its car's strengths, \
     tyre wear profile and the evolving race situation.";

/// One entry of the offline answer table.
pub struct OfflineRule {
    pub name: &'static str,
    /// Receives the lowercased question.
    matches: fn(&str) -> bool,
    respond: fn(&[EvidenceItem]) -> String,
}

impl OfflineRule {
    pub fn matches(&self, lowered_question: &str) -> bool {
        (self.matches)(lowered_question)
    }

    pub fn respond(&self, evidence: &[EvidenceItem]) -> String {
        (self.respond)(evidence)
    }
}

pub static RULES: &[OfflineRule] = &[
    OfflineRule {
        name: "drs",
        matches: |q| (q.contains("drs") && q.contains("formula 1")) || q.contains("drag reduction"),
        respond: |_| DRS_ANSWER.to_string(),
    },
    OfflineRule {
        name: "hamilton_pit",
        matches: |q| q.contains("hamilton") && q.contains("pit"),
        respond: pit_answer,
    },
    OfflineRule {
        name: "tyre_compounds",
        matches: |q| {
            q.contains("tyre compound")
                || q.contains("tire compound")
                || q.contains("different tyre")
        },
        respond: |_| COMPOUND_ANSWER.to_string(),
    },
];

fn pit_answer(evidence: &[EvidenceItem]) -> String {
    let context = evidence
        .iter()
        .take(PIT_CONTEXT_ITEMS)
        .map(|e| e.text().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ");
    let context = context.trim();
    if context.is_empty() {
        PIT_ANSWER.to_string()
    } else {
        format!("{PIT_ANSWER_WITH_CONTEXT}\n\nContext used: {context}")
    }
}

/// First rule matching `question`, if any.
pub fn matching_rule(question: &str) -> Option<&'static OfflineRule> {
    let lowered = question.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&lowered))
}

/// Deterministic answer for `question`; never empty.
pub fn offline_answer(question: &str, evidence: &[EvidenceItem]) -> String {
    match matching_rule(question) {
        Some(rule) => rule.respond(evidence),
        None => GENERIC_ANSWER.to_string(),
    }
}
