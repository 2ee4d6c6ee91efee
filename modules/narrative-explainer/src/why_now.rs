//! "Why now" prose synthesis (spec §4.4): conditionally composed clauses
//! that must read as complete sentences regardless of which are present.

use narrative_types::{Domain, Features, SignalEvent};

pub struct WhyNowInputs<'a> {
    pub features: &'a Features,
    pub n_on: usize,
    pub n_off: usize,
    pub author_diversity: f64,
    pub most_recent: Option<&'a SignalEvent>,
}

pub fn compose(inputs: &WhyNowInputs<'_>) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if inputs.features.velocity >= 0.3 {
        clauses.push("activity is accelerating relative to its baseline".to_string());
    }

    if inputs.features.cross >= 0.3 {
        clauses.push(format!(
            "it is corroborated across {} onchain and {} offchain signal{}",
            inputs.n_on,
            inputs.n_off,
            if inputs.n_off == 1 { "" } else { "s" }
        ));
    }

    if let Some(event) = inputs.most_recent {
        let domain = match event.domain {
            Domain::Onchain => "onchain",
            Domain::Offchain => "offchain",
        };
        clauses.push(format!(
            "the most recent trigger was a {domain} signal from {}",
            event.source
        ));
    }

    if inputs.features.novelty >= 0.5 {
        clauses.push("the entities involved are largely new to this window".to_string());
    }

    if inputs.author_diversity >= 0.3 {
        clauses.push("multiple independent contributors are driving it".to_string());
    }

    if clauses.is_empty() {
        return "No standout signal explains this narrative's ranking beyond its composite score.".to_string();
    }

    let mut sentence = String::new();
    for (i, clause) in clauses.iter().enumerate() {
        if i == 0 {
            let mut chars = clause.chars();
            if let Some(first) = chars.next() {
                sentence.push_str(&first.to_uppercase().collect::<String>());
                sentence.push_str(chars.as_str());
            }
        } else if i + 1 == clauses.len() && clauses.len() > 1 {
            sentence.push_str(", and ");
            sentence.push_str(clause);
        } else {
            sentence.push_str(", ");
            sentence.push_str(clause);
        }
    }
    sentence.push('.');
    sentence
}
