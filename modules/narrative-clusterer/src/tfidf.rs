//! TF-IDF vectorization of unanchored events for phase 2 text clustering
//! (spec §4.2): unigrams + bigrams over lowercased tokens, min-df 2,
//! max-df 0.8 of the corpus.

use std::collections::{BTreeMap, BTreeSet};

use narrative_common::text::tokenize;

/// A fixed vocabulary (sorted for determinism) and the dense TF-IDF vector
/// for each input document, in input order.
pub struct TfIdfCorpus {
    pub vocabulary: Vec<String>,
    pub vectors: Vec<Vec<f64>>,
}

fn ngrams(tokens: &[String]) -> Vec<String> {
    let mut grams: Vec<String> = tokens.to_vec();
    for window in tokens.windows(2) {
        grams.push(format!("{} {}", window[0], window[1]));
    }
    grams
}

/// Build a TF-IDF corpus from raw documents. Terms appearing in fewer than
/// `min_df` documents or more than `max_df` of documents are dropped from
/// the vocabulary before vectorizing.
pub fn vectorize(documents: &[String], min_df: usize, max_df: f64) -> TfIdfCorpus {
    let doc_terms: Vec<Vec<String>> = documents
        .iter()
        .map(|d| ngrams(&tokenize(d)))
        .collect();

    let n_docs = doc_terms.len().max(1);
    let mut doc_freq: BTreeMap<String, usize> = BTreeMap::new();
    for terms in &doc_terms {
        let unique: BTreeSet<&String> = terms.iter().collect();
        for term in unique {
            *doc_freq.entry(term.clone()).or_insert(0) += 1;
        }
    }

    let max_df_count = (max_df * n_docs as f64).ceil() as usize;
    let vocabulary: Vec<String> = doc_freq
        .iter()
        .filter(|(_, &df)| df >= min_df && df <= max_df_count.max(min_df))
        .map(|(term, _)| term.clone())
        .collect();
    let vocab_index: BTreeMap<&str, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let vectors: Vec<Vec<f64>> = doc_terms
        .iter()
        .map(|terms| {
            let mut tf: BTreeMap<usize, f64> = BTreeMap::new();
            let total = terms.len().max(1) as f64;
            for term in terms {
                if let Some(&idx) = vocab_index.get(term.as_str()) {
                    *tf.entry(idx).or_insert(0.0) += 1.0 / total;
                }
            }
            let mut vec = vec![0.0; vocabulary.len()];
            for (idx, tf_value) in tf {
                let df = doc_freq[&vocabulary[idx]] as f64;
                let idf = (n_docs as f64 / df).ln() + 1.0;
                vec[idx] = tf_value * idf;
            }
            vec
        })
        .collect();

    TfIdfCorpus { vocabulary, vectors }
}
