use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Result;

use super::Summarizer;

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "more", "most", "my",
    "no", "not", "of", "on", "one", "or", "our", "out", "she", "so", "some", "than", "that",
    "the", "their", "them", "then", "there", "these", "they", "this", "to", "up", "was", "we",
    "were", "what", "when", "which", "who", "will", "with", "would", "you", "your",
];

/// Sentence terminators that are not followed by a space in running text.
const FULLWIDTH_TERMINATORS: &[char] = &['。', '！', '？', '．'];

/// Offline frequency-based summarizer: picks the highest scoring sentences
/// and returns them in document order.
pub struct ExtractiveSummarizer {
    sentences: usize,
    stopwords: HashSet<&'static str>,
}

impl ExtractiveSummarizer {
    pub fn new(sentences: usize) -> Self {
        Self {
            sentences: sentences.max(1),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Lowercased content words. Short ASCII words are noise; a single
    /// ideograph is a word on its own.
    fn keywords(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(str::to_lowercase)
            .filter(|w| !w.is_ascii() || w.len() > 2)
            .filter(|w| !self.stopwords.contains(w.as_str()))
            .collect()
    }

    /// Sentences with at least one word, trimmed.
    fn split_sentences<'a>(&self, content: &'a str) -> Vec<&'a str> {
        content
            .split_sentence_bounds()
            .map(str::trim)
            .filter(|s| s.unicode_words().next().is_some())
            .collect()
    }

    pub fn summarize_text(&self, title: &str, content: &str) -> String {
        let sentences = self.split_sentences(content);

        if sentences.len() <= self.sentences {
            return join_sentences(&sentences);
        }

        let mut frequency: HashMap<String, usize> = HashMap::new();
        for word in self.keywords(content) {
            *frequency.entry(word).or_default() += 1;
        }
        let max_frequency = frequency.values().copied().max().unwrap_or(1) as f64;
        let title_words: HashSet<String> = self.keywords(title).into_iter().collect();

        let mut scored: Vec<(usize, f64)> = sentences
            .iter()
            .enumerate()
            .map(|(idx, sentence)| {
                let words = self.keywords(sentence);
                if words.is_empty() {
                    return (idx, 0.0);
                }
                let density = words
                    .iter()
                    .map(|w| frequency.get(w).copied().unwrap_or(0) as f64 / max_frequency)
                    .sum::<f64>()
                    / words.len() as f64;
                let title_overlap = if title_words.is_empty() {
                    0.0
                } else {
                    words.iter().filter(|w| title_words.contains(*w)).count() as f64
                        / title_words.len() as f64
                };
                (idx, density + title_overlap)
            })
            .collect();

        // Highest score first; earlier sentences win ties.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut picked: Vec<usize> = scored
            .into_iter()
            .take(self.sentences)
            .map(|(idx, _)| idx)
            .collect();
        picked.sort_unstable();

        let picked: Vec<&str> = picked.into_iter().map(|idx| sentences[idx]).collect();
        join_sentences(&picked)
    }
}

fn join_sentences(sentences: &[&str]) -> String {
    let mut out = String::new();
    for sentence in sentences {
        if !out.is_empty() && !out.ends_with(FULLWIDTH_TERMINATORS) {
            out.push(' ');
        }
        out.push_str(sentence);
    }
    out
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, title: &str, content: &str) -> Result<String> {
        Ok(self.summarize_text(title, content))
    }

    fn name(&self) -> &str {
        "extractive"
    }
}
