//! Deterministic in-process providers for tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;

use super::embedding::EmbeddingProvider;
use super::llm::ChatProvider;

const DIMENSIONS: usize = 64;

/// Lexical embedder: hashes each word of the text into a fixed-size
/// vector. Texts sharing words get similar vectors, which is enough to
/// drive retrieval deterministically.
#[derive(Default)]
pub struct MockEmbedder {
    calls: AtomicUsize,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of embed calls made so far (batch items count individually)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; DIMENSIONS];
        for word in words(text) {
            v[word_slot(&word)] += 1.0;
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(text))
    }

    fn name(&self) -> &str {
        "mock-embedder"
    }
}

/// Chat provider emulating the grounding prompt contract: if the context
/// section shares a content word with the question it echoes the context,
/// otherwise it admits ignorance.
#[derive(Default)]
pub struct MockChat;

impl MockChat {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let question = section(prompt, "Question:");
        let context = section(prompt, "Context:");

        let context_words: Vec<String> = words(&context).collect();
        let overlaps = words(&question)
            .filter(|w| is_content_word(w))
            .any(|w| context_words.contains(&w));

        if overlaps {
            Ok(context.trim().to_string())
        } else {
            Ok("I don't know.".to_string())
        }
    }

    fn name(&self) -> &str {
        "mock-chat"
    }

    fn model(&self) -> &str {
        "mock"
    }
}

/// Extract the text between `label` and the next template label
fn section(prompt: &str, label: &str) -> String {
    let Some(start) = prompt.find(label) else {
        return String::new();
    };
    let body = &prompt[start + label.len()..];
    let end = ["Question:", "Context:", "Answer:"]
        .iter()
        .filter_map(|l| body.find(l))
        .min()
        .unwrap_or(body.len());
    body[..end].trim().to_string()
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// Words that should count as question/context overlap
fn is_content_word(word: &str) -> bool {
    const STOPWORDS: &[&str] = &[
        "the", "and", "was", "are", "is", "of", "a", "an", "in", "on", "to", "it", "what", "who",
        "how", "why", "where", "when", "which", "this", "that", "with", "from", "have", "does",
        "can", "about",
    ];
    word.len() >= 3 && !STOPWORDS.contains(&word)
}

fn word_slot(word: &str) -> usize {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    word.hash(&mut hasher);
    (hasher.finish() % DIMENSIONS as u64) as usize
}
