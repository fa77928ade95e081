//! Prompt templates for grounded question answering

use crate::retrieval::SearchHit;

/// Prompt builder for document-grounded answers
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunk texts with blank-line separators
    pub fn build_context(hits: &[SearchHit]) -> String {
        hits.iter()
            .map(|hit| hit.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render the fixed QA template: answer only from the context, admit
    /// ignorance, keep it under three sentences.
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are an assistant for question-answering tasks. Use the following pieces of retrieved context to answer the question.
If you don't know the answer, just say that you don't know. Use three sentences maximum and keep the answer concise.

Question: {question}

Context: {context}

Answer:"#
        )
    }
}
