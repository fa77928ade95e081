//! Question endpoint: the retrieval-augmented answer pipeline

use axum::{
    extract::{Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::providers::{ChatProvider, EmbeddingProvider};
use crate::server::state::AppState;
use crate::session::Session;
use crate::types::response::{AskRequest, AskResponse};

/// POST /api/sessions/:id/ask - Answer a question about the uploaded files
pub async fn ask(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();

    tracing::info!("Question: \"{}\"", request.question);

    let session = state.session(&id)?;
    // Holding the lock for the whole pipeline keeps at most one question
    // in flight per session.
    let mut session = session.lock().await;

    let answered = answer_question(
        state.embedder().as_ref(),
        state.chat().as_ref(),
        &mut session,
        &request.question,
        state.config().retrieval.top_k,
    )
    .await?;

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Question answered in {}ms ({} source(s))",
        processing_time_ms,
        answered.sources.len()
    );

    Ok(Json(AskResponse {
        answer: answered.answer,
        sources: answered.sources,
        transcript_len: session.transcript.len(),
        processing_time_ms,
    }))
}

/// Outcome of one answered question
#[derive(Debug)]
pub(crate) struct Answered {
    pub answer: String,
    /// Source filenames of the retrieved chunks, best match first
    pub sources: Vec<String>,
}

/// Run one question through the pipeline: gate, index, retrieve, prompt,
/// generate, and record the exchange.
///
/// The transcript is only mutated after generation succeeds, so a failed
/// question leaves it untouched.
pub(crate) async fn answer_question(
    embedder: &dyn EmbeddingProvider,
    chat: &dyn ChatProvider,
    session: &mut Session,
    question: &str,
    top_k: usize,
) -> Result<Answered> {
    // Gating: a question is only processed once at least one file has been
    // ingested. Rejected questions never reach the providers.
    if !session.has_documents() {
        return Err(Error::NoDocuments);
    }

    let hits = {
        let index = session.ensure_index(embedder).await?;
        if index.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let query = embedder.embed(question).await?;
        index.search(&query, top_k)
    };

    let context = PromptBuilder::build_context(&hits);
    let prompt = PromptBuilder::build_qa_prompt(question, &context);

    let answer = chat.complete(&prompt).await?;

    session.transcript.record_exchange(question, &answer);

    Ok(Answered {
        answer,
        sources: hits.into_iter().map(|hit| hit.chunk.source).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::RecursiveChunker;
    use crate::providers::mock::{MockChat, MockEmbedder};
    use crate::types::chat::Role;
    use crate::types::document::{FileKind, UploadedFile};
    use async_trait::async_trait;

    fn text_file(name: &str, content: &str) -> UploadedFile {
        UploadedFile::new(name, FileKind::Text, content.as_bytes().to_vec())
    }

    fn session_with(files: &[(&str, &str)]) -> Session {
        let chunker = RecursiveChunker::new(150, 0);
        let mut session = Session::new();
        for (name, content) in files {
            session.ingest(&text_file(name, content), &chunker).unwrap();
        }
        session
    }

    /// Embedding provider that always fails, for error-path tests
    struct FailingEmbedder;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(Error::embedding("service unavailable"))
        }

        fn name(&self) -> &str {
            "failing-embedder"
        }
    }

    #[tokio::test]
    async fn question_without_documents_is_gated() {
        let embedder = MockEmbedder::new();
        let chat = MockChat::new();
        let mut session = Session::new();

        let err = answer_question(&embedder, &chat, &mut session, "Anything?", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::NoDocuments));
        // The pipeline was never invoked and the transcript is untouched.
        assert_eq!(embedder.calls(), 0);
        assert_eq!(session.transcript.len(), 1);
    }

    #[tokio::test]
    async fn answers_are_grounded_in_the_uploaded_file() {
        let embedder = MockEmbedder::new();
        let chat = MockChat::new();
        let mut session = session_with(&[("sky.txt", "The sky is blue.")]);

        let answered = answer_question(
            &embedder,
            &chat,
            &mut session,
            "What color is the sky?",
            1,
        )
        .await
        .unwrap();

        assert!(
            answered.answer.contains("blue"),
            "answer should mention blue: {}",
            answered.answer
        );
        assert_eq!(answered.sources, vec!["sky.txt".to_string()]);
    }

    #[tokio::test]
    async fn retrieval_picks_the_most_similar_file() {
        let embedder = MockEmbedder::new();
        let chat = MockChat::new();
        let mut session = session_with(&[
            ("cats.txt", "Cats chase mice around the barn at night."),
            ("sky.txt", "The sky is blue."),
        ]);

        let answered = answer_question(
            &embedder,
            &chat,
            &mut session,
            "What color is the sky?",
            1,
        )
        .await
        .unwrap();

        assert_eq!(answered.sources, vec!["sky.txt".to_string()]);
    }

    #[tokio::test]
    async fn unanswerable_questions_admit_ignorance() {
        let embedder = MockEmbedder::new();
        let chat = MockChat::new();
        let mut session = session_with(&[("cats.txt", "Cats chase mice around the barn.")]);

        let answered = answer_question(
            &embedder,
            &chat,
            &mut session,
            "What is the capital of France?",
            1,
        )
        .await
        .unwrap();

        assert!(
            answered.answer.contains("don't know"),
            "answer should state uncertainty: {}",
            answered.answer
        );
    }

    #[tokio::test]
    async fn transcript_grows_by_two_turns_per_question() {
        let embedder = MockEmbedder::new();
        let chat = MockChat::new();
        let mut session = session_with(&[("sky.txt", "The sky is blue.")]);

        for question in ["What color is the sky?", "Is the sky blue?"] {
            answer_question(&embedder, &chat, &mut session, question, 1)
                .await
                .unwrap();
        }

        let turns = session.transcript.turns();
        assert_eq!(turns.len(), 5);
        assert_eq!(turns[0].role, Role::Assistant);
        assert_eq!(turns[1].role, Role::User);
        assert_eq!(turns[1].content, "What color is the sky?");
        assert_eq!(turns[2].role, Role::Assistant);
        assert_eq!(turns[3].content, "Is the sky blue?");
        assert_eq!(turns[4].role, Role::Assistant);
    }

    #[tokio::test]
    async fn index_is_not_rebuilt_between_questions() {
        let embedder = MockEmbedder::new();
        let chat = MockChat::new();
        let mut session = session_with(&[("sky.txt", "The sky is blue.")]);

        answer_question(&embedder, &chat, &mut session, "What color is the sky?", 1)
            .await
            .unwrap();
        // One chunk embedded plus one query embedding.
        assert_eq!(embedder.calls(), 2);

        answer_question(&embedder, &chat, &mut session, "Is the sky blue?", 1)
            .await
            .unwrap();
        // Only the second query embedding is added.
        assert_eq!(embedder.calls(), 3);
    }

    #[tokio::test]
    async fn empty_corpus_is_rejected_explicitly() {
        let embedder = MockEmbedder::new();
        let chat = MockChat::new();
        // The file ingests but contains nothing to index.
        let mut session = session_with(&[("empty.txt", "")]);

        let err = answer_question(&embedder, &chat, &mut session, "Anything?", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::EmptyCorpus));
        assert_eq!(session.transcript.len(), 1);
    }

    #[tokio::test]
    async fn failed_questions_leave_the_transcript_untouched() {
        let chat = MockChat::new();
        let mut session = session_with(&[("sky.txt", "The sky is blue.")]);

        let err = answer_question(&FailingEmbedder, &chat, &mut session, "Anything?", 1)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Embedding(_)));
        assert_eq!(session.transcript.len(), 1);
    }
}
