//! Per-user quiz sessions and the results log.

use std::collections::HashMap;
use std::sync::Arc;

use lexicard_core::{Flashcard, QuizError, QuizMode, QuizSession, QuizSummary, TickOutcome};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{AnswerResponse, NewQuizResult, QuizView, ResultEntry};
use crate::storage::Storage;

pub struct QuizService {
    /// At most one session per user id.
    sessions: Mutex<HashMap<i64, QuizSession>>,
    storage: Arc<dyn Storage>,
    seconds_per_question: u32,
}

fn view(session: &QuizSession) -> QuizView {
    QuizView {
        mode: session.mode(),
        state: session.state(),
        correct_count: session.correct_count(),
        wrong_count: session.wrong_count(),
        unanswered_count: session.unanswered_count(),
        question: session.current_question(),
        summary: session.summary().cloned(),
    }
}

impl QuizService {
    pub fn new(storage: Arc<dyn Storage>, seconds_per_question: u32) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            storage,
            seconds_per_question,
        }
    }

    /// Start a quiz for `user_id`, replacing any previous session.
    pub async fn start(
        &self,
        user_id: i64,
        cards: Vec<Flashcard>,
        mode: QuizMode,
        shuffle: bool,
    ) -> Result<QuizView> {
        let mut session = QuizSession::new(mode, self.seconds_per_question);
        let mut rng = StdRng::from_entropy();
        session.start(cards, shuffle, &mut rng)?;

        let view = view(&session);
        self.sessions.lock().await.insert(user_id, session);
        tracing::info!(user_id, %mode, questions = view.question.as_ref().map_or(0, |q| q.total), "quiz started");
        Ok(view)
    }

    pub async fn current(&self, user_id: i64) -> Result<QuizView> {
        let sessions = self.sessions.lock().await;
        let session = sessions.get(&user_id).ok_or(QuizError::NotInProgress)?;
        Ok(view(session))
    }

    pub async fn answer(&self, user_id: i64, answer: &str) -> Result<AnswerResponse> {
        self.respond(user_id, |session| session.submit_answer(answer)).await
    }

    pub async fn choose(&self, user_id: i64, index: usize) -> Result<AnswerResponse> {
        self.respond(user_id, |session| session.choose(index)).await
    }

    async fn respond<F>(&self, user_id: i64, f: F) -> Result<AnswerResponse>
    where
        F: FnOnce(&mut QuizSession) -> std::result::Result<lexicard_core::AnswerOutcome, QuizError>,
    {
        let response = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.get_mut(&user_id).ok_or(QuizError::NotInProgress)?;
            let outcome = f(session)?;
            AnswerResponse {
                outcome,
                quiz: view(session),
            }
        };

        // Written after the sessions lock is released.
        if let Some(summary) = &response.outcome.summary {
            self.record(user_id, summary);
        }

        Ok(response)
    }

    /// Advance every running countdown by one second. Returns how many
    /// questions timed out.
    pub async fn tick_all(&self) -> usize {
        let mut timed_out = 0;
        let mut finished = Vec::new();

        {
            let mut sessions = self.sessions.lock().await;
            for (user_id, session) in sessions.iter_mut() {
                if let TickOutcome::TimedOut { summary, .. } = session.tick() {
                    timed_out += 1;
                    tracing::debug!(user_id, "question timed out");
                    if let Some(summary) = summary {
                        finished.push((*user_id, summary));
                    }
                }
            }
        }

        for (user_id, summary) in &finished {
            self.record(*user_id, summary);
        }

        timed_out
    }

    /// Quiz history of a user, newest first.
    pub fn results(&self, user_id: i64) -> Result<Vec<ResultEntry>> {
        Ok(self
            .storage
            .quiz_results(user_id)?
            .iter()
            .map(ResultEntry::from)
            .collect())
    }

    fn record(&self, user_id: i64, summary: &QuizSummary) {
        let result = NewQuizResult {
            user_id,
            correct_answers: summary.correct_count,
            wrong_answers: summary.wrong_count,
            date: summary.finished_at,
        };

        match self.storage.append_quiz_result(&result) {
            Ok(stored) => tracing::info!(
                user_id,
                correct = stored.correct_answers,
                wrong = stored.wrong_answers,
                unanswered = summary.unanswered_count,
                "quiz finished"
            ),
            Err(e) => tracing::error!(user_id, error = %e, "failed to save quiz result"),
        }
    }
}
