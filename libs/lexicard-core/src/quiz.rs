//! Timed quiz sessions.
//!
//! A session walks linearly through a list of flashcards. Every question has
//! its own countdown driven by [`QuizSession::tick`]; when it reaches zero the
//! question is counted as unanswered and the session moves on. Answering the
//! last question (or letting it expire) finishes the session and produces a
//! [`QuizSummary`] for the results log.

use crate::error::QuizError;
use crate::matching::{compare_answers, normalize};
use crate::types::{Flashcard, QuizMode};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Seconds allowed per question unless configured otherwise.
pub const DEFAULT_SECONDS_PER_QUESTION: u32 = 30;

/// Number of options shown for a multiple-choice question.
pub const CHOICE_COUNT: usize = 4;

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuizState {
    NotStarted,
    InProgress,
    Finished,
}

/// What the player sees for the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    /// 1-based position of the question.
    pub number: usize,
    pub total: usize,
    /// Word to translate.
    pub word: String,
    /// Answer options, only in multiple-choice mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<String>>,
    pub time_remaining: u32,
}

/// Final tally of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSummary {
    pub correct_count: u32,
    pub wrong_count: u32,
    pub unanswered_count: u32,
    /// Translations answered correctly at least once.
    pub learned_words: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub correct_answer: String,
    /// Present when this answer finished the session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<QuizSummary>,
}

/// Result of a one-second timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Session is not running.
    Idle,
    Running { time_remaining: u32 },
    /// The current question expired without an answer.
    TimedOut {
        correct_answer: String,
        summary: Option<QuizSummary>,
    },
}

/// A quiz over the flashcards of one language/subcategory.
#[derive(Debug, Clone)]
pub struct QuizSession {
    mode: QuizMode,
    state: QuizState,
    questions: Vec<Flashcard>,
    /// Options per question, parallel to `questions` (multiple choice only).
    choices: Vec<Vec<String>>,
    cursor: usize,
    correct_count: u32,
    wrong_count: u32,
    unanswered_count: u32,
    learned: BTreeSet<String>,
    time_remaining: u32,
    seconds_per_question: u32,
    summary: Option<QuizSummary>,
}

impl QuizSession {
    /// Create a session that has not started yet.
    pub fn new(mode: QuizMode, seconds_per_question: u32) -> Self {
        let seconds_per_question = seconds_per_question.max(1);
        Self {
            mode,
            state: QuizState::NotStarted,
            questions: Vec::new(),
            choices: Vec::new(),
            cursor: 0,
            correct_count: 0,
            wrong_count: 0,
            unanswered_count: 0,
            learned: BTreeSet::new(),
            time_remaining: seconds_per_question,
            seconds_per_question,
            summary: None,
        }
    }

    /// Start the quiz over `cards`.
    ///
    /// Open-answer mode needs at least one card. Multiple-choice mode needs
    /// at least four cards with four distinct translations. On error the
    /// session stays `NotStarted`.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        mut cards: Vec<Flashcard>,
        shuffle: bool,
        rng: &mut R,
    ) -> Result<(), QuizError> {
        let required = self.mode.min_flashcards();
        if cards.len() < required {
            return Err(QuizError::NotEnoughFlashcards {
                mode: self.mode,
                required,
                available: cards.len(),
            });
        }

        if self.mode == QuizMode::MultipleChoice {
            let distinct = cards
                .iter()
                .map(|c| normalize(&c.translation))
                .collect::<HashSet<_>>()
                .len();
            if distinct < CHOICE_COUNT {
                return Err(QuizError::NotEnoughDistinctAnswers { available: distinct });
            }
        }

        if shuffle {
            cards.shuffle(rng);
        }

        self.choices = match self.mode {
            QuizMode::OpenAnswer => Vec::new(),
            QuizMode::MultipleChoice => cards
                .iter()
                .map(|card| build_choices(&cards, &card.translation, rng))
                .collect(),
        };
        self.questions = cards;
        self.cursor = 0;
        self.correct_count = 0;
        self.wrong_count = 0;
        self.unanswered_count = 0;
        self.learned.clear();
        self.time_remaining = self.seconds_per_question;
        self.summary = None;
        self.state = QuizState::InProgress;
        Ok(())
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    /// Index of the current question.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn unanswered_count(&self) -> u32 {
        self.unanswered_count
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    /// Summary of a finished session.
    pub fn summary(&self) -> Option<&QuizSummary> {
        self.summary.as_ref()
    }

    /// Translation expected for the current question.
    pub fn current_correct_answer(&self) -> Option<&str> {
        self.current_card().map(|card| card.translation.as_str())
    }

    pub fn current_question(&self) -> Option<QuestionView> {
        let card = self.current_card()?;
        Some(QuestionView {
            number: self.cursor + 1,
            total: self.questions.len(),
            word: card.word.clone(),
            choices: self.choices.get(self.cursor).cloned(),
            time_remaining: self.time_remaining,
        })
    }

    /// Check a typed answer against the current question and advance.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, QuizError> {
        let correct_answer = self
            .current_correct_answer()
            .ok_or(QuizError::NotInProgress)?
            .to_string();

        let result = compare_answers(answer, &correct_answer);
        if result.is_correct {
            self.correct_count += 1;
            self.learned.insert(correct_answer.clone());
        } else {
            self.wrong_count += 1;
        }

        Ok(AnswerOutcome {
            is_correct: result.is_correct,
            correct_answer,
            summary: self.advance(),
        })
    }

    /// Pick a multiple-choice option by index and advance.
    pub fn choose(&mut self, index: usize) -> Result<AnswerOutcome, QuizError> {
        if self.state != QuizState::InProgress {
            return Err(QuizError::NotInProgress);
        }
        let options = self
            .choices
            .get(self.cursor)
            .ok_or(QuizError::NotMultipleChoice)?;
        let picked = options
            .get(index)
            .ok_or(QuizError::InvalidChoice {
                index,
                count: options.len(),
            })?
            .clone();

        self.submit_answer(&picked)
    }

    /// Advance the countdown by one second.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != QuizState::InProgress {
            return TickOutcome::Idle;
        }

        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining > 0 {
            return TickOutcome::Running {
                time_remaining: self.time_remaining,
            };
        }

        let correct_answer = self.current_correct_answer().unwrap_or_default().to_string();
        self.unanswered_count += 1;
        TickOutcome::TimedOut {
            correct_answer,
            summary: self.advance(),
        }
    }

    fn current_card(&self) -> Option<&Flashcard> {
        if self.state != QuizState::InProgress {
            return None;
        }
        self.questions.get(self.cursor)
    }

    /// Move to the next question, finishing the session after the last one.
    fn advance(&mut self) -> Option<QuizSummary> {
        self.cursor += 1;
        self.time_remaining = self.seconds_per_question;

        if self.cursor < self.questions.len() {
            return None;
        }

        let summary = QuizSummary {
            correct_count: self.correct_count,
            wrong_count: self.wrong_count,
            unanswered_count: self.unanswered_count,
            learned_words: self.learned.iter().cloned().collect(),
            finished_at: Utc::now(),
        };
        self.state = QuizState::Finished;
        self.questions.clear();
        self.choices.clear();
        self.summary = Some(summary.clone());
        Some(summary)
    }
}

/// Correct answer plus distractors drawn with replacement from `cards`,
/// deduplicated by normalized translation, in random order.
///
/// Callers guarantee at least `CHOICE_COUNT` distinct translations.
fn build_choices<R: Rng + ?Sized>(cards: &[Flashcard], correct: &str, rng: &mut R) -> Vec<String> {
    let mut seen = HashSet::from([normalize(correct)]);
    let mut options = vec![correct.to_string()];

    while options.len() < CHOICE_COUNT {
        let Some(card) = cards.choose(rng) else { break };
        if seen.insert(normalize(&card.translation)) {
            options.push(card.translation.clone());
        }
    }

    options.shuffle(rng);
    options
}
