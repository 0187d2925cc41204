pub mod accounts;
pub mod quiz;
pub mod sentences;
pub mod translate;
pub mod vocabulary;

pub use accounts::AccountService;
pub use quiz::QuizService;
pub use sentences::{GeminiSentenceGenerator, SentenceGenerator};
pub use translate::{GoogleTranslator, Translator};
pub use vocabulary::VocabularyService;
