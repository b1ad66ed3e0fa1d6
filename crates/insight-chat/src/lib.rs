//! Evidence-based question answering over enriched review windows.
//!
//! A deterministic, ordered rule matcher maps free-text questions onto a
//! fixed set of analytic query types; every answer carries the evidence
//! rows that support it, and anything the rules cannot answer comes back as
//! an explicit insufficient-evidence outcome rather than a fabricated one.

pub mod answer;
pub mod router;

pub use answer::{answer_question, Answer, AnswerBody, AnswerContext, RouterOutcome};
pub use router::{route, Intent};
