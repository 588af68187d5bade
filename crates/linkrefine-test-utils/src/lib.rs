//! Shared fixtures for linkrefine tests: an on-disk corpus builder and
//! scripted stand-ins for the decision function, the page writer and the
//! presentation sink.

pub mod corpus;
pub mod mock_decider;
pub mod mock_observer;
pub mod mock_writer;

pub use corpus::TestCorpus;
pub use mock_decider::ScriptedDecider;
pub use mock_observer::{ObservedEvent, RecordingObserver};
pub use mock_writer::RecordingWriter;
