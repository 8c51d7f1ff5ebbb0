pub mod cards;
pub mod describer;
pub mod metrics;
pub mod mock;

pub use cards::{CardLookup, CardRecord, LookupError, ScryfallClient};
pub use describer::{CardDescriber, GenerationError, OpenAiDescriber};
