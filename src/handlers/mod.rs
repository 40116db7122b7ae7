pub mod analysis;
pub mod chat;

pub use analysis::AnalysisHandler;
pub use chat::ChatHandler;
