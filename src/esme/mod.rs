pub mod connection_state;
pub mod engine;
pub mod esme;
pub mod esme_config;
pub mod esme_events;
pub mod fault;

pub use connection_state::ConnectionState;
pub use engine::{ClientEngine, EngineError, MultiDest, SubmitFields};
pub use esme::Esme;
pub use esme_config::EsmeConfig;
pub use esme_events::{EsmeEvents, NullEvents, SendFailureKind};
pub use fault::{classify, FaultClass, FaultHandler, FaultHandlers};
