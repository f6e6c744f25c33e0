//! Shared test transports for the EventStore HTTP client.

mod echo;
mod stub;

pub use echo::EchoTransport;
pub use stub::{FailingTransport, StubTransport};
