pub mod handshake;
pub mod request;

pub use handshake::{HandshakeFlags, RenderedFrame, SessionEvent, SessionState, SpiralSession};
pub use request::{SampleSource, SaveTargets, SpiralRequest};
