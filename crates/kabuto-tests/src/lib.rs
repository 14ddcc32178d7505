//! End-to-end test suite for the Kabuto signing adapter.
//!
//! The integration tests drive the full orchestrated flow against mock
//! collaborators: a pass-through JSON codec standing in for the real
//! transaction library, a scripted device, and an arithmetic key deriver.
//! Every terminal state of the flow is reachable from here without a chain
//! backend or a physical device.

pub mod helpers;
