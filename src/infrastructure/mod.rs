//! Adapters behind the domain ports: in-memory / scripted implementations
//! for tests and the demo CLI, and reqwest-backed clients for the real
//! merchant lookup and submission services.

pub mod http;
pub mod in_memory;
