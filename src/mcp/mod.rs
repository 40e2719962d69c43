// Stdio MCP surface: envelopes, tool table, dispatcher and the read loop.
pub mod handler;
pub mod protocol;
pub mod session;
pub mod tools;
