//! Vapi integration: inbound tool-call webhooks and the outbound call API.
//!
//! The voice platform POSTs a batch of tool calls; [`resolver::resolve`]
//! picks the one a route handles and [`envelope::ToolResults`] carries the
//! answer back. [`client::VapiClient`] polls the platform for call details.

pub mod client;
pub mod envelope;
pub mod resolver;
pub mod tool_call;

pub use client::{CallDetails, CallSummary, VapiClient};
pub use envelope::{SUCCESS, ToolResult, ToolResults};
pub use resolver::{Operation, ResolvedCall, resolve};
pub use tool_call::{RawArguments, ToolArguments, ToolCall, ToolCallMessage, ToolCallRequest, ToolFunction};
