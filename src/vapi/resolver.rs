//! Pick the tool call a route is responsible for out of a batch.

use crate::error::ServiceError;
use crate::vapi::tool_call::{ToolArguments, ToolCall};

/// Operations reachable through tool calls, keyed by the function name the
/// voice assistant is configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateUser,
    CreateTodo,
    GetTodos,
    CompleteTodo,
    DeleteTodo,
}

impl Operation {
    /// Function name as it appears in `toolCalls[].function.name`.
    pub fn function_name(self) -> &'static str {
        match self {
            Operation::CreateUser => "createUser",
            Operation::CreateTodo => "createTodo",
            Operation::GetTodos => "getTodos",
            Operation::CompleteTodo => "completeTodo",
            Operation::DeleteTodo => "deleteTodo",
        }
    }
}

/// The matched tool call with decoded arguments.
#[derive(Debug, Clone)]
pub struct ResolvedCall<'a> {
    /// Id to echo back as `toolCallId`.
    pub id: &'a str,
    pub arguments: ToolArguments,
}

/// Return the first call in `calls` whose function is `operation`, with its
/// arguments decoded.
///
/// No match is an [`ServiceError::InvalidRequest`]; undecodable arguments of
/// the matched call are a [`ServiceError::Decode`]. Arguments of other calls
/// are never inspected.
pub fn resolve(calls: &[ToolCall], operation: Operation) -> Result<ResolvedCall<'_>, ServiceError> {
    let name = operation.function_name();
    let call = calls
        .iter()
        .find(|call| call.function.name == name)
        .ok_or_else(|| {
            tracing::debug!(
                expected = name,
                received = ?calls.iter().map(|c| c.function.name.as_str()).collect::<Vec<_>>(),
                "No matching tool call in batch"
            );
            ServiceError::invalid_request()
        })?;

    let arguments = call.function.arguments.decode()?;
    Ok(ResolvedCall {
        id: &call.id,
        arguments,
    })
}
