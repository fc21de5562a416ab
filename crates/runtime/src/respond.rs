//! The model/tool response loop.
//!
//! One user message becomes zero or more model → tool → model round trips
//! and finally a text answer:
//!
//! ```text
//! AWAITING_MODEL ──(no tool calls)──▶ DONE
//!       │  ▲
//! (tool calls)
//!       ▼  │
//! EXECUTING_TOOLS
//! ```
//!
//! The number of model invocations is capped; running out of budget is
//! reported as [`Error::ToolLoopExhausted`].

use tracing::{debug, info};

use crate::history::ChatTurn;
use crate::model::{Backend, Message, ModelRequest, Usage};
use crate::tools::{BoundModel, invoker};
use crate::translate::translate;
use crate::{Error, Result};

/// Default cap on model invocations per exchange.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Outcome of one completed exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// Final answer text.
    pub answer: String,
    /// Every message the loop worked with, including intermediate tool traffic.
    pub conversation: Vec<Message>,
    /// Number of model invocations performed.
    pub iterations: usize,
    pub usage: Usage,
}

/// Run the loop and return only the final answer.
pub async fn run<B: Backend>(
    history: &[ChatTurn],
    model: &BoundModel<B>,
    max_iterations: usize,
) -> Result<String> {
    run_exchange(history, model, max_iterations)
        .await
        .map(|exchange| exchange.answer)
}

/// Run the loop, keeping the full working conversation.
pub async fn run_exchange<B: Backend>(
    history: &[ChatTurn],
    model: &BoundModel<B>,
    max_iterations: usize,
) -> Result<Exchange> {
    let mut conversation = translate(history);
    let mut usage = Usage::default();

    for iteration in 1..=max_iterations {
        info!(iteration, max_iterations, "Tool calling iteration");

        let response = model.invoke(&conversation).await?;
        usage += response.usage;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Model responded"
        );

        let message = response.message;
        let tool_calls = message.tool_calls();
        let content = message.content();
        conversation.push(message);

        if tool_calls.is_empty() {
            let answer = final_answer(content)?;
            info!(iterations = iteration, "Final response generated");
            return Ok(Exchange {
                answer,
                conversation,
                iterations: iteration,
                usage,
            });
        }

        // Results go back in emission order; providers may correlate them
        // positionally as well as by id.
        info!(iteration, count = tool_calls.len(), "Executing tool calls");
        for call in &tool_calls {
            let result = invoker::execute(model.tools(), call);
            conversation.push(Message::tool_result(result));
        }
    }

    Err(Error::ToolLoopExhausted { max_iterations })
}

/// Single model call without tools, for sessions that disable tool use.
pub async fn generate_reply<B: Backend>(history: &[ChatTurn], backend: &B) -> Result<String> {
    let messages = translate(history);
    let response = backend.call(ModelRequest::plain(&messages)).await?;
    final_answer(response.message.content())
}

fn final_answer(content: Option<String>) -> Result<String> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        _ => Err(Error::EmptyResponse),
    }
}
