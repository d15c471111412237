//! The agent reasoning loop implementation.

use anvil_core::error::Error;
use anvil_core::executor::ToolExecutor;
use anvil_core::hooks::{ConversationListener, ToolCallListener};
use anvil_core::message::{Conversation, Message};
use anvil_core::permissions::PermissionSet;
use anvil_core::provider::{Provider, ProviderRequest, StreamChunk};
use anvil_core::tool::ToolRegistry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The conversational agent: owns one conversation history and drives the
/// generate → detect-tool-calls → execute → append-results cycle.
///
/// Turns are strictly sequential — `chat` and `stream_chat` take
/// `&mut self`, so no two turns on the same agent can be in flight.
pub struct AgentLoop {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// The model to request
    model: String,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,

    /// System prompt, prepended to every outbound message list but never
    /// stored in history
    system_prompt: String,

    /// The conversation history, owned exclusively by this agent
    conversation: Conversation,

    /// Tool executor; `None` means this agent cannot call tools
    executor: Option<ToolExecutor>,

    /// Invoked with the full history after every completed turn
    conversation_listener: Option<Arc<dyn ConversationListener>>,

    /// Invoked before and after every tool batch
    tool_call_listener: Option<Arc<dyn ToolCallListener>>,

    /// Set for agents built by the subagent factory
    is_subagent: bool,
}

impl AgentLoop {
    /// Create an agent with no tool support.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            system_prompt: system_prompt.into(),
            conversation: Conversation::new(),
            executor: None,
            conversation_listener: None,
            tool_call_listener: None,
            is_subagent: false,
        }
    }

    /// Wire a tool registry and the permission set it dispatches under.
    pub fn with_tools(mut self, registry: Arc<ToolRegistry>, permissions: PermissionSet) -> Self {
        self.executor = Some(ToolExecutor::new(registry, permissions));
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_conversation_listener(mut self, listener: Arc<dyn ConversationListener>) -> Self {
        self.conversation_listener = Some(listener);
        self
    }

    pub fn with_tool_call_listener(mut self, listener: Arc<dyn ToolCallListener>) -> Self {
        self.tool_call_listener = Some(listener);
        self
    }

    /// Mark this agent as a subagent. Purely informational — recursion
    /// safety comes from the factory never registering the task tool.
    pub fn as_subagent(mut self) -> Self {
        self.is_subagent = true;
        self
    }

    pub fn is_subagent(&self) -> bool {
        self.is_subagent
    }

    /// The conversation history so far.
    pub fn history(&self) -> &[Message] {
        &self.conversation.messages
    }

    /// Swap the active permission set between turns.
    pub fn set_permissions(&mut self, permissions: PermissionSet) {
        if let Some(executor) = &mut self.executor {
            executor.set_permissions(permissions);
        }
    }

    /// Drop the conversation history. External persisted state is
    /// untouched.
    pub fn clear_history(&mut self) {
        self.conversation.clear();
    }

    /// `[system] + history`, cloned for the provider.
    fn outbound_messages(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.conversation.len() + 1);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(self.conversation.messages.iter().cloned());
        messages
    }

    fn build_request(&self, with_tools: bool) -> ProviderRequest {
        let mut request = ProviderRequest::new(&self.model, self.outbound_messages());
        request.temperature = self.temperature;
        request.max_tokens = self.max_tokens;
        if with_tools {
            if let Some(executor) = &self.executor {
                request.tools = executor.registry().definitions();
            }
        }
        request
    }

    fn notify_update(&self) {
        if let Some(listener) = &self.conversation_listener {
            listener.on_update(&self.conversation.messages);
        }
    }

    /// Send a message and get a response, running the agentic tool-calling
    /// loop for up to `max_iterations` provider calls.
    ///
    /// Tool failures never surface here — they continue the loop as
    /// in-band error results. Provider failures do surface. Exhausting
    /// the iteration cap is a soft-fail: the last history entry's content
    /// is returned as a degraded result.
    pub async fn chat(&mut self, user_input: &str, max_iterations: u32) -> Result<String, Error> {
        self.conversation.push(Message::user(user_input));

        info!(
            conversation_id = %self.conversation.id,
            messages = self.conversation.len(),
            "Processing chat turn"
        );

        let mut final_response: Option<String> = None;

        for iteration in 1..=max_iterations {
            debug!(
                conversation_id = %self.conversation.id,
                iteration,
                "Agent loop iteration"
            );

            let request = self.build_request(true);
            let response = self.provider.complete(request).await?;

            let assistant = response.message;
            let tool_calls = assistant.tool_calls.clone();
            let content = assistant.content.clone();
            self.conversation.push(assistant);

            if !tool_calls.is_empty() {
                if let Some(executor) = &self.executor {
                    debug!(tool_count = tool_calls.len(), "Executing tool calls");

                    if let Some(listener) = &self.tool_call_listener {
                        listener.on_tool_calls(&tool_calls, None).await;
                    }

                    let results = executor.dispatch_batch(&tool_calls).await;

                    if let Some(listener) = &self.tool_call_listener {
                        listener.on_tool_calls(&tool_calls, Some(&results)).await;
                    }

                    // One tool-role message per result, in call order, all
                    // appended before the next provider call.
                    for result in &results {
                        self.conversation.push(Message::tool_result(
                            &result.tool_call_id,
                            &result.tool_name,
                            &result.content,
                        ));
                    }

                    continue;
                }
            }

            final_response = Some(content.unwrap_or_default());
            break;
        }

        let final_response = final_response.unwrap_or_else(|| {
            warn!(
                conversation_id = %self.conversation.id,
                max_iterations,
                "Iteration cap reached without a final response"
            );
            self.conversation
                .last()
                .map(|m| m.text().to_string())
                .unwrap_or_default()
        });

        self.notify_update();
        Ok(final_response)
    }

    /// Stream a plain-text response fragment by fragment.
    ///
    /// Tool calls are not supported on this path by design — it exists
    /// for low-latency text replies. Each fragment is handed to
    /// `on_fragment` as it arrives; the concatenated text is appended to
    /// history as one assistant message when the stream ends.
    pub async fn stream_chat(
        &mut self,
        user_input: &str,
        mut on_fragment: impl FnMut(&StreamChunk) + Send,
    ) -> Result<String, Error> {
        self.conversation.push(Message::user(user_input));

        let request = self.build_request(false);
        let mut rx = self.provider.stream(request).await?;

        let mut full_response = String::new();
        while let Some(chunk) = rx.recv().await {
            let chunk = chunk?;
            if let Some(content) = &chunk.content {
                full_response.push_str(content);
            }
            on_fragment(&chunk);
        }

        self.conversation.push(Message::assistant(&full_response));
        self.notify_update();
        Ok(full_response)
    }
}
