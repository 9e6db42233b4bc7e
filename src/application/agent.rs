use std::sync::Arc;

use log::{debug, info, warn};
use serde::Deserialize;

use crate::domain::chat::{AssistantTurn, ChatMessage, ChatModel};
use crate::error::{SupportError, SupportResult};
use crate::tools::ToolRegistry;

pub const SUPPORT_INSTRUCTIONS: &str = "あなたは親切でプロフェッショナルなカスタマーサポートAIアシスタントです。
あなたの役割は以下の通りです：
- 親切でプロフェッショナルなカスタマーサービスを提供する
- 商品、注文、問題に関するお客様の問い合わせをサポートする
- 会社に関する質問には、まず会社情報検索ツールで登録済みの会社情報を確認する
- 会社情報で解決できない場合は、必要に応じてウェブ検索を実行し、最新情報を提供する
- お客様のメッセージの感情的なトーンを考慮する

常に礼儀正しく親切な態度を保ち、お客様の問題を効率的に解決するよう心がけてください。
お客様が他の言語で書いていない限り、日本語で応答してください。";

const IMAGE_ATTACHED_SUFFIX: &str = " (画像が添付されました)";
const IMAGE_ONLY_PROMPT: &str = "画像を確認してください。";

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// Encoded image payload. Only its presence is forwarded to the model.
    #[serde(default)]
    pub image: Option<String>,
}

impl ChatRequest {
    /// Shapes the request into the user turn sent to the agent.
    pub fn into_messages(self) -> SupportResult<Vec<ChatMessage>> {
        let message = self.message.filter(|m| !m.trim().is_empty());
        let has_image = self.image.is_some_and(|i| !i.is_empty());

        let content = match (message, has_image) {
            (Some(text), true) => format!("{}{}", text, IMAGE_ATTACHED_SUFFIX),
            (None, true) => IMAGE_ONLY_PROMPT.to_string(),
            (Some(text), false) => text,
            (None, false) => {
                return Err(SupportError::validation("A message or an image is required"))
            }
        };
        Ok(vec![ChatMessage::user(content)])
    }
}

/// Customer-support agent: fixed instructions, a chat model and the tools
/// it may call while composing a reply.
pub struct SupportAgent {
    model: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    instructions: String,
    max_tokens: u32,
    max_tool_rounds: usize,
}

impl SupportAgent {
    pub fn new(model: Arc<dyn ChatModel>, tools: ToolRegistry, max_tokens: u32, max_tool_rounds: usize) -> Self {
        Self {
            model,
            tools,
            instructions: SUPPORT_INSTRUCTIONS.to_string(),
            max_tokens,
            max_tool_rounds,
        }
    }

    /// Runs one conversation turn and returns the assistant's reply text.
    pub async fn generate(&self, messages: Vec<ChatMessage>) -> SupportResult<String> {
        let mut conversation = Vec::with_capacity(messages.len() + 1);
        conversation.push(ChatMessage::system(self.instructions.clone()));
        conversation.extend(messages);

        let definitions = self.tools.definitions();

        for round in 0..self.max_tool_rounds {
            let turn = self
                .model
                .complete(&conversation, &definitions, self.max_tokens)
                .await?;

            if turn.tool_calls.is_empty() {
                debug!("Agent answered after {} tool round(s)", round);
                return Ok(turn.content.unwrap_or_default());
            }

            self.run_tool_calls(turn, &mut conversation).await;
        }

        warn!(
            "Agent reached {} tool rounds; requesting a final answer without tools",
            self.max_tool_rounds
        );
        let turn = self
            .model
            .complete(&conversation, &[], self.max_tokens)
            .await?;
        Ok(turn.content.unwrap_or_default())
    }

    async fn run_tool_calls(&self, turn: AssistantTurn, conversation: &mut Vec<ChatMessage>) {
        let calls = turn.tool_calls.clone();
        conversation.push(ChatMessage::Assistant {
            content: turn.content,
            tool_calls: turn.tool_calls,
        });

        for call in calls {
            info!("Agent calling tool '{}'", call.name);
            let arguments = match serde_json::from_str::<serde_json::Value>(&call.arguments) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Tool '{}' got unparseable arguments: {}", call.name, e);
                    serde_json::Value::Null
                }
            };
            let result = match self.tools.invoke(&call.name, arguments).await {
                Ok(value) => value,
                Err(e) => {
                    warn!("Tool '{}' failed: {}", call.name, e);
                    serde_json::json!({ "error": e.to_string() })
                }
            };
            conversation.push(ChatMessage::Tool {
                tool_call_id: call.id,
                content: result.to_string(),
            });
        }
    }
}
