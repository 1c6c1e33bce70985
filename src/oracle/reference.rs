use super::verdict::Verdict;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

/// Pause after a failed `accept` (e.g. descriptor exhaustion) before retrying.
const ACCEPT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// How the reference service spells its verdicts on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReplyStyle {
    /// `True` / `False`
    #[default]
    Word,
    /// `{"verdict": true}` / `{"verdict": false}`
    Json,
}

/// Judging rules for the bundled verdict service, used for local testing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRules {
    pub block_keyword: String,
    pub reply_style: ReplyStyle,
}

impl Default for ReferenceRules {
    fn default() -> Self {
        Self {
            block_keyword: "bot".into(),
            reply_style: ReplyStyle::Word,
        }
    }
}

impl ReferenceRules {
    /// Rejects a turn whose `text` contains the block keyword. Messages that
    /// are not JSON or carry no text are accepted.
    pub fn judge(&self, message: &str) -> Verdict {
        let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(message) else {
            return Verdict::Accepted;
        };
        match fields.get("text").and_then(Value::as_str) {
            Some(text) if text.contains(self.block_keyword.as_str()) => Verdict::Rejected,
            _ => Verdict::Accepted,
        }
    }

    pub fn render(&self, verdict: Verdict) -> String {
        match self.reply_style {
            ReplyStyle::Word if verdict.is_accepted() => "True".into(),
            ReplyStyle::Word => "False".into(),
            ReplyStyle::Json => serde_json::json!({ "verdict": verdict.is_accepted() }).to_string(),
        }
    }
}

/// Accept connections until `shutdown` fires, judging every text frame.
pub async fn serve(
    listener: TcpListener,
    rules: ReferenceRules,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!("reference oracle listening on ws://{addr}");

    loop {
        let (tcp, peer) = tokio::select! {
            () = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok(connection) => connection,
                Err(error) => {
                    tracing::warn!("reference oracle accept failed: {error}");
                    tokio::time::sleep(ACCEPT_RETRY_DELAY).await;
                    continue;
                }
            },
        };

        let rules = rules.clone();
        let shutdown = shutdown.child_token();
        tokio::spawn(async move {
            tokio::select! {
                () = shutdown.cancelled() => {}
                () = handle_socket(tcp, &rules) => {}
            }
            tracing::debug!(%peer, "reference oracle connection finished");
        });
    }

    tracing::info!("reference oracle stopped");
    Ok(())
}

async fn handle_socket(tcp: TcpStream, rules: &ReferenceRules) {
    let mut socket = match tokio_tungstenite::accept_async(tcp).await {
        Ok(socket) => socket,
        Err(error) => {
            tracing::debug!("websocket handshake failed: {error}");
            return;
        }
    };

    while let Some(result) = socket.next().await {
        let message = match result {
            Ok(message) => message,
            Err(error) => {
                tracing::debug!("websocket receive error: {error}");
                break;
            }
        };

        match message {
            Message::Text(text) => {
                let verdict = rules.judge(text.as_str());
                tracing::info!(%verdict, "judged turn");
                let reply = rules.render(verdict);
                if socket.send(Message::Text(reply.into())).await.is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}
