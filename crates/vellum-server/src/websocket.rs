//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to clients for live reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReloadMessage {
    /// Full page reload
    Reload,

    /// A rebuild failed; the message is shown in the browser console
    BuildFailed {
        /// Error description
        message: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting reload messages to all connected clients.
#[derive(Debug, Clone)]
pub struct ReloadHub {
    sender: broadcast::Sender<ReloadMessage>,
}

impl ReloadHub {
    /// Create a new reload hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: ReloadMessage) {
        // Ignore send errors (no receivers)
        let _ = self.sender.send(msg);
    }

    /// Subscribe to reload messages.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ReloadHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side reload script.
pub fn reload_client_script(ws_url: &str) -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const ws = new WebSocket('{}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  ws.onopen = function() {{
    console.log('[reload] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);
    console.log('[reload]', msg.type);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'build_failed':
        console.error('[reload] Build failed:', msg.message);
        break;

      case 'connected':
        console.log('[reload] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[reload] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        console.log('[reload] Reconnecting...');
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  ws.onerror = function(e) {{
    console.error('[reload] WebSocket error:', e);
  }};
}})();
"#,
        ws_url
    )
}
