//! The single-page chat UI.
//!
//! Static HTML + vanilla JS talking to `/api/*`. All user and model text is
//! inserted with `textContent`, never as markup.

use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>IT Helpdesk Chatbot</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; }
    body { margin: 0; font-family: system-ui, -apple-system, sans-serif; display: flex; min-height: 100vh; }
    aside { width: 290px; padding: 1rem; background: #f7f7f9; border-right: 1px solid #ddd; }
    main { flex: 1; padding: 1rem 2rem; display: flex; flex-direction: column; }
    h1 { font-size: 2.2rem; color: #1f77b4; text-align: center; margin: 0 0 1.5rem; }
    .status-online { color: #4caf50; font-weight: bold; }
    .status-offline { color: #f44336; font-weight: bold; }
    .status-warning { color: #ff9800; font-weight: bold; }
    aside button { width: 100%; margin: 0.25rem 0; padding: 0.5rem; border: 1px solid #ccc; border-radius: 6px; background: #fff; cursor: pointer; text-align: left; }
    aside button:hover { background: #eef4fb; }
    #history { flex: 1; overflow-y: auto; }
    .chat-message { padding: 1rem; border-radius: 0.5rem; margin: 0.5rem 0; white-space: pre-wrap; }
    .user-message { background: #e3f2fd; border-left: 4px solid #2196f3; }
    .bot-message { background: #f5f5f5; border-left: 4px solid #4caf50; }
    .error { color: #f44336; margin: 0.5rem 0; }
    form { display: flex; gap: 0.5rem; margin-top: 1rem; }
    form input { flex: 1; padding: 0.6rem; border: 1px solid #ccc; border-radius: 6px; }
    dialog { max-width: 560px; border: none; border-radius: 10px; box-shadow: 0 8px 30px rgba(0,0,0,.25); }
    dialog pre { white-space: pre-wrap; font-family: inherit; }
    .notice { background: #e8f5e9; color: #2e7d32; padding: 0.5rem; border-radius: 6px; }
    footer { margin-top: 1rem; border-top: 1px solid #ddd; padding-top: 0.5rem; color: #666; font-size: 0.9rem; }
  </style>
</head>
<body>
  <aside>
    <h2>📊 System Status</h2>
    <div id="status" class="status-warning">Initializing chatbot...</div>
    <div id="actions-panel" hidden>
      <h3>⚡ Quick Actions</h3>
      <div id="actions"></div>
    </div>
  </aside>
  <main>
    <h1>🤖 IT Helpdesk Chatbot</h1>
    <div id="chat" hidden>
      <h3>💬 Chat with IT Support</h3>
      <div id="history"></div>
      <div id="error" class="error"></div>
      <form id="ask">
        <input id="question" autocomplete="off" placeholder="Type your question here..." />
        <button type="submit">Send</button>
      </form>
      <p><button id="clear">🗑️ Clear Chat History</button></p>
    </div>
    <div id="waiting" class="status-warning"></div>
    <footer>🔧 <strong>Features:</strong> Vector-based search | Function calling | CSV knowledge base | Real-time chat</footer>
  </main>
  <dialog id="dialog">
    <h3 id="dialog-title"></h3>
    <p class="notice" id="dialog-notice"></p>
    <pre id="dialog-body"></pre>
    <form method="dialog"><button>Close</button></form>
  </dialog>
  <script>
    const $ = (id) => document.getElementById(id);
    let sessionId = null;

    function bubble(cls, heading, text) {
      const div = document.createElement("div");
      div.className = "chat-message " + cls;
      const strong = document.createElement("strong");
      strong.textContent = heading;
      div.append(strong, document.createElement("br"), document.createTextNode(text));
      return div;
    }

    function renderHistory(turns) {
      const h = $("history");
      h.replaceChildren();
      for (const t of turns) {
        h.append(bubble("user-message", "🙋 You (" + t.timestamp + "):", t.question));
        h.append(bubble("bot-message", "🤖 IT Support:", t.answer));
      }
      h.scrollTop = h.scrollHeight;
    }

    async function refreshHistory() {
      const r = await fetch("/api/sessions/" + sessionId + "/history");
      if (r.ok) renderHistory(await r.json());
    }

    async function runAction(name) {
      const r = await fetch("/api/actions/" + name, { method: "POST" });
      const body = await r.json();
      if (!r.ok) { $("error").textContent = body.message; return; }
      $("dialog-title").textContent = body.title;
      $("dialog-notice").textContent = body.notice;
      $("dialog-body").textContent = body.body;
      $("dialog").showModal();
    }

    async function init() {
      const health = await (await fetch("/api/health")).json();
      if (health.bot.status !== "ready") {
        $("status").className = "status-offline";
        $("status").textContent = "❌ " + health.bot.error;
        $("waiting").textContent = "⏳ Please wait for the chatbot to initialize...";
        return;
      }
      $("status").className = "status-online";
      $("status").textContent = "✅ Chatbot initialized successfully! (" + health.bot.documents_count + " documents)";

      const actions = await (await fetch("/api/actions")).json();
      for (const a of actions) {
        const b = document.createElement("button");
        b.textContent = a.label;
        b.onclick = () => runAction(a.name);
        $("actions").append(b);
      }
      $("actions-panel").hidden = false;

      sessionId = (await (await fetch("/api/sessions", { method: "POST" })).json()).session_id;
      $("chat").hidden = false;
      window.addEventListener("pagehide", () => {
        fetch("/api/sessions/" + sessionId, { method: "DELETE", keepalive: true });
      });
    }

    $("ask").addEventListener("submit", async (ev) => {
      ev.preventDefault();
      const q = $("question").value.trim();
      if (!q) return;
      $("error").textContent = "🔍 Searching knowledge base...";
      $("question").disabled = true;
      try {
        const r = await fetch("/api/sessions/" + sessionId + "/messages", {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify({ message: q }),
        });
        const body = await r.json();
        if (r.ok) {
          $("error").textContent = "";
          $("question").value = "";
          await refreshHistory();
        } else {
          $("error").textContent = body.message;
        }
      } finally {
        $("question").disabled = false;
        $("question").focus();
      }
    });

    $("clear").addEventListener("click", async () => {
      await fetch("/api/sessions/" + sessionId + "/clear", { method: "POST" });
      await refreshHistory();
    });

    init();
  </script>
</body>
</html>
"#;

/// GET /: the chat page.
pub(super) async fn root() -> Html<&'static str> {
    Html(INDEX_HTML)
}
