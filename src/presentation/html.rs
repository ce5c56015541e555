use tera::{Context, Tera};

use crate::error::Result;
use crate::presentation::view::MessageView;

const TRANSCRIPT_TEMPLATE: &str = r#"<section class="transcript">
{% for m in messages %}
  <div class="message {% if m.is_user %}user{% else %}bot{% endif %}" id="msg-{{ m.id }}">
    <span class="sender" data-icon="{{ m.icon }}">{{ m.sender_label }}</span>
    <div class="bubble">
      <p class="text">{{ m.text }}</p>
      {% if m.payload %}
      <div class="payload">
        {% if m.payload.data_rows %}
        <dl class="data-grid">
          {% for row in m.payload.data_rows %}
          <div class="row"><dt>{{ row.label }}:</dt><dd>{{ row.value }}</dd></div>
          {% endfor %}
        </dl>
        {% endif %}
        {% if m.payload.next_steps %}
        <div class="next-steps">
          <p class="heading">Recommended Actions</p>
          <ol>
            {% for step in m.payload.next_steps %}<li>{{ step }}</li>{% endfor %}
          </ol>
        </div>
        {% endif %}
        {% if m.payload.document %}
        <div class="document">{{ m.payload.document.caption }}: <a href="{{ m.payload.document.url }}" download>{{ m.payload.document.link_text }}</a></div>
        {% endif %}
      </div>
      {% endif %}
    </div>
    <span class="time">{{ m.time }}</span>
  </div>
{% endfor %}
{% if current_process %}
  <div class="status" role="status">{{ current_process }}</div>
{% endif %}
</section>
"#;

/// Renders message views as an escaped HTML fragment.
pub struct TranscriptRenderer {
    tera: Tera,
}

impl TranscriptRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template("transcript.html", TRANSCRIPT_TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(&self, messages: &[MessageView], current_process: &str) -> Result<String> {
        let mut context = Context::new();
        context.insert("messages", messages);
        context.insert("current_process", current_process);
        Ok(self.tera.render("transcript.html", &context)?)
    }
}
