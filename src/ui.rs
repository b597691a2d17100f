use crate::models::{ChartBar, NoticeKind, PageView, UnitRow, WeekIndex};
use serde::Serialize;
use tracing::error;

pub fn render_index(view: &PageView) -> String {
    INDEX_HTML
        .replace("{{WEEK}}", &view.week.to_string())
        .replace("{{WEEK_OPTIONS}}", &week_options(view.week))
        .replace("{{UNITS}}", &unit_rows(&view.units))
        .replace("{{CHART}}", &chart_bars(&view.chart))
        .replace("{{ACHIEVEMENT}}", &format_percent(view.achievement))
        .replace("{{TIER_KIND}}", kind_class(view.tier.kind))
        .replace("{{TIER_MESSAGE}}", &escape_html(&view.tier.message))
        .replace("{{CELEBRATE}}", if view.tier.celebrate { "celebrate" } else { "" })
        .replace("{{NOTICE}}", &notice_block(view))
        .replace("{{HISTORY_WEEK}}", &view.history.week.to_string())
        .replace("{{HISTORY_OPTIONS}}", &week_options(view.history.week))
        .replace("{{HISTORY}}", &history_json(view))
        .replace("{{REFLECTION}}", &escape_html(&view.reflection))
}

/// Rounded percentage, e.g. 0.5 -> "50%". Values over 1.0 are shown as-is.
pub fn format_percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

fn week_options(selected: u8) -> String {
    WeekIndex::ALL
        .iter()
        .map(|week| {
            let marker = if week.get() == selected { " selected" } else { "" };
            format!("<option value=\"{week}\"{marker}>Week {week}</option>")
        })
        .collect()
}

fn unit_rows(units: &[UnitRow]) -> String {
    units
        .iter()
        .map(|row| {
            let name = escape_html(&row.name);
            format!(
                r#"<form class="unit" method="post" action="/event">
        <input type="hidden" name="kind" value="set_progress" />
        <input type="hidden" name="unit" value="{name}" />
        <div class="unit-head">
          <h3>{name}</h3>
          <span class="value">{percent}</span>
        </div>
        <label>Verses memorized ({total} total)
          <input type="range" name="memorized" min="0" max="{total}" value="{memorized}" onchange="this.form.submit()" />
        </label>
        <div class="meter"><span style="width: {width:.1}%"></span></div>
        <span class="hint">{memorized} / {total}</span>
      </form>"#,
                percent = format_percent(row.percent),
                total = row.total_items,
                memorized = row.memorized,
                width = bar_width(row.percent),
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ")
}

fn chart_bars(bars: &[ChartBar]) -> String {
    bars.iter()
        .map(|bar| {
            format!(
                r#"<div class="bar-row"><span class="bar-label">{name}</span><div class="bar"><span style="width: {width:.1}%"></span></div><span class="bar-value">{percent}</span></div>"#,
                name = escape_html(&bar.name),
                width = bar_width(bar.percent),
                percent = format_percent(bar.percent),
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

/// Bars stop at the edge of the track; the label keeps the real value.
fn bar_width(ratio: f64) -> f64 {
    (ratio * 100.0).clamp(0.0, 100.0)
}

fn notice_block(view: &PageView) -> String {
    let mut html = String::new();
    if let Some(notice) = &view.notice {
        html.push_str(&format!(
            r#"<div class="notice {}">{}</div>"#,
            kind_class(notice.kind),
            escape_html(&notice.message)
        ));
    }
    if let Some(saved) = &view.saved {
        html.push_str(&format!(r#"<pre class="record">{}</pre>"#, pretty_json(saved)));
    }
    html
}

fn history_json(view: &PageView) -> String {
    pretty_json(&view.history.entries)
}

/// Escaped pretty JSON; a serialization failure is logged and renders empty.
fn pretty_json<T: Serialize>(value: &T) -> String {
    match serde_json::to_string_pretty(value) {
        Ok(json) => escape_html(&json),
        Err(err) => {
            error!("failed to render json block: {err}");
            String::new()
        }
    }
}

fn kind_class(kind: NoticeKind) -> &'static str {
    match kind {
        NoticeKind::Info => "info",
        NoticeKind::Success => "success",
        NoticeKind::Warning => "warning",
        NoticeKind::Error => "error",
    }
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // keeps user text from matching template placeholders
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Memorization Tracker</title>
  <style>
    :root {
      --bg-1: #f3f1e8;
      --bg-2: #cfe3d4;
      --ink: #23302a;
      --accent: #2f7a5b;
      --accent-2: #c8902e;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(35, 48, 42, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #eef4ea 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 28px;
    }

    h1, h2, h3 {
      margin: 0;
    }

    .subtitle, .hint {
      margin: 0;
      color: #5d6861;
      font-size: 0.95rem;
    }

    .units {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
      gap: 16px;
    }

    .unit {
      background: white;
      border-radius: 16px;
      padding: 16px;
      border: 1px solid rgba(35, 48, 42, 0.08);
      display: grid;
      gap: 8px;
    }

    .unit-head, .toolbar {
      display: flex;
      justify-content: space-between;
      align-items: center;
      gap: 12px;
      flex-wrap: wrap;
    }

    .value {
      font-size: 1.4rem;
      font-weight: 600;
      color: var(--accent);
    }

    input[type="range"], textarea {
      width: 100%;
    }

    textarea {
      min-height: 110px;
      border-radius: 12px;
      border: 1px solid rgba(35, 48, 42, 0.2);
      padding: 12px;
      font: inherit;
    }

    .meter, .bar {
      height: 10px;
      border-radius: 999px;
      background: rgba(35, 48, 42, 0.08);
      overflow: hidden;
    }

    .meter span, .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .bar-row {
      display: grid;
      grid-template-columns: 120px 1fr 64px;
      align-items: center;
      gap: 12px;
    }

    .bar span {
      background: var(--accent-2);
    }

    .notice {
      border-radius: 12px;
      padding: 12px 16px;
    }

    .notice.info { background: #e3eef9; }
    .notice.success { background: #e2f3e8; }
    .notice.warning { background: #fbf0d9; }
    .notice.error { background: #f9e0dc; color: #8a2a1d; }

    .notice.celebrate {
      font-weight: 600;
      animation: pulse 900ms ease 3;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.secondary {
      background: var(--accent-2);
    }

    pre {
      background: white;
      border-radius: 12px;
      padding: 12px;
      overflow-x: auto;
    }

    @keyframes pulse {
      50% {
        transform: scale(1.03);
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Memorization Tracker</h1>
      <p class="subtitle">4-week growth challenge. Every verse memorized is a step forward.</p>
    </header>

    {{NOTICE}}

    <form class="toolbar" method="post" action="/event">
      <input type="hidden" name="kind" value="select_week" />
      <label>Current week
        <select name="week" onchange="this.form.submit()">{{WEEK_OPTIONS}}</select>
      </label>
    </form>

    <section>
      <h2>Week {{WEEK}} progress</h2>
      <div class="units">
      {{UNITS}}
      </div>
    </section>

    <section>
      <h2>Overall progress</h2>
      <div class="chart">
        {{CHART}}
      </div>
      <p class="hint">Overall achievement: {{ACHIEVEMENT}}</p>
    </section>

    <div class="notice {{TIER_KIND}} {{CELEBRATE}}">{{TIER_MESSAGE}}</div>

    <form method="post" action="/event">
      <input type="hidden" name="kind" value="set_reflection" />
      <h2>Reflection journal</h2>
      <label class="hint" for="reflection">What did you learn today? What challenges did you overcome?</label>
      <textarea id="reflection" name="text" onchange="this.form.submit()">{{REFLECTION}}</textarea>
      <div class="toolbar">
        <button type="submit" formaction="/save">Save progress</button>
        <button class="secondary" type="submit" formaction="/snapshot">Write snapshot</button>
        <button class="secondary" type="submit" formaction="/report" formmethod="get">Download weekly report</button>
      </div>
    </form>

    <section>
      <form class="toolbar" method="post" action="/event">
        <input type="hidden" name="kind" value="view_week" />
        <h2>Past progress</h2>
        <select name="week" onchange="this.form.submit()">{{HISTORY_OPTIONS}}</select>
      </form>
      <pre>Week {{HISTORY_WEEK}}: {{HISTORY}}</pre>
    </section>
  </main>
</body>
</html>
"#;
