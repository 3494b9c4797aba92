use crate::offline::{Asset, AssetError, AssetSource};

/// Static assets pre-cached by the offline cache.
pub const STATIC_MANIFEST: [&str; 4] = [
    "/static/styles.css",
    "/static/app.js",
    "/static/manifest.json",
    "/static/favicon.svg",
];

/// Pages the browser worker caches in addition to the manifest.
pub const PAGE_URLS: [&str; 1] = ["/"];

pub fn render_index(year: i32) -> String {
    INDEX_HTML.replace("{{YEAR}}", &year.to_string())
}

/// Assets compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedAssets;

impl AssetSource for EmbeddedAssets {
    fn fetch(&self, path: &str) -> Result<Asset, AssetError> {
        let (content_type, body) = match path {
            "/static/styles.css" => ("text/css; charset=utf-8", STYLES_CSS),
            "/static/app.js" => ("application/javascript; charset=utf-8", APP_JS),
            "/static/manifest.json" => ("application/manifest+json", WEB_MANIFEST),
            "/static/favicon.svg" => ("image/svg+xml", FAVICON_SVG),
            _ => return Err(AssetError::NotFound(path.to_string())),
        };
        Ok(Asset {
            content_type,
            body: body.as_bytes().to_vec(),
        })
    }
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta name="theme-color" content="#0f1424" />
  <title>Activity Tracker</title>
  <link rel="icon" href="/static/favicon.svg" type="image/svg+xml" />
  <link rel="manifest" href="/static/manifest.json" />
  <link rel="stylesheet" href="/static/styles.css" />
</head>
<body data-year="{{YEAR}}">
  <main class="app">
    <header>
      <h1>Activity Tracker</h1>
      <p class="subtitle">Sport, work and goals across <span id="year">{{YEAR}}</span>.</p>
    </header>

    <section class="card">
      <div class="legend">
        <span class="chip sport-only">Sport</span>
        <span class="chip work-only">Work</span>
        <span class="chip goals-only">Goals</span>
        <span class="chip all-three">All three</span>
      </div>
      <div class="grid-wrap">
        <div class="month-labels" id="month-labels"></div>
        <div class="contribution-grid" id="grid"></div>
      </div>
    </section>

    <section class="charts">
      <div class="card wide">
        <h2>Monthly activity</h2>
        <svg id="monthly-chart" class="chart" viewBox="0 0 640 240" role="img"></svg>
      </div>
      <div class="card">
        <h2>Sport vs work</h2>
        <svg id="share-chart" class="chart" viewBox="0 0 240 240" role="img"></svg>
        <p class="caption" id="share-caption"></p>
      </div>
      <div class="card">
        <h2>Balance</h2>
        <svg id="balance-chart" class="chart" viewBox="0 0 240 240" role="img"></svg>
      </div>
      <div class="card wide">
        <h2>Combinations</h2>
        <svg id="combo-chart" class="chart" viewBox="0 0 640 240" role="img"></svg>
      </div>
    </section>
    <div class="status" id="status"></div>
  </main>

  <div class="modal" id="modal" hidden>
    <div class="modal-body">
      <button class="close" id="modal-close" aria-label="Close">&times;</button>
      <h2 id="modal-date"></h2>
      <div class="tag-buttons">
        <button class="tag-btn sport" data-tag="sport">Sport</button>
        <button class="tag-btn work" data-tag="work">Work</button>
        <button class="tag-btn goals" data-tag="goals">Goals</button>
      </div>
      <div class="selected" id="selected"></div>
      <textarea id="note" rows="3" placeholder="Notes"></textarea>
      <button class="save" id="save">Save</button>
    </div>
  </div>

  <script src="/static/app.js"></script>
</body>
</html>
"##;

const STYLES_CSS: &str = r#":root {
  --bg: #0f1424;
  --card: #161d33;
  --ink: #e8eaed;
  --muted: #a8b3c0;
  --line: #2a3142;
  --sport: #4fc3f7;
  --work: #ff6b6b;
  --goals: #51cf66;
  --all: #9333ea;
}

* { box-sizing: border-box; }

body {
  margin: 0;
  min-height: 100vh;
  background: var(--bg);
  color: var(--ink);
  font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
  padding: 28px 16px 48px;
}

.app { width: min(1100px, 100%); margin: 0 auto; display: grid; gap: 24px; }
h1 { margin: 0; font-size: clamp(1.8rem, 4vw, 2.6rem); }
h2 { margin: 0 0 12px; font-size: 1.1rem; }
.subtitle, .caption { color: var(--muted); margin: 4px 0 0; }

.card {
  background: var(--card);
  border: 1px solid var(--line);
  border-radius: 18px;
  padding: 20px;
}

.legend { display: flex; gap: 8px; flex-wrap: wrap; margin-bottom: 12px; }
.chip { padding: 4px 10px; border-radius: 999px; font-size: 0.8rem; color: #0f1424; }

.grid-wrap { overflow-x: auto; }
.month-labels, .contribution-grid { display: flex; gap: 3px; }
.month-labels { margin-bottom: 4px; }
.month-label { width: 13px; font-size: 0.7rem; color: var(--muted); }
.week-column { display: grid; grid-template-rows: repeat(7, 13px); gap: 3px; }
.week-spacer { width: 6px; flex: none; }

.day-tile {
  width: 13px;
  height: 13px;
  border-radius: 3px;
  background: #232b42;
  cursor: pointer;
}
.day-tile.empty { visibility: hidden; cursor: default; }

.sport-only { background: var(--sport); }
.work-only { background: var(--work); }
.goals-only { background: var(--goals); }
.sport-work { background: linear-gradient(135deg, var(--sport) 50%, var(--work) 50%); }
.sport-goals { background: linear-gradient(135deg, var(--sport) 50%, var(--goals) 50%); }
.work-goals { background: linear-gradient(135deg, var(--work) 50%, var(--goals) 50%); }
.all-three { background: var(--all); }
.chart rect.sport-only { fill: var(--sport); }
.chart rect.work-only { fill: var(--work); }
.chart rect.goals-only { fill: var(--goals); }
.chart rect.sport-work { fill: #4fc3f7b3; }
.chart rect.sport-goals { fill: #51cf66b3; }
.chart rect.work-goals { fill: #ff6b6bb3; }
.chart rect.all-three { fill: var(--all); }

.charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 20px; }
.charts .wide { grid-column: 1 / -1; }
.chart { width: 100%; height: auto; }
.chart text { fill: var(--muted); font-size: 11px; }
.chart .grid-line { stroke: var(--line); }

.modal {
  position: fixed;
  inset: 0;
  background: rgba(5, 8, 18, 0.7);
  display: grid;
  place-items: center;
}
.modal[hidden] { display: none; }
.modal-body {
  background: var(--card);
  border-radius: 18px;
  padding: 24px;
  width: min(420px, 92vw);
  display: grid;
  gap: 14px;
  position: relative;
}
.close { position: absolute; top: 10px; right: 14px; background: none; border: none; color: var(--muted); font-size: 1.6rem; cursor: pointer; }
.tag-buttons { display: flex; gap: 8px; }
.tag-btn { flex: 1; padding: 10px; border-radius: 999px; border: 2px solid var(--line); background: transparent; color: var(--ink); cursor: pointer; }
.tag-btn.sport.active { border-color: var(--sport); background: rgba(79, 195, 247, 0.2); }
.tag-btn.work.active { border-color: var(--work); background: rgba(255, 107, 107, 0.2); }
.tag-btn.goals.active { border-color: var(--goals); background: rgba(81, 207, 102, 0.2); }
textarea { background: #0f1424; color: var(--ink); border: 1px solid var(--line); border-radius: 10px; padding: 10px; font: inherit; }
.save { padding: 12px; border: none; border-radius: 999px; background: var(--sport); color: #0f1424; font-weight: 600; cursor: pointer; }
.status { min-height: 1.2em; color: var(--muted); }
.status[data-type="error"] { color: var(--work); }
"#;

const APP_JS: &str = r##"(() => {
  const TAGS = ['sport', 'work', 'goals'];
  const COLORS = { sport: '#4fc3f7', work: '#ff6b6b', goals: '#51cf66' };
  const year = Number(document.body.dataset.year);
  const gridEl = document.getElementById('grid');
  const labelsEl = document.getElementById('month-labels');
  const statusEl = document.getElementById('status');
  const modal = document.getElementById('modal');
  const modalDate = document.getElementById('modal-date');
  const noteEl = document.getElementById('note');
  const selectedEl = document.getElementById('selected');
  const tagButtons = Array.from(document.querySelectorAll('.tag-btn'));

  let draft = null;

  const setStatus = (message, type) => {
    statusEl.textContent = message;
    statusEl.dataset.type = type || '';
  };

  const readable = (key) =>
    new Date(`${key}T00:00:00`).toLocaleDateString('en-US', { year: 'numeric', month: 'long', day: 'numeric' });

  const getJson = async (url, options) => {
    const res = await fetch(url, options);
    if (!res.ok) {
      throw new Error((await res.text()) || `Request failed: ${url}`);
    }
    return res.json();
  };

  const renderGrid = (grid) => {
    gridEl.innerHTML = '';
    labelsEl.innerHTML = '';
    grid.weeks.forEach((week) => {
      if (week.spacer_before) {
        const spacer = document.createElement('div');
        spacer.className = 'week-spacer';
        gridEl.appendChild(spacer);
        const labelSpacer = document.createElement('div');
        labelSpacer.className = 'month-label week-spacer';
        labelsEl.appendChild(labelSpacer);
      }
      const label = document.createElement('div');
      label.className = 'month-label';
      label.textContent = week.month_label || '';
      labelsEl.appendChild(label);

      const column = document.createElement('div');
      column.className = 'week-column';
      week.days.forEach((slot) => {
        const tile = document.createElement('div');
        if (slot.kind === 'empty') {
          tile.className = 'day-tile empty';
        } else {
          tile.className = `day-tile ${slot.combination || ''}`.trim();
          tile.dataset.date = slot.date;
          tile.title = `${readable(slot.date)}\n${slot.tags.length ? slot.tags.join(', ') : 'No activities'}`;
        }
        column.appendChild(tile);
      });
      gridEl.appendChild(column);
    });
  };

  const svg = (el, body) => { el.innerHTML = body; };

  const renderMonthly = (monthly) => {
    const el = document.getElementById('monthly-chart');
    const width = 640, height = 240, pad = 36;
    const max = Math.max(1, ...TAGS.flatMap((tag) => monthly[tag]));
    const x = (i) => pad + (i * (width - pad * 2)) / 11;
    const y = (v) => height - pad - (v * (height - pad * 2)) / max;
    let body = '';
    for (let i = 0; i <= 4; i += 1) {
      const value = (max * i) / 4;
      body += `<line class="grid-line" x1="${pad}" x2="${width - pad}" y1="${y(value)}" y2="${y(value)}" />`;
      body += `<text x="${pad - 8}" y="${y(value) + 4}" text-anchor="end">${Math.round(value)}</text>`;
    }
    TAGS.forEach((tag) => {
      const path = monthly[tag].map((v, i) => `${i === 0 ? 'M' : 'L'} ${x(i)} ${y(v)}`).join(' ');
      body += `<path d="${path}" fill="none" stroke="${COLORS[tag]}" stroke-width="2" />`;
    });
    monthly.labels.forEach((label, i) => {
      body += `<text x="${x(i)}" y="${height - 12}" text-anchor="middle">${label}</text>`;
    });
    svg(el, body);
  };

  const renderShare = (share) => {
    const el = document.getElementById('share-chart');
    const total = share.sport + share.work;
    const r = 90, cx = 120, cy = 120;
    if (total === 0) {
      svg(el, `<circle cx="${cx}" cy="${cy}" r="${r}" fill="#232b42" />`);
    } else if (share.sport === 0 || share.work === 0) {
      svg(el, `<circle cx="${cx}" cy="${cy}" r="${r}" fill="${share.sport ? COLORS.sport : COLORS.work}" />`);
    } else {
      const angle = (share.sport / total) * Math.PI * 2;
      const ex = cx + r * Math.sin(angle), ey = cy - r * Math.cos(angle);
      const large = angle > Math.PI ? 1 : 0;
      svg(el, `<circle cx="${cx}" cy="${cy}" r="${r}" fill="${COLORS.work}" />` +
        `<path d="M ${cx} ${cy} L ${cx} ${cy - r} A ${r} ${r} 0 ${large} 1 ${ex} ${ey} Z" fill="${COLORS.sport}" />`);
    }
    document.getElementById('share-caption').textContent =
      `Sport ${share.sport} (${share.sport_percent}%) / Work ${share.work} (${share.work_percent}%)`;
  };

  const renderBalance = (balance) => {
    const el = document.getElementById('balance-chart');
    const cx = 120, cy = 125, r = 85;
    const point = (i, v) => {
      const a = -Math.PI / 2 + (i * Math.PI * 2) / 3;
      return [cx + Math.cos(a) * r * (v / 100), cy + Math.sin(a) * r * (v / 100)];
    };
    let body = '';
    [25, 50, 75, 100].forEach((level) => {
      const ring = TAGS.map((_, i) => point(i, level).join(',')).join(' ');
      body += `<polygon points="${ring}" fill="none" class="grid-line" />`;
    });
    const shape = TAGS.map((tag, i) => point(i, balance[tag]).join(',')).join(' ');
    body += `<polygon points="${shape}" fill="${COLORS.sport}30" stroke="${COLORS.sport}" stroke-width="2" />`;
    TAGS.forEach((tag, i) => {
      const [lx, ly] = point(i, 118);
      body += `<text x="${lx}" y="${ly + 4}" text-anchor="middle">${tag} ${balance[tag]}</text>`;
    });
    svg(el, body);
  };

  const renderCombinations = (points) => {
    const el = document.getElementById('combo-chart');
    const width = 640, height = 240, pad = 36;
    const max = Math.max(1, ...points.map((p) => p.days));
    const slot = (width - pad * 2) / points.length;
    let body = '';
    points.forEach((p, i) => {
      const h = (p.days * (height - pad * 2)) / max;
      const x = pad + i * slot + 8;
      body += `<rect class="${p.kind}" x="${x}" y="${height - pad - h}" width="${slot - 16}" height="${h}" rx="6" />`;
      body += `<text x="${x + (slot - 16) / 2}" y="${height - pad - h - 6}" text-anchor="middle">${p.days}</text>`;
      body += `<text x="${x + (slot - 16) / 2}" y="${height - 12}" text-anchor="middle">${p.label}</text>`;
    });
    svg(el, body);
  };

  const refresh = async () => {
    const [grid, stats] = await Promise.all([
      getJson(`/api/grid?year=${year}`),
      getJson('/api/stats')
    ]);
    renderGrid(grid);
    renderMonthly(stats.monthly);
    renderShare(stats.share);
    renderBalance(stats.balance);
    renderCombinations(stats.combinations);
  };

  const renderSelection = () => {
    tagButtons.forEach((btn) => btn.classList.toggle('active', draft.tags.includes(btn.dataset.tag)));
    selectedEl.textContent = draft.tags.length ? draft.tags.join(', ') : 'No activities selected';
  };

  const openModal = async (key) => {
    const day = await getJson(`/api/day/${key}`);
    draft = { date: day.date, tags: [...day.tags] };
    modalDate.textContent = readable(day.date);
    noteEl.value = day.note;
    renderSelection();
    modal.hidden = false;
  };

  const closeModal = () => {
    modal.hidden = true;
    draft = null;
  };

  gridEl.addEventListener('click', (event) => {
    const key = event.target.dataset && event.target.dataset.date;
    if (key) {
      openModal(key).catch((err) => setStatus(err.message, 'error'));
    }
  });

  tagButtons.forEach((btn) => {
    btn.addEventListener('click', () => {
      const tag = btn.dataset.tag;
      draft.tags = draft.tags.includes(tag) ? draft.tags.filter((t) => t !== tag) : [...draft.tags, tag];
      renderSelection();
    });
  });

  document.getElementById('modal-close').addEventListener('click', closeModal);
  modal.addEventListener('click', (event) => {
    if (event.target === modal) {
      closeModal();
    }
  });

  document.getElementById('save').addEventListener('click', async () => {
    if (!draft) {
      return;
    }
    try {
      await getJson(`/api/day/${draft.date}`, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ tags: draft.tags, note: noteEl.value })
      });
      closeModal();
      await refresh();
      setStatus('Saved', 'ok');
      setTimeout(() => setStatus('', ''), 1200);
    } catch (err) {
      setStatus(err.message, 'error');
    }
  });

  if ('serviceWorker' in navigator) {
    navigator.serviceWorker.register('/sw.js').catch((err) => console.warn('service worker', err));
  }

  refresh().catch((err) => setStatus(err.message, 'error'));
})();
"##;

const WEB_MANIFEST: &str = r##"{
  "name": "Activity Tracker",
  "short_name": "Activities",
  "start_url": "/",
  "display": "standalone",
  "background_color": "#0f1424",
  "theme_color": "#0f1424",
  "icons": [
    { "src": "/static/favicon.svg", "sizes": "any", "type": "image/svg+xml" }
  ]
}
"##;

const FAVICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 32 32">
  <rect width="32" height="32" rx="6" fill="#0f1424"/>
  <rect x="5" y="5" width="9" height="9" rx="2" fill="#4fc3f7"/>
  <rect x="18" y="5" width="9" height="9" rx="2" fill="#ff6b6b"/>
  <rect x="5" y="18" width="9" height="9" rx="2" fill="#51cf66"/>
  <rect x="18" y="18" width="9" height="9" rx="2" fill="#9333ea"/>
</svg>
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_embeds_year() {
        let html = render_index(2026);
        assert!(html.contains(r#"data-year="2026""#));
        assert!(!html.contains("{{YEAR}}"));
    }

    #[test]
    fn every_manifest_entry_is_embedded() {
        for path in STATIC_MANIFEST {
            assert!(EmbeddedAssets.fetch(path).is_ok(), "{path}");
        }
        assert!(EmbeddedAssets.fetch("/static/missing.css").is_err());
    }
}
