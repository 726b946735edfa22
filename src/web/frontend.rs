//! Embedded HTML/CSS/JS frontend for the launchdash web dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. Charts are drawn
//! as inline SVG from the chart specs returned by the API.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>SpaceX Launch Records Dashboard</title>
<style>
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
  --mono: 'SF Mono', 'Cascadia Code', 'Fira Code', monospace;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app {
  max-width: 1100px;
  margin: 0 auto;
  padding: 24px;
}

header {
  text-align: center;
  margin-bottom: 24px;
  padding-bottom: 16px;
  border-bottom: 1px solid var(--border);
}

header h1 { font-size: 32px; font-weight: 600; }
header .subtitle { color: var(--text-muted); font-size: 13px; font-family: var(--mono); }

.card {
  background: var(--surface);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  padding: 20px;
  margin-bottom: 16px;
}

.card h2 {
  font-size: 16px;
  font-weight: 600;
  margin-bottom: 12px;
}

select {
  width: 100%;
  background: var(--bg);
  border: 1px solid var(--border);
  border-radius: 6px;
  color: var(--text);
  padding: 8px 10px;
  font-size: 14px;
}

select:focus { outline: none; border-color: var(--accent); }

.range-row {
  display: flex;
  align-items: center;
  gap: 12px;
}

.range-row input[type="range"] { flex: 1; accent-color: var(--accent); }

.range-values {
  font-family: var(--mono);
  font-size: 13px;
  color: var(--accent);
  margin-top: 8px;
  text-align: center;
}

.marks {
  display: flex;
  justify-content: space-between;
  font-size: 11px;
  color: var(--text-muted);
  font-family: var(--mono);
}

svg text { fill: var(--text); font-family: var(--font); }
svg .axis { stroke: var(--border); }
svg .muted { fill: var(--text-muted); font-size: 11px; }

.legend {
  display: flex;
  flex-wrap: wrap;
  gap: 12px;
  font-size: 12px;
  color: var(--text-muted);
  margin-top: 8px;
}

.legend span::before {
  content: '';
  display: inline-block;
  width: 10px;
  height: 10px;
  border-radius: 3px;
  margin-right: 4px;
  vertical-align: middle;
  background: var(--swatch);
}

.empty {
  text-align: center;
  color: var(--text-muted);
  padding: 40px 0;
}

.toast {
  position: fixed;
  bottom: 24px;
  right: 24px;
  background: var(--red);
  color: #fff;
  padding: 10px 16px;
  border-radius: 6px;
  opacity: 0;
  transition: opacity 0.2s;
}

.toast.show { opacity: 1; }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1 id="title">SpaceX Launch Records Dashboard</h1>
    <div class="subtitle" id="subtitle"></div>
  </header>

  <div class="card">
    <h2>Launch Site</h2>
    <select id="site-dropdown"></select>
  </div>

  <div class="card">
    <h2 id="pie-title"></h2>
    <div id="success-pie-chart"></div>
  </div>

  <div class="card">
    <h2>Payload range (Kg)</h2>
    <div class="range-row">
      <input type="range" id="payload-low">
      <input type="range" id="payload-high">
    </div>
    <div class="marks" id="payload-marks"></div>
    <div class="range-values" id="payload-values"></div>
  </div>

  <div class="card">
    <h2 id="scatter-title"></h2>
    <div id="success-payload-scatter-chart"></div>
  </div>
</div>

<div class="toast" id="toast"></div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let layout = null;
const controls = { site: 'ALL', low: 0, high: 0 };
const requestSeq = { 'success-pie-chart': 0, 'success-payload-scatter-chart': 0 };
const PALETTE = ['#58a6ff', '#3fb950', '#d29922', '#bc8cff', '#39d2c0', '#f85149', '#ff7b72', '#a5d6ff'];

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(path) {
  const res = await fetch(path);
  const body = await res.json();
  if (!res.ok) throw new Error(body.error || res.statusText);
  return body;
}

function toast(msg) {
  const el = document.getElementById('toast');
  el.textContent = msg;
  el.className = 'toast show';
  setTimeout(() => el.className = 'toast', 3000);
}

function query(withRange) {
  const p = new URLSearchParams({ site: controls.site });
  if (withRange) {
    p.set('low', controls.low);
    p.set('high', controls.high);
  }
  return p.toString();
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------
async function init() {
  try {
    layout = await api('/api/layout');
  } catch (e) {
    toast('Failed to load layout: ' + e.message);
    return;
  }

  document.getElementById('title').textContent = layout.title;

  const dropdown = document.getElementById('site-dropdown');
  dropdown.innerHTML = layout.site_options
    .map(o => `<option value="${esc(o.value)}">${esc(o.label)}</option>`)
    .join('');
  dropdown.value = layout.default_site;
  controls.site = layout.default_site;
  dropdown.addEventListener('change', () => {
    controls.site = dropdown.value;
    onControlChange('site-dropdown');
  });

  const s = layout.slider;
  [controls.low, controls.high] = s.value;
  for (const id of ['payload-low', 'payload-high']) {
    const el = document.getElementById(id);
    el.min = s.min;
    el.max = s.max;
    el.step = s.step;
    el.addEventListener('input', onSliderInput);
    el.addEventListener('change', () => onControlChange('payload-slider'));
  }
  document.getElementById('payload-low').value = controls.low;
  document.getElementById('payload-high').value = controls.high;
  document.getElementById('payload-marks').innerHTML =
    s.marks.map(m => `<span>${m}</span>`).join('');
  renderRangeValues();

  onControlChange(null);
}

function onSliderInput() {
  const lo = document.getElementById('payload-low');
  const hi = document.getElementById('payload-high');
  let a = Number(lo.value), b = Number(hi.value);
  if (a > b) [a, b] = [b, a];
  controls.low = a;
  controls.high = b;
  renderRangeValues();
}

function renderRangeValues() {
  document.getElementById('payload-values').textContent =
    `${controls.low.toLocaleString()} kg – ${controls.high.toLocaleString()} kg`;
}

// Refresh only the outputs bound to the changed control (all on first load).
async function onControlChange(control) {
  const outputs = layout.bindings
    .filter(b => control === null || b.inputs.includes(control))
    .map(b => b.output);

  document.getElementById('subtitle').textContent =
    `site=${controls.site}  payload=[${controls.low}, ${controls.high}]`;

  // Responses that arrive after a newer request for the same output are dropped.
  try {
    if (outputs.includes('success-pie-chart')) {
      const seq = ++requestSeq['success-pie-chart'];
      const pie = await api('/api/charts/pie?' + query(false));
      if (seq === requestSeq['success-pie-chart']) {
        renderPie('success-pie-chart', 'pie-title', pie);
      }
    }
    if (outputs.includes('success-payload-scatter-chart')) {
      const seq = ++requestSeq['success-payload-scatter-chart'];
      const scatter = await api('/api/charts/scatter?' + query(true));
      if (seq === requestSeq['success-payload-scatter-chart']) {
        renderScatter('success-payload-scatter-chart', 'scatter-title', scatter);
      }
    }
  } catch (e) {
    toast('Failed to update charts: ' + e.message);
  }
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------
function pieSlices(spec) {
  const slices = [];
  for (const e of spec.entries) {
    const existing = slices.find(s => s.label === e.label);
    if (existing) existing.value += e.value;
    else slices.push({ label: e.label, value: e.value });
  }
  return slices;
}

function renderPie(containerId, titleId, spec) {
  document.getElementById(titleId).textContent = spec.title;
  const el = document.getElementById(containerId);
  const slices = pieSlices(spec);
  const total = slices.reduce((acc, s) => acc + s.value, 0);

  if (total <= 0) {
    el.innerHTML = '<div class="empty">No data for this selection</div>';
    return;
  }

  const cx = 160, cy = 160, r = 140;
  let angle = -Math.PI / 2;
  const paths = slices.map((s, i) => {
    const frac = s.value / total;
    const color = PALETTE[i % PALETTE.length];
    if (frac >= 0.9999) {
      return `<circle cx="${cx}" cy="${cy}" r="${r}" fill="${color}"><title>${esc(s.label)}: ${s.value}</title></circle>`;
    }
    const start = angle;
    angle += frac * 2 * Math.PI;
    const x1 = cx + r * Math.cos(start), y1 = cy + r * Math.sin(start);
    const x2 = cx + r * Math.cos(angle), y2 = cy + r * Math.sin(angle);
    const large = frac > 0.5 ? 1 : 0;
    const mid = (start + angle) / 2;
    const lx = cx + r * 0.65 * Math.cos(mid), ly = cy + r * 0.65 * Math.sin(mid);
    return `<path d="M${cx},${cy} L${x1},${y1} A${r},${r} 0 ${large} 1 ${x2},${y2} Z" fill="${color}">` +
      `<title>${esc(s.label)}: ${s.value}</title></path>` +
      (frac > 0.04 ? `<text x="${lx}" y="${ly}" text-anchor="middle" font-size="12">${(frac * 100).toFixed(1)}%</text>` : '');
  }).join('');

  el.innerHTML =
    `<svg viewBox="0 0 320 320" width="320" height="320" style="display:block;margin:0 auto">${paths}</svg>` +
    legend(slices.map((s, i) => [`${spec.names} ${s.label}`, PALETTE[i % PALETTE.length]]));
}

// ---------------------------------------------------------------------------
// Scatter chart
// ---------------------------------------------------------------------------
function renderScatter(containerId, titleId, spec) {
  document.getElementById(titleId).textContent = spec.title;
  const el = document.getElementById(containerId);
  const points = spec.series.flatMap(s => s.points);

  if (points.length === 0) {
    el.innerHTML = '<div class="empty">No launches in this payload range</div>';
    return;
  }

  const W = 960, H = 360, pad = { l: 60, r: 20, t: 20, b: 50 };
  const xs = points.map(p => p.x), ys = points.map(p => p.y);
  let xMin = Math.min(...xs), xMax = Math.max(...xs);
  if (xMin === xMax) { xMin -= 500; xMax += 500; }
  const yMin = Math.min(0, ...ys), yMax = Math.max(1, ...ys);
  const sx = x => pad.l + (x - xMin) / (xMax - xMin) * (W - pad.l - pad.r);
  const sy = y => H - pad.b - (y - yMin) / (yMax - yMin) * (H - pad.t - pad.b);

  const axes =
    `<line class="axis" x1="${pad.l}" y1="${H - pad.b}" x2="${W - pad.r}" y2="${H - pad.b}"/>` +
    `<line class="axis" x1="${pad.l}" y1="${pad.t}" x2="${pad.l}" y2="${H - pad.b}"/>` +
    `<text class="muted" x="${(W + pad.l) / 2}" y="${H - 12}" text-anchor="middle">${esc(spec.x)}</text>` +
    `<text class="muted" x="16" y="${(H - pad.b) / 2}" transform="rotate(-90 16 ${(H - pad.b) / 2})" text-anchor="middle">${esc(spec.y)}</text>` +
    `<text class="muted" x="${pad.l}" y="${H - pad.b + 16}" text-anchor="middle">${xMin}</text>` +
    `<text class="muted" x="${W - pad.r}" y="${H - pad.b + 16}" text-anchor="end">${xMax}</text>` +
    [0, 1].map(v => `<text class="muted" x="${pad.l - 8}" y="${sy(v) + 4}" text-anchor="end">${v}</text>`).join('');

  const dots = spec.series.map((s, i) => {
    const color = PALETTE[i % PALETTE.length];
    return s.points.map(p =>
      `<circle cx="${sx(p.x)}" cy="${sy(p.y)}" r="6" fill="${color}" fill-opacity="0.8">` +
      `<title>${esc(s.name)}: ${p.x} kg, class ${p.y}</title></circle>`
    ).join('');
  }).join('');

  el.innerHTML =
    `<svg viewBox="0 0 ${W} ${H}" width="100%">${axes}${dots}</svg>` +
    legend(spec.series.map((s, i) => [`${spec.color}: ${s.name}`, PALETTE[i % PALETTE.length]]));
}

// ---------------------------------------------------------------------------
// Utility
// ---------------------------------------------------------------------------
function legend(items) {
  return '<div class="legend">' +
    items.map(([label, color]) => `<span style="--swatch:${color}">${esc(label)}</span>`).join('') +
    '</div>';
}

function esc(s) {
  if (s === undefined || s === null) return '';
  return String(s).replace(/&/g,'&amp;').replace(/</g,'&lt;').replace(/>/g,'&gt;').replace(/"/g,'&quot;');
}

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
init();
</script>
</body>
</html>"##;

#[cfg(test)]
mod tests {
    use super::INDEX_HTML;

    #[test]
    fn slider_step_comes_from_layout() {
        assert!(INDEX_HTML.contains("el.step = s.step;"));
        assert!(!INDEX_HTML.contains("el.step = 'any'"));
    }

    #[test]
    fn stale_chart_responses_are_dropped() {
        assert!(INDEX_HTML.contains("const seq = ++requestSeq['success-pie-chart'];"));
        assert!(INDEX_HTML.contains("if (seq === requestSeq['success-pie-chart'])"));
        assert!(
            INDEX_HTML.contains("if (seq === requestSeq['success-payload-scatter-chart'])")
        );
    }
}
