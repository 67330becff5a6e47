//! Embedded HTML/JS page for the local optimization playground.
//!
//! Compiled into the binary as a string constant. No external assets.

/// The playground page.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>greencode playground</title>
<style>
body { font-family: -apple-system, 'Segoe UI', Helvetica, Arial, sans-serif; max-width: 1100px; margin: 0 auto; padding: 24px; }
textarea, pre { width: 100%; min-height: 260px; font-family: 'SF Mono', 'Fira Code', monospace; font-size: 13px; }
.row { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.error { color: #c62828; }
.warning { color: #b7791f; }
</style>
</head>
<body>
<h1>greencode playground</h1>
<p>
  <label>Model <select id="model"></select></label>
  <label>Context
    <select id="context">
      <option value="energy_efficiency">Energy efficiency</option>
      <option value="performance">Performance</option>
      <option value="memory_efficiency">Memory efficiency</option>
      <option value="readability">Readability</option>
    </select>
  </label>
  <button id="optimize">Optimize Code</button>
</p>
<p id="message"></p>
<div class="row">
  <textarea id="code" placeholder="Enter your Python code here..."></textarea>
  <div>
    <strong id="label">Optimized</strong>
    <span id="variants" hidden>
      <button data-variant="base">Base</button>
      <button data-variant="fast">Speed Optimized</button>
      <button data-variant="green">Energy Optimized</button>
    </span>
    <pre id="output"></pre>
  </div>
</div>
<p id="metrics"></p>
<script>
const $ = (id) => document.getElementById(id);

async function call(method, path, body) {
  const resp = await fetch(path, {
    method,
    headers: { 'Content-Type': 'application/json' },
    body: body ? JSON.stringify(body) : undefined,
  });
  return { ok: resp.ok, data: await resp.json() };
}

function showMessage(text, cls) {
  $('message').textContent = text || '';
  $('message').className = cls || '';
}

function render(view) {
  $('output').textContent = view.displayed_code || '';
  $('label').textContent = view.label || 'Optimized';
  $('variants').hidden = !view.has_variants;
  const r = view.result;
  if (r && r.score) {
    const energy = r.savings_percent_by_dimension.energy;
    $('metrics').textContent =
      `GreenScore ${r.score.original} -> ${r.score.optimized} (+${r.score.improvement})` +
      (energy !== undefined ? `, energy -${energy}%` : '');
  }
}

async function loadModels() {
  const { data } = await call('GET', '/api/models');
  for (const m of data.models) {
    const opt = document.createElement('option');
    opt.value = m.key;
    opt.textContent = m.display_name;
    opt.disabled = m.status === 'pending';
    opt.selected = m.key === data.default_model;
    $('model').appendChild(opt);
  }
}

$('optimize').addEventListener('click', async () => {
  $('optimize').disabled = true;
  showMessage('Optimizing...');
  const { ok, data } = await call('POST', '/api/optimize', {
    code: $('code').value,
    context: $('context').value,
    model: $('model').value,
  });
  $('optimize').disabled = false;
  if (!ok) { showMessage(data.error, 'error'); return; }
  showMessage(data.result && data.result.warning, 'warning');
  render(data);
});

document.querySelectorAll('[data-variant]').forEach((btn) => {
  btn.addEventListener('click', async () => {
    const { data } = await call('POST', '/api/variant', { which: btn.dataset.variant });
    $('output').textContent = data.displayed_code;
    $('label').textContent = data.label;
  });
});

loadModels();
call('GET', '/api/state').then(({ data }) => render(data));
</script>
</body>
</html>
"##;
