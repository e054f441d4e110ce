//! Dashboard JavaScript
//!
//! Client-side logic for the analyzer dashboard:
//! - Loads the instrument catalog into the selectors
//! - Fetches normalized candles and renders them on a canvas
//! - Shows the latest price and skipped-record diagnostics
//! - Sends analyze requests and displays the opaque model text
//! - Auto-refresh every 60 seconds (server cache bounds upstream calls)

pub const SCRIPT: &str = r#"
// ============================================================================
// Configuration
// ============================================================================
const CONFIG = {
    refreshInterval: 60000,  // 60 seconds
    apiBase: ''
};

const COLORS = {
    up: '#3fb950',
    down: '#f85149',
    grid: '#30363d',
    label: '#8b949e'
};

// ============================================================================
// State
// ============================================================================
let lastSeries = null;

// ============================================================================
// API Functions
// ============================================================================
async function fetchJSON(endpoint, options) {
    try {
        const res = await fetch(CONFIG.apiBase + endpoint, options);
        return await res.json();
    } catch (e) {
        console.error(`Error fetching ${endpoint}:`, e);
        return null;
    }
}

// ============================================================================
// Formatting Utilities
// ============================================================================
function formatPrice(value) {
    if (value == null || isNaN(value)) return '$--';
    return '$' + Number(value).toLocaleString('en-US', {
        minimumFractionDigits: 2,
        maximumFractionDigits: value < 1 ? 5 : 2
    });
}

function selectedParams() {
    return {
        symbol: document.getElementById('coinSelect').value,
        granularity: document.getElementById('tfSelect').value
    };
}

// ============================================================================
// Chart Rendering
// ============================================================================
function drawChart(candles) {
    const canvas = document.getElementById('candleChart');
    const ctx = canvas.getContext('2d');
    canvas.width = canvas.clientWidth;
    const w = canvas.width, h = canvas.height;
    ctx.clearRect(0, 0, w, h);

    if (!candles || candles.length === 0) {
        ctx.fillStyle = COLORS.label;
        ctx.font = '14px sans-serif';
        ctx.textAlign = 'center';
        ctx.fillText('No candlestick data available.', w / 2, h / 2);
        return;
    }

    const padLeft = 64, padRight = 12, padTop = 12, padBottom = 28;
    const plotW = w - padLeft - padRight;
    const plotH = h - padTop - padBottom;

    let min = Infinity, max = -Infinity;
    for (const c of candles) {
        if (c.low < min) min = c.low;
        if (c.high > max) max = c.high;
    }
    const span = (max - min) || 1;
    const y = (price) => padTop + (max - price) / span * plotH;

    // Horizontal grid + price labels
    ctx.strokeStyle = COLORS.grid;
    ctx.fillStyle = COLORS.label;
    ctx.font = '11px sans-serif';
    ctx.textAlign = 'right';
    ctx.lineWidth = 1;
    for (let i = 0; i <= 4; i++) {
        const price = max - span * i / 4;
        const gy = y(price);
        ctx.beginPath();
        ctx.moveTo(padLeft, gy);
        ctx.lineTo(w - padRight, gy);
        ctx.stroke();
        ctx.fillText(formatPrice(price), padLeft - 6, gy + 4);
    }

    // Candles
    const step = plotW / candles.length;
    const bodyW = Math.max(1, Math.min(12, step * 0.6));
    candles.forEach((c, i) => {
        const x = padLeft + step * (i + 0.5);
        const color = c.close >= c.open ? COLORS.up : COLORS.down;

        ctx.strokeStyle = color;
        ctx.beginPath();
        ctx.moveTo(x, y(c.high));
        ctx.lineTo(x, y(c.low));
        ctx.stroke();

        ctx.fillStyle = color;
        const top = y(Math.max(c.open, c.close));
        const bottom = y(Math.min(c.open, c.close));
        ctx.fillRect(x - bodyW / 2, top, bodyW, Math.max(1, bottom - top));
    });

    // Time axis: first, middle, last
    ctx.fillStyle = COLORS.label;
    ctx.textAlign = 'center';
    [0, Math.floor(candles.length / 2), candles.length - 1].forEach((i) => {
        const x = padLeft + step * (i + 0.5);
        const t = new Date(candles[i].time);
        ctx.fillText(t.toLocaleDateString() + ' ' + t.toLocaleTimeString([], {hour: '2-digit', minute: '2-digit'}), x, h - 8);
    });
}

// ============================================================================
// UI Update Functions
// ============================================================================
function updateTimestamp() {
    document.getElementById('refreshTime').textContent = 'Updated: ' + new Date().toLocaleTimeString();
}

function updateChartCard(data) {
    const note = document.getElementById('chartNote');

    if (!data || data.error) {
        lastSeries = null;
        drawChart([]);
        document.getElementById('lastPrice').textContent = '$--';
        note.textContent = data && data.error
            ? `Failed to load candles (${data.error.kind}): ${data.error.message}`
            : 'Failed to load candles.';
        return;
    }

    lastSeries = data;
    drawChart(data.candles);
    document.getElementById('lastPrice').textContent = formatPrice(data.last_price);
    document.getElementById('chartTitle').textContent =
        `📊 ${data.symbol} — ${data.granularity.toUpperCase()} (${data.exchange})`;
    document.getElementById('sourceBadge').textContent = data.exchange;

    const parts = [`${data.count} candles`];
    if (data.skipped > 0) parts.push(`${data.skipped} malformed record(s) skipped`);
    if (data.cached) parts.push('served from cache');
    note.textContent = parts.join(' · ');
}

// ============================================================================
// Actions
// ============================================================================
async function loadInstruments() {
    const catalog = await fetchJSON('/api/instruments');
    if (!catalog) return;

    const coinSelect = document.getElementById('coinSelect');
    coinSelect.innerHTML = catalog.instruments.map(i =>
        `<option value='${i.symbol}'>${i.name}</option>`
    ).join('');

    const tfSelect = document.getElementById('tfSelect');
    tfSelect.innerHTML = catalog.granularities.map(g =>
        `<option value='${g.id}'>${g.label}</option>`
    ).join('');

    document.getElementById('sourceBadge').textContent = catalog.exchange;
}

async function refreshChart() {
    const btn = document.getElementById('refreshBtn');
    btn.disabled = true;

    const p = selectedParams();
    const data = await fetchJSON(`/api/candles?symbol=${encodeURIComponent(p.symbol)}&granularity=${p.granularity}`);
    updateChartCard(data);
    updateTimestamp();

    btn.disabled = false;
}

async function analyzeMarket() {
    const btn = document.getElementById('analyzeBtn');
    const box = document.getElementById('analysisBox');
    btn.disabled = true;
    btn.textContent = '⏳ Analyzing...';
    box.classList.remove('error');
    box.textContent = 'Analyzing recent price action...';

    const result = await fetchJSON('/api/analyze', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(selectedParams())
    });

    if (result && result.analysis) {
        box.textContent = result.analysis;
    } else {
        box.classList.add('error');
        box.textContent = result && result.error
            ? `❌ Analysis failed (${result.error.kind}): ${result.error.message}`
            : '❌ Analysis failed.';
    }

    btn.disabled = false;
    btn.textContent = '📊 Analyze Market';
}

// ============================================================================
// Initialization
// ============================================================================
(async function init() {
    await loadInstruments();
    await refreshChart();
    setInterval(refreshChart, CONFIG.refreshInterval);
})();

window.addEventListener('resize', () => { if (lastSeries) drawChart(lastSeries.candles); });
"#;
