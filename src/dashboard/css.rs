//! Dashboard CSS styles
//!
//! Contains all styling for the analyzer dashboard UI.
//! Uses CSS custom properties (variables) for theming.

pub const STYLES: &str = r"
* { box-sizing: border-box; margin: 0; padding: 0; }

:root {
    --bg: #0d1117;
    --card: #161b22;
    --border: #30363d;
    --text: #e6edf3;
    --text-dim: #8b949e;
    --green: #3fb950;
    --green-strong: #238636;
    --red: #f85149;
    --blue: #58a6ff;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg);
    color: var(--text);
    padding: 20px;
    min-height: 100vh;
}

.container { max-width: 1100px; margin: 0 auto; }

/* Header */
header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 24px;
    padding-bottom: 16px;
    border-bottom: 1px solid var(--border);
}

h1 { font-size: 24px; font-weight: 600; color: #f0f6fc; }

.header-controls {
    display: flex;
    align-items: center;
    gap: 12px;
}

.refresh-time { font-size: 12px; color: var(--text-dim); }

/* Source Badge */
.status-badge {
    padding: 6px 12px;
    border-radius: 20px;
    font-size: 12px;
    font-weight: 600;
    text-transform: uppercase;
    background: rgba(88, 166, 255, 0.2);
    color: var(--blue);
}

/* Buttons */
.btn {
    padding: 8px 16px;
    border-radius: 8px;
    border: none;
    font-size: 13px;
    font-weight: 600;
    cursor: pointer;
    transition: all 0.2s;
}

.btn:disabled { opacity: 0.6; cursor: not-allowed; }
.btn-primary { background: var(--green-strong); color: #fff; }
.btn-primary:hover:not(:disabled) { background: #2ea043; }
.btn-secondary { background: var(--border); color: var(--text); }
.btn-secondary:hover:not(:disabled) { background: #3d444d; }

/* Grid Layout */
.grid {
    display: grid;
    grid-template-columns: 1fr;
    gap: 16px;
}

.wide { grid-column: 1 / -1; }

/* Cards */
.card {
    background: var(--card);
    border: 1px solid var(--border);
    border-radius: 12px;
    padding: 20px;
}

.card-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 16px;
}

.card-title {
    font-size: 14px;
    color: var(--text-dim);
    text-transform: uppercase;
    letter-spacing: 0.5px;
}

/* Selectors */
.selectors { display: flex; gap: 24px; flex-wrap: wrap; }
.selector { flex: 1; min-width: 220px; }
.selector label {
    display: block;
    font-size: 12px;
    color: var(--text-dim);
    text-transform: uppercase;
    margin-bottom: 6px;
}
.selector select {
    width: 100%;
    padding: 10px;
    border-radius: 8px;
    border: 1px solid var(--border);
    background: var(--bg);
    color: var(--text);
    font-size: 14px;
}

/* Chart */
#candleChart { width: 100%; display: block; }
.chart-note { font-size: 12px; color: var(--text-dim); margin-top: 8px; }

.price-banner {
    font-size: 20px;
    font-weight: 700;
    color: var(--blue);
}

/* Analysis */
.analysis-box {
    background: rgba(88, 166, 255, 0.06);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 16px;
    font-size: 14px;
    line-height: 1.6;
    white-space: pre-wrap;
    min-height: 60px;
}

.analysis-box.error { border-color: var(--red); color: var(--red); }

/* Responsive */
@media (max-width: 600px) {
    header { flex-direction: column; gap: 12px; }
    .header-controls { flex-wrap: wrap; justify-content: center; }
    .selectors { flex-direction: column; }
}
";
