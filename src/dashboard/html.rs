//! Dashboard HTML template
//!
//! Contains the main page structure including:
//! - Header with title and refresh control
//! - Asset and timeframe selectors
//! - Candlestick chart canvas with latest-price banner
//! - AI analysis card with trigger button

pub const TEMPLATE: &str = r#"
    <div class="container">
        <header>
            <div>
                <h1>💹 Crypto Analyzer Pro</h1>
                <span class="refresh-time" id="refreshTime">Loading...</span>
            </div>
            <div class="header-controls">
                <span class="status-badge" id="sourceBadge">--</span>
                <button class="btn btn-secondary" onclick="refreshChart()" id="refreshBtn">🔄 Refresh</button>
            </div>
        </header>

        <div class="grid">
            <!-- Selectors -->
            <div class="card wide">
                <div class="selectors">
                    <div class="selector">
                        <label for="coinSelect">Asset</label>
                        <select id="coinSelect" onchange="refreshChart()"></select>
                    </div>
                    <div class="selector">
                        <label for="tfSelect">Timeframe</label>
                        <select id="tfSelect" onchange="refreshChart()"></select>
                    </div>
                </div>
            </div>

            <!-- Chart -->
            <div class="card wide">
                <div class="card-header">
                    <span class="card-title" id="chartTitle">📊 Candlestick Chart</span>
                    <span class="price-banner" id="lastPrice">$--</span>
                </div>
                <canvas id="candleChart" height="420"></canvas>
                <div class="chart-note" id="chartNote"></div>
            </div>

            <!-- AI Analysis -->
            <div class="card wide">
                <div class="card-header">
                    <span class="card-title">🤖 AI Market Analysis</span>
                    <button class="btn btn-primary" onclick="analyzeMarket()" id="analyzeBtn">📊 Analyze Market</button>
                </div>
                <div class="analysis-box" id="analysisBox">
                    Press "Analyze Market" for an AI read of recent price action (trend, entry, SL, TP).
                </div>
            </div>
        </div>
    </div>
"#;
