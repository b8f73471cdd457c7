//! Plain-text and JSON rendering of query results.

use anyhow::Result;
use chips_core::{BrokerSummary, ResultSet};
use chips_ledger::binning::{concentration, price_histogram};

/// Output switches from the command line.
pub struct RenderOptions {
    pub json: bool,
    /// Summary rows to print, 0 = all.
    pub top: usize,
    pub bin_width: Option<f64>,
    pub concentration_top: usize,
}

pub fn print_result(stock: &str, result: &ResultSet, opts: &RenderOptions) -> Result<()> {
    let rows = if opts.top == 0 { result.summary.len() } else { opts.top.min(result.summary.len()) };
    let conc = concentration(&result.summary, opts.concentration_top);
    let histogram = opts.bin_width.map(|w| price_histogram(&result.details, w)).transpose()?;

    if opts.json {
        let mut out = serde_json::Map::new();
        out.insert("stock".into(), stock.into());
        out.insert("records".into(), result.details.len().into());
        out.insert("brokers".into(), result.summary.len().into());
        out.insert("summary".into(), serde_json::to_value(&result.summary[..rows])?);
        out.insert("concentration".into(), serde_json::to_value(&conc)?);
        if let Some(bins) = &histogram {
            out.insert("histogram".into(), serde_json::to_value(bins)?);
        }
        println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(out))?);
        return Ok(());
    }

    println!(
        "{stock}: {} record(s), {} broker(s), top-{} concentration {:.2}%",
        result.details.len(),
        result.summary.len(),
        conc.top_n,
        conc.ratio * 100.0
    );
    println!(
        "{:<20} {:>12} {:>12} {:>12} {:>10} {:>10}",
        "broker", "buy", "sell", "net", "avg buy", "avg sell"
    );
    for s in &result.summary[..rows] {
        println!("{}", summary_row(s));
    }

    if let Some(bins) = histogram {
        println!();
        println!("{:>10} {:>10} {:>12} {:>12}", "from", "to", "buy", "sell");
        for b in bins {
            println!("{:>10.2} {:>10.2} {:>12} {:>12}", b.lower, b.upper, b.buy_volume, b.sell_volume);
        }
    }
    Ok(())
}

fn summary_row(s: &BrokerSummary) -> String {
    format!(
        "{:<20} {:>12} {:>12} {:>12} {:>10.2} {:>10.2}",
        s.broker, s.buy_volume, s.sell_volume, s.net_volume, s.avg_buy_price, s.avg_sell_price
    )
}
