use meterlog_core::service::dto::{DatasetView, YearBars};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Consumption")]
    total: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Forecast")]
    forecast: String,
}

pub fn print_view(view: &DatasetView) {
    println!("\n\x1b[1;36m{}\x1b[0m", view.name);
    println!("{}", view.stats);

    if let Some(f) = &view.forecast {
        println!(
            "Forecast {}-{:02}: {:.0} so far after {}/{} days, ~{:.0} by month end (reading {:.0})",
            f.year,
            f.month,
            f.consumed_so_far,
            f.elapsed_days,
            f.days_in_month,
            f.projected_month_total,
            f.projected_end_value,
        );
    }

    for bars in &view.bars {
        print_year(bars);
    }
}

fn print_year(bars: &YearBars) {
    println!("\n\x1b[1m{}\x1b[0m (Total: {:.0})", bars.year, bars.total);

    let rows: Vec<MonthRow> = bars
        .months
        .iter()
        .enumerate()
        .map(|(m, total)| {
            let change = match bars.deltas[m] {
                Some(pct) if pct >= 0.0 => format!("↑ +{:.0}%", pct),
                Some(pct) => format!("↓ {:.0}%", pct),
                None if m == 0 => String::new(),
                None => "—".to_string(),
            };
            let forecast = bars
                .forecast
                .filter(|f| f.month as usize == m + 1)
                .map(|f| format!("~{:.0}", f.projected_total))
                .unwrap_or_default();
            MonthRow {
                month: MONTH_NAMES[m].to_string(),
                total: format!("{:.1}", total),
                change,
                forecast,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}
