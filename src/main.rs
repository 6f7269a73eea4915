//! Tax microsimulation CLI
//!
//! Loads a filer-table CSV, optionally applies a policy reform, advances to
//! the requested calendar year and prints weighted aggregates.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use taxsim::{load_records, parse_reform, report, Calculator, Policy};

#[derive(Parser, Debug)]
#[command(name = "taxsim", about = "Federal individual tax microsimulation")]
struct Cli {
    /// Filer-table CSV input
    #[arg(long)]
    records: PathBuf,

    /// Calendar year the input data describes
    #[arg(long, default_value_t = 2013)]
    data_year: u32,

    /// Policy reform JSON file to apply
    #[arg(long)]
    reform: Option<PathBuf>,

    /// Calendar year to simulate
    #[arg(long)]
    year: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let records = load_records(&cli.records, cli.data_year)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("loading records from {}", cli.records.display()))?;

    let mut policy = Policy::new();
    let target = cli.year.unwrap_or(cli.data_year).max(policy.start_year());
    policy
        .set_year(target)
        .with_context(|| format!("projecting parameters to {target}"))?;
    if let Some(path) = &cli.reform {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading reform file {}", path.display()))?;
        let reform = parse_reform(&text).context("parsing reform file")?;
        policy.implement_reform(&reform).context("applying reform")?;
    }

    let mut calc =
        Calculator::new(policy, records).context("binding records to the parameter store")?;
    calc.calc_all();

    println!("taxsim v0.1.0");
    println!("=============\n");
    println!("Year: {}", calc.current_year());
    println!("Filing units (weighted): {:.0}", {
        let r = calc.records();
        r.weight.iter().sum::<f64>()
    });
    println!();

    let r = calc.records();
    let rows = [
        ("Income tax", "iitax"),
        ("Payroll tax", "payrolltax"),
        ("Combined liability", "combined"),
        ("Refundable payouts", "refund"),
        ("Expanded income", "expanded_income"),
        ("After-tax income", "aftertax_income"),
    ];
    println!("{:<22} {:>18} {:>14}", "Aggregate", "Weighted total", "Mean");
    println!("{}", "-".repeat(56));
    for (label, column) in rows {
        let total = report::weighted_total(r, column).map_err(|e| anyhow::anyhow!("{e}"))?;
        let mean = report::weighted_mean(r, column).map_err(|e| anyhow::anyhow!("{e}"))?;
        println!("{label:<22} {total:>18.2} {mean:>14.2}");
    }

    Ok(())
}
