//! estimate-engine CLI
//!
//! Run property estimates from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Estimate from a JSON input file
//! estimate-engine estimate --input deal.json
//!
//! # Output as JSON
//! estimate-engine estimate --input deal.json --format json
//!
//! # Sale-price sensitivity
//! estimate-engine sensitivity --input deal.json
//!
//! # Show the effective rate tables
//! estimate-engine rates --rates rates.json --schedule schedule.json
//! ```

use estimate_engine::core::input::EstimateInput;
use estimate_engine::core::money::{format_eur, format_rate};
use estimate_engine::engine::EstimateEngine;
use estimate_engine::rates::repository::{RateRepository, RepositoryConfig};
use estimate_engine::simulation::sensitivity::{SensitivityConfig, SensitivityReport};
use serde::Serialize;
use std::fs;
use std::process;
use std::sync::Arc;

fn print_usage() {
    eprintln!(
        r#"estimate-engine — acquisition cost and margin estimates for French property deals

USAGE:
    estimate-engine <COMMAND> [OPTIONS]

COMMANDS:
    estimate      Compute transfer tax, notary fees, VAT and margins
    sensitivity   Shock the target sale price and compare net margins
    rates         Print the effective rate table and notary schedule
    help          Show this message

OPTIONS (estimate, sensitivity):
    --input <FILE>      Path to JSON estimate input
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (all commands):
    --rates <FILE>      Transfer-tax rate file (default: $ESTIMATE_RATES_PATH or built-in)
    --schedule <FILE>   Notary schedule file (default: $ESTIMATE_NOTARY_SCHEDULE_PATH or built-in)

EXAMPLES:
    estimate-engine estimate --input deal.json
    estimate-engine estimate --input deal.json --format json
    estimate-engine sensitivity --input deal.json --rates rates.json
    estimate-engine rates"#
    );
}

#[derive(Debug, Default)]
struct Options {
    input: Option<String>,
    format: Option<String>,
    rates: Option<String>,
    schedule: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Self {
        let mut options = Options::default();
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            i += 1;
            let value = args.get(i).cloned();
            let slot = match flag {
                "--input" => &mut options.input,
                "--format" => &mut options.format,
                "--rates" => &mut options.rates,
                "--schedule" => &mut options.schedule,
                _ => {
                    eprintln!("Unknown option: {}", flag);
                    process::exit(1);
                }
            };
            *slot = Some(value.unwrap_or_else(|| {
                eprintln!("{} requires a value", flag);
                process::exit(1);
            }));
            i += 1;
        }
        options
    }

    fn json(&self) -> bool {
        match self.format.as_deref() {
            None | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                eprintln!("--format requires 'text' or 'json', got '{}'", other);
                process::exit(1);
            }
        }
    }

    /// Command-line paths override the environment.
    fn repository(&self) -> RateRepository {
        let mut config = RepositoryConfig::from_env();
        if let Some(path) = &self.rates {
            config = config.with_rates_path(path);
        }
        if let Some(path) = &self.schedule {
            config = config.with_schedule_path(path);
        }
        RateRepository::load(&config)
    }

    fn engine(&self) -> EstimateEngine {
        EstimateEngine::new(Arc::new(self.repository()))
    }

    fn load_input(&self) -> EstimateInput {
        let path = self.input.as_deref().unwrap_or_else(|| {
            eprintln!("Error: --input <FILE> is required");
            process::exit(1);
        });
        let content = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading file '{}': {}", path, e);
            process::exit(1);
        });
        let input: EstimateInput = serde_json::from_str(&content).unwrap_or_else(|e| {
            eprintln!("Error parsing JSON: {}", e);
            eprintln!("Expected format:");
            eprintln!(
                r#"{{
  "department": "75",
  "vat_regime": "MARGIN",
  "purchase_price_gross": "300000",
  "target_sale_price_gross": "520000",
  "renovation_cost_gross": "80000",
  "agency_fee_gross": "15000",
  "assumptions": {{ "reduced_dealer_rate_eligible": true }}
}}"#
            );
            process::exit(1);
        });
        if let Err(e) = input.validate() {
            eprintln!("Invalid input: {}", e);
            process::exit(1);
        }
        input
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn cmd_estimate(args: &[String]) {
    let options = Options::parse(args);
    let json = options.json();
    let input = options.load_input();
    let output = options.engine().estimate(&input);

    if json {
        print_json(&output);
    } else {
        println!("{}", output);
    }
}

fn cmd_sensitivity(args: &[String]) {
    let options = Options::parse(args);
    let json = options.json();
    let input = options.load_input();
    let report = SensitivityReport::run(&options.engine(), &input, &SensitivityConfig::default());

    if json {
        print_json(&report);
    } else {
        println!("{}", report);
    }
}

fn cmd_rates(args: &[String]) {
    let options = Options::parse(args);
    let repository = options.repository();

    if options.json() {
        #[derive(Serialize)]
        struct RatesOutput<'a> {
            rates: &'a estimate_engine::rates::table::RateTable,
            schedule: &'a estimate_engine::rates::schedule::NotaryFeeSchedule,
        }
        print_json(&RatesOutput {
            rates: repository.rates(),
            schedule: repository.schedule(),
        });
        return;
    }

    let rates = repository.rates();
    println!("=== Transfer Tax Rates ===");
    println!("Default rate:          {}", format_rate(rates.default_rate));
    println!("Reduced dealer rate:   {}", format_rate(rates.reduced_dealer_rate));
    for (department, rate) in &rates.departments {
        println!("  Department {:<4} {}", department.as_str(), format_rate(*rate));
    }

    let schedule = repository.schedule();
    println!();
    println!("=== Notary Schedule (effective {}) ===", schedule.effective_from);
    for bracket in &schedule.brackets {
        let range = match bracket.upper {
            Some(upper) => format!("{} to {}", format_eur(bracket.lower), format_eur(upper)),
            None => format!("Above {}", format_eur(bracket.lower)),
        };
        println!("  {:<32} {}", range, format_rate(bracket.rate));
    }
    println!(
        "Security contribution: {}",
        format_rate(schedule.security_contribution_rate)
    );
    println!("Flat disbursement:     {}", format_eur(schedule.flat_disbursement));
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "estimate" => cmd_estimate(rest),
        "sensitivity" => cmd_sensitivity(rest),
        "rates" => cmd_rates(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
