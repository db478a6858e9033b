use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use quarry_core::Params;
use quarry_query::{Query, Sort};
use serde::Serialize;
use tracing::{debug, info};

mod ops;

use ops::Op;

#[derive(Parser, Debug)]
#[command(name = "quarryctl", version, about = "Inspect and transform search query strings")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    /// Prefix of this query's field names inside the location
    #[arg(long = "prefix", env = "QUARRY_PREFIX", global = true, default_value = "")]
    prefix: String,

    /// Fixed context parameters as a query string; merged into reads, never into the location
    #[arg(long = "context", env = "QUARRY_CONTEXT", global = true, default_value = "")]
    context: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe the query held in a location
    Show {
        /// Query string, e.g. "?q=acme&filter:schema=Person"
        location: String,
    },
    /// Apply operations in order and describe the result
    Apply {
        location: String,
        /// Operations, e.g. set:q=acme filter:countries=us facet:countries sort:dates limit:50
        #[arg(required = true)]
        ops: Vec<Op>,
    },
    /// Tell whether two locations hold the same query
    Diff { a: String, b: String },
}

#[derive(Debug, Serialize)]
struct Report {
    fields: Vec<String>,
    filters: Vec<String>,
    facets: Vec<String>,
    sort: Option<Sort>,
    has_query: bool,
    location: String,
    params: Params,
    request: String,
}

impl Report {
    fn of(query: &Query) -> Self {
        Self {
            fields: query.fields(),
            filters: query.filters(),
            facets: query.facets().into_vec(),
            sort: query.get_sort(),
            has_query: query.has_query(),
            location: query.to_location(),
            params: query.to_params(),
            request: query.to_string(),
        }
    }

    fn print_human(&self) {
        println!("location: {}", self.location);
        println!("request:  {}", self.request);
        println!("fields:   {}", self.fields.join(", "));
        if !self.filters.is_empty() {
            println!("filters:  {}", self.filters.join(", "));
        }
        if !self.facets.is_empty() {
            println!("facets:   {}", self.facets.join(", "));
        }
        match &self.sort {
            Some(sort) => println!("sort:     {}", sort),
            None => println!("sort:     -"),
        }
        println!("PARAM                          VALUES");
        for (name, values) in self.params.iter() {
            println!("{:<30} {}", name, values.join(" | "));
        }
    }
}

fn init_tracing() {
    let env = std::env::var("QUARRY_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn emit(output: Output, report: &Report) -> Result<()> {
    match output {
        Output::Human => report.print_human(),
        Output::Json => println!("{}", serde_json::to_string_pretty(report).context("encoding report as json")?),
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let context = Params::parse(&cli.context);
    debug!(context = %context, prefix = %cli.prefix, "context loaded");

    match cli.command {
        Commands::Show { location } => {
            info!(location = %location, "show invoked");
            let query = Query::from_location(&location, context, cli.prefix.as_str());
            emit(cli.output, &Report::of(&query))?;
        }
        Commands::Apply { location, ops } => {
            info!(location = %location, ops = ops.len(), "apply invoked");
            let start = Query::from_location(&location, context, cli.prefix.as_str());
            let query = ops.iter().fold(start, |q, op| {
                debug!(op = ?op, "applying");
                op.apply(&q)
            });
            emit(cli.output, &Report::of(&query))?;
        }
        Commands::Diff { a, b } => {
            info!(a = %a, b = %b, "diff invoked");
            let qa = Query::from_location(&a, context.clone(), cli.prefix.as_str());
            let qb = Query::from_location(&b, context, cli.prefix.as_str());
            let same = qa.same_as(&qb);
            match cli.output {
                Output::Human => println!("{}", if same { "same" } else { "different" }),
                Output::Json => {
                    #[derive(Serialize)]
                    struct Diff<'a> { same: bool, a: &'a str, b: &'a str }
                    let (la, lb) = (qa.to_location(), qb.to_location());
                    let out = Diff { same, a: &la, b: &lb };
                    println!("{}", serde_json::to_string_pretty(&out).context("encoding diff as json")?);
                }
            }
        }
    }

    Ok(())
}
