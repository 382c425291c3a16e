//! inventory: deserialize warehouse stock documents into typed records
//!
//! Usage:
//!   # Print the extraction plan of the declared types
//!   cargo run --example inventory -- --plan
//!
//!   # Read one document from a file
//!   cargo run --example inventory -- stock.json
//!
//!   # Read newline-delimited documents from stdin
//!   cat stock.jsonl | cargo run --example inventory -- --ndjson
//!
//! Set `RUST_LOG=anvil=trace` to see plan resolution.

use anvil::{
    Compiled, DeserializeConfig, Deserializer, Directive, ElementKind, Grid, IndexMap, Schema,
    Serializable, Value,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufRead, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "inventory")]
#[command(about = "Deserialize warehouse stock documents", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited JSON (one document per line)
    #[arg(long)]
    ndjson: bool,

    /// Print the extraction plan and exit
    #[arg(long)]
    plan: bool,

    /// Maximum document nesting depth (default: 128)
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Debug, Default)]
struct Bin {
    code: String,
    quantity: i32,
}

impl Serializable for Bin {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema
            .field("code", |b| &mut b.code)
            .field_with("quantity", |b| &mut b.quantity, &[Directive::rename("qty")])
    }
}

#[derive(Debug, Default)]
struct Stock {
    warehouse: String,
    aisles: Box<[char]>,
    bins: Vec<Bin>,
    shelves: Grid<i32>,
    by_sku: IndexMap<String, Bin>,
    attributes: IndexMap<String, Value>,
    overflow: Option<Bin>,
    checksum: String,
}

impl Serializable for Stock {
    fn declare(schema: Schema<Self>) -> Schema<Self> {
        schema
            .field_with("warehouse", |s| &mut s.warehouse, &[Directive::json_name("site")])
            .field_with("aisles", |s| &mut s.aisles, &[Directive::array(ElementKind::Char)])
            .field_with("bins", |s| &mut s.bins, &[Directive::array(ElementKind::Other)])
            .field_with("shelves", |s| &mut s.shelves, &[Directive::array_2d(ElementKind::Int)])
            .field_with("by_sku", |s| &mut s.by_sku, &[Directive::dictionary()])
            .field_with("attributes", |s| &mut s.attributes, &[Directive::dynamic_dictionary()])
            .field("overflow", |s| &mut s.overflow)
            .field_with("checksum", |s| &mut s.checksum, &[Directive::Ignore])
    }
}

anvil::impl_serializable!(Bin, Stock);

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.plan {
        let plan = Stock::plan().context("Stock does not declare a valid schema")?;
        println!("{}", serde_json::to_string_pretty(&plan.to_json())?);
        return Ok(());
    }

    let mut config = DeserializeConfig::default();
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }
    let deserializer = Deserializer::new(config);

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {path}"))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    if args.ndjson {
        for (record, stock) in deserializer.from_lines::<Stock, _>(reader).enumerate() {
            match stock {
                Ok(stock) => print_stock(&stock),
                Err(err) => eprintln!("record {}: {err}", record + 1),
            }
        }
    } else {
        let stock: Stock = deserializer.from_reader(reader)?;
        print_stock(&stock);
    }

    Ok(())
}

fn print_stock(stock: &Stock) {
    println!("{}: {} bins, {} skus", stock.warehouse, stock.bins.len(), stock.by_sku.len());
    for row in stock.shelves.iter_rows() {
        println!("  shelf {row:?}");
    }
    if let Some(overflow) = &stock.overflow {
        println!("  overflow {} x{}", overflow.code, overflow.quantity);
    }
    println!("  {stock:#?}");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
